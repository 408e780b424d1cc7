use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes, not necessarily UTF-8
	Integer(i64),
	List(Vec<BValue>),
	Dict(HashMap<Vec<u8>, BValue>) // no ordering; the encoder sorts keys
}

impl BValue {
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// The byte-string contents, if present and valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&HashMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(map) => Some(map),
			_ => None,
		}
	}

	/// Dictionary lookup. Returns `None` for non-dictionaries too.
	pub fn get<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<&BValue> {
		self.as_dict().and_then(|map| map.get(key.as_ref()))
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}
}

impl From<i64> for BValue {
	fn from(i: i64) -> Self {
		BValue::Integer(i)
	}
}

impl From<&str> for BValue {
	fn from(s: &str) -> Self {
		BValue::ByteString(s.as_bytes().to_vec())
	}
}

impl From<&[u8]> for BValue {
	fn from(b: &[u8]) -> Self {
		BValue::ByteString(b.to_vec())
	}
}

impl From<Vec<u8>> for BValue {
	fn from(b: Vec<u8>) -> Self {
		BValue::ByteString(b)
	}
}

impl From<Vec<BValue>> for BValue {
	fn from(items: Vec<BValue>) -> Self {
		BValue::List(items)
	}
}
