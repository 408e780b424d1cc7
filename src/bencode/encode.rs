use serde_json::{Value, json};
use super::BValue;

/// Encode a `BValue` into its canonical bencoded form.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
	let mut out: Vec<u8> = Vec::new();
	encode_into(value, &mut out);
	out
}

/// Append the canonical encoding of `value` to `out`.
///
/// Dict keys are always written in ascending byte order, whatever order the
/// map hands them out in.
pub fn encode_into(value: &BValue, out: &mut Vec<u8>) {
	match value {
		BValue::Integer(i) => {
			out.push(b'i');
			out.extend_from_slice(i.to_string().as_bytes());
			out.push(b'e');
		}
		BValue::ByteString(bytes) => encode_bytes(bytes, out),
		BValue::List(items) => {
			out.push(b'l');
			for item in items {
				encode_into(item, out);
			}
			out.push(b'e');
		}
		BValue::Dict(dict) => {
			out.push(b'd');
			let mut entries: Vec<(&Vec<u8>, &BValue)> = dict.iter().collect();
			entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
			for (key, val) in entries {
				encode_bytes(key, out);
				encode_into(val, out);
			}
			out.push(b'e');
		}
	}
}

fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
	out.extend_from_slice(bytes.len().to_string().as_bytes());
	out.push(b':');
	out.extend_from_slice(bytes);
}

/// Convert a `BValue` into JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => Attempt UTF-8; if invalid, store hex in `"_bytes_hex"`.
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object; non-UTF-8 keys are written as `"_bytes_hex:<hex>"`
pub fn bvalue_to_json(bv: &BValue) -> Value {
	match bv {
		BValue::Integer(i) => json!(i),

		BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
			Ok(utf8_str) => Value::String(utf8_str.to_string()),
			Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
		},

		BValue::List(list_items) => {
			Value::Array(list_items.iter().map(bvalue_to_json).collect())
		}

		BValue::Dict(map) => {
			let mut json_map = serde_json::Map::new();
			for (k, v) in map {
				json_map.insert(json_key(k), bvalue_to_json(v));
			}
			Value::Object(json_map)
		}
	}
}

/// Non-UTF-8 keys become `_bytes_hex:<hex>` so distinct keys stay distinct.
fn json_key(key: &[u8]) -> String {
	match std::str::from_utf8(key) {
		Ok(s) => s.to_string(),
		Err(_) => format!("_bytes_hex:{}", hex::encode(key)),
	}
}
