use std::collections::HashMap;
use super::error::BencodeError;
use crate::bencode::bvalue::BValue;

/// Nesting limit used when the caller does not pick one.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decodes one value from the start of `input`. Returns the number of bytes
/// consumed alongside the value; bytes after it are left alone.
pub fn decode_bencode(input: &[u8]) -> Result<(usize, BValue), BencodeError> {
	decode_bencode_at(input, 0)
}

/// Decodes one value starting at `cursor`, returning the advanced cursor.
pub fn decode_bencode_at(input: &[u8], cursor: usize) -> Result<(usize, BValue), BencodeError> {
	let mut decoder = Decoder::at(input, cursor);
	let value = decoder.decode_value()?;
	Ok((decoder.position(), value))
}

/// Decodes a buffer that must hold exactly one value.
pub fn decode_complete(input: &[u8]) -> Result<BValue, BencodeError> {
	Decoder::new(input).decode_complete()
}

/// Recursive-descent decoder over an in-memory buffer.
///
/// All state lives in the decoder itself, so separate decoders never
/// interfere and the same buffer can be read from several threads.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
	input: &'a [u8],
	pos: usize,
	depth: usize,
	max_depth: usize,
}

impl<'a> Decoder<'a> {
	pub fn new(input: &'a [u8]) -> Self {
		Self::at(input, 0)
	}

	pub fn at(input: &'a [u8], cursor: usize) -> Self {
		Decoder {
			input,
			pos: cursor,
			depth: 0,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Limits how many lists/dicts may be nested inside each other.
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn position(&self) -> usize {
		self.pos
	}

	/// Decodes one value and fails if any input remains after it.
	pub fn decode_complete(mut self) -> Result<BValue, BencodeError> {
		let value = self.decode_value()?;
		if self.pos != self.input.len() {
			return Err(BencodeError::TrailingData { offset: self.pos });
		}
		Ok(value)
	}

	pub fn decode_value(&mut self) -> Result<BValue, BencodeError> {
		match self.peek() {
			None => Err(BencodeError::UnexpectedEnd { offset: self.pos }),
			Some(b'i') => self.decode_integer(),
			Some(b'l') => self.decode_list(),
			Some(b'd') => self.decode_dict(),
			Some(c) if c.is_ascii_digit() => self.decode_string().map(BValue::ByteString),
			Some(byte) => Err(BencodeError::UnexpectedByte { offset: self.pos, byte }),
		}
	}

	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	/// `i<digits>e`
	fn decode_integer(&mut self) -> Result<BValue, BencodeError> {
		let digits_start = self.pos + 1; // skip 'i'
		let end = self.input[digits_start..]
			.iter()
			.position(|&b| b == b'e')
			.map(|i| digits_start + i)
			.ok_or(BencodeError::UnexpectedEnd { offset: self.input.len() })?;

		let parsed = parse_integer(&self.input[digits_start..end], digits_start)?;

		// step past 'e'
		self.pos = end + 1;
		Ok(BValue::Integer(parsed))
	}

	/// `<length>:<bytes>`
	fn decode_string(&mut self) -> Result<Vec<u8>, BencodeError> {
		let start = self.pos;
		let digits_len = self.input[start..]
			.iter()
			.take_while(|b| b.is_ascii_digit())
			.count();
		let colon_index = start + digits_len;

		match self.input.get(colon_index) {
			Some(b':') => {}
			Some(&byte) => {
				return Err(BencodeError::InvalidLength {
					offset: colon_index,
					reason: format!("expected ':' but found 0x{:02x}", byte),
				})
			}
			None => return Err(BencodeError::UnexpectedEnd { offset: colon_index }),
		}

		let digits = &self.input[start..colon_index];
		if digits.is_empty() {
			return Err(BencodeError::InvalidLength {
				offset: start,
				reason: "missing length".to_string(),
			});
		}
		if digits.len() > 1 && digits[0] == b'0' {
			return Err(BencodeError::InvalidLength {
				offset: start,
				reason: "leading zeros are not allowed".to_string(),
			});
		}

		// digits are ASCII, so this never lossily replaces anything
		let length_str = String::from_utf8_lossy(digits);
		let length = length_str.parse::<usize>().map_err(|e| BencodeError::InvalidLength {
			offset: start,
			reason: format!("{}: {}", length_str, e),
		})?;

		let start_data = colon_index + 1;
		let end_data = start_data
			.checked_add(length)
			.ok_or_else(|| BencodeError::InvalidLength {
				offset: start,
				reason: format!("{} overflows the address space", length),
			})?;

		if end_data > self.input.len() {
			return Err(BencodeError::UnexpectedEnd { offset: self.input.len() });
		}

		self.pos = end_data;
		Ok(self.input[start_data..end_data].to_vec())
	}

	/// `l<items>e`
	fn decode_list(&mut self) -> Result<BValue, BencodeError> {
		self.enter()?;
		self.pos += 1; // skip 'l'
		let mut items = Vec::new();

		loop {
			match self.peek() {
				Some(b'e') => break,
				Some(_) => items.push(self.decode_value()?),
				None => return Err(BencodeError::UnexpectedEnd { offset: self.pos }),
			}
		}

		self.leave();
		Ok(BValue::List(items))
	}

	/// `d<key><value>...e`, where every key is a byte string.
	fn decode_dict(&mut self) -> Result<BValue, BencodeError> {
		self.enter()?;
		self.pos += 1; // skip 'd'
		let mut map = HashMap::new();

		loop {
			let key_offset = self.pos;
			let key = match self.peek() {
				Some(b'e') => break,
				Some(c) if c.is_ascii_digit() => self.decode_string()?,
				Some(_) => return Err(BencodeError::InvalidKey { offset: key_offset }),
				None => return Err(BencodeError::UnexpectedEnd { offset: key_offset }),
			};

			if map.contains_key(&key) {
				return Err(BencodeError::DuplicateKey {
					offset: key_offset,
					key: String::from_utf8_lossy(&key).into_owned(),
				});
			}

			let value = self.decode_value()?;
			map.insert(key, value);
		}

		self.leave();
		Ok(BValue::Dict(map))
	}

	fn enter(&mut self) -> Result<(), BencodeError> {
		if self.depth >= self.max_depth {
			return Err(BencodeError::NestingTooDeep {
				offset: self.pos,
				limit: self.max_depth,
			});
		}
		self.depth += 1;
		Ok(())
	}

	/// Consumes the closing 'e' of a list or dict.
	fn leave(&mut self) {
		self.depth -= 1;
		self.pos += 1;
	}
}

/// Parses the text between `i` and `e`. `offset` is where that text starts.
fn parse_integer(digits: &[u8], offset: usize) -> Result<i64, BencodeError> {
	let (negative, body) = match digits.split_first() {
		Some((b'-', rest)) => (true, rest),
		_ => (false, digits),
	};
	let body_offset = offset + negative as usize;

	if body.is_empty() {
		return Err(BencodeError::InvalidInteger {
			offset,
			reason: "no digits".to_string(),
		});
	}
	if let Some(i) = body.iter().position(|b| !b.is_ascii_digit()) {
		return Err(BencodeError::InvalidInteger {
			offset: body_offset + i,
			reason: format!("unexpected byte 0x{:02x}", body[i]),
		});
	}
	if body.len() > 1 && body[0] == b'0' {
		return Err(BencodeError::InvalidInteger {
			offset: body_offset,
			reason: "leading zeros are not allowed".to_string(),
		});
	}
	if negative && body == &b"0"[..] {
		return Err(BencodeError::InvalidInteger {
			offset,
			reason: "negative zero is not allowed".to_string(),
		});
	}

	let num_str = String::from_utf8_lossy(digits);
	num_str.parse::<i64>().map_err(|e| BencodeError::InvalidInteger {
		offset,
		reason: format!("failed to parse '{}': {}", num_str, e),
	})
}
