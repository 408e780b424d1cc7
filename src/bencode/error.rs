use thiserror::Error;

/// Broad classification of a failure, independent of where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The input violates the bencode grammar.
	MalformedInput,
	/// The input is well-formed so far but exceeds a resource limit.
	ResourceExhaustion,
	/// A decoded value breaks a rule of the metainfo layout.
	InvariantViolation,
}

/// A decode failure. `offset` is the byte position in the input where the fault was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BencodeError {
	#[error("Unexpected end of input at byte {offset}")]
	UnexpectedEnd { offset: usize },

	#[error("Unexpected byte 0x{byte:02x} at byte {offset}")]
	UnexpectedByte { offset: usize, byte: u8 },

	#[error("Invalid integer at byte {offset}: {reason}")]
	InvalidInteger { offset: usize, reason: String },

	#[error("Invalid string length at byte {offset}: {reason}")]
	InvalidLength { offset: usize, reason: String },

	#[error("Dict key at byte {offset} must be a byte string")]
	InvalidKey { offset: usize },

	#[error("Duplicate dict key {key:?} at byte {offset}")]
	DuplicateKey { offset: usize, key: String },

	#[error("Trailing data at byte {offset}")]
	TrailingData { offset: usize },

	#[error("Nesting deeper than {limit} levels at byte {offset}")]
	NestingTooDeep { offset: usize, limit: usize },
}

impl BencodeError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			BencodeError::NestingTooDeep { .. } => ErrorKind::ResourceExhaustion,
			_ => ErrorKind::MalformedInput,
		}
	}

	pub fn offset(&self) -> usize {
		match self {
			BencodeError::UnexpectedEnd { offset }
			| BencodeError::UnexpectedByte { offset, .. }
			| BencodeError::InvalidInteger { offset, .. }
			| BencodeError::InvalidLength { offset, .. }
			| BencodeError::InvalidKey { offset }
			| BencodeError::DuplicateKey { offset, .. }
			| BencodeError::TrailingData { offset }
			| BencodeError::NestingTooDeep { offset, .. } => *offset,
		}
	}
}
