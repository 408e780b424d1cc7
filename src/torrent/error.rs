use thiserror::Error;

use crate::bencode::{BencodeError, ErrorKind};

#[derive(Debug, Error)]
pub enum MetainfoError {
	#[error("Bencode error: {0}")]
	Bencode(#[from] BencodeError),

	#[error("I/O error while reading torrent: {0}")]
	Io(#[from] std::io::Error),

	#[error("Missing '{0}'")]
	MissingField(String),

	#[error("'{field}' must be a {expected}, found {found}")]
	WrongType {
		field: String,
		expected: &'static str,
		found: &'static str,
	},

	#[error("'{0}' value not valid UTF-8")]
	InvalidUtf8(String),

	#[error("'{field}' has invalid value {value}: {reason}")]
	InvalidValue {
		field: String,
		value: i64,
		reason: &'static str,
	},

	#[error("'pieces' is {len} bytes, not a multiple of 20")]
	InvalidPiecesLength { len: usize },
}

impl MetainfoError {
	/// I/O failures have no bencode classification and report `None`.
	pub fn kind(&self) -> Option<ErrorKind> {
		match self {
			MetainfoError::Bencode(e) => Some(e.kind()),
			MetainfoError::Io(_) => None,
			_ => Some(ErrorKind::InvariantViolation),
		}
	}
}
