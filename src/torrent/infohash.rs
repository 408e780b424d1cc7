// infohash.rs
use std::fmt;

use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};

use crate::bencode::{encode_bvalue, BValue};

/// SHA-1 of the canonical encoding of a torrent's `info` dictionary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InfoHash(pub [u8; 20]);

impl InfoHash {
	/// Re-encodes `info` canonically and hashes the result. Keys are sorted
	/// by the encoder, so the hash doesn't depend on the order they were
	/// read or inserted in.
	pub fn of_info(info: &BValue) -> Self {
		InfoHash(sha1_digest(&encode_bvalue(info)))
	}

	pub fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}
}

impl fmt::Display for InfoHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Debug for InfoHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "InfoHash({})", self.to_hex())
	}
}

impl Serialize for InfoHash {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

pub fn sha1_digest(data: &[u8]) -> [u8; 20] {
	let mut hasher = Sha1::new();
	hasher.update(data);
	let result = hasher.finalize();

	let mut hash_bytes = [0u8; 20];
	hash_bytes.copy_from_slice(&result);
	hash_bytes
}
