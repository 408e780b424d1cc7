use super::error::MetainfoError;

/// Size of one SHA-1 piece hash.
pub const PIECE_HASH_LEN: usize = 20;

/// Splits the concatenated `pieces` blob into one hash per piece, in piece
/// order. A blob that isn't a whole number of hashes is rejected rather than
/// truncated.
pub fn split_pieces(blob: &[u8]) -> Result<Vec<[u8; PIECE_HASH_LEN]>, MetainfoError> {
	if blob.len() % PIECE_HASH_LEN != 0 {
		return Err(MetainfoError::InvalidPiecesLength { len: blob.len() });
	}

	Ok(blob
		.chunks_exact(PIECE_HASH_LEN)
		.map(|chunk| {
			let mut hash = [0u8; PIECE_HASH_LEN];
			hash.copy_from_slice(chunk);
			hash
		})
		.collect())
}

pub fn piece_hex(hash: &[u8; PIECE_HASH_LEN]) -> String {
	hex::encode(hash)
}

pub fn pieces_hex(blob: &[u8]) -> Result<Vec<String>, MetainfoError> {
	Ok(split_pieces(blob)?.iter().map(piece_hex).collect())
}
