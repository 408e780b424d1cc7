pub mod error;
pub mod infohash;
pub mod metadata;
pub mod pieces;

pub use error::MetainfoError;
pub use infohash::{sha1_digest, InfoHash};
pub use metadata::{get_bytestring, get_integer, FileEntry, Torrent, TorrentInfo};
pub use pieces::{piece_hex, pieces_hex, split_pieces, PIECE_HASH_LEN};
