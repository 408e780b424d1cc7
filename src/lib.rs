// lib.rs - Library interface for the bencode / metainfo tools

pub mod bencode;
pub mod cli;
pub mod config;
pub mod engine;
pub mod torrent;

// Re-export commonly used types for easier testing
pub use bencode::{
    bvalue_to_json, decode_bencode, decode_bencode_at, decode_complete, encode_bvalue, BValue,
    BencodeError, Decoder, ErrorKind,
};
pub use config::Config;
pub use torrent::{split_pieces, InfoHash, MetainfoError, Torrent, TorrentInfo};
