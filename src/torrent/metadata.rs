use std::{collections::HashMap, fs, path::Path};

use serde::{Serialize, Serializer};

use crate::bencode::{BValue, Decoder, DEFAULT_MAX_DEPTH};
use crate::torrent::error::MetainfoError;
use crate::torrent::infohash::InfoHash;
use crate::torrent::pieces::{piece_hex, split_pieces, PIECE_HASH_LEN};

type Dict = HashMap<Vec<u8>, BValue>;

/// Represents a .torrent file, including the announce URL and the associated info.
#[derive(Debug, Clone, Serialize)]
pub struct Torrent {
    pub announce: String,       // The tracker URL
    pub info: TorrentInfo,      // Torrent metadata
    pub info_hash: InfoHash,    // SHA-1 of the bencoded info dict
}

/// Contains detailed metadata about the torrent's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentInfo {
    pub name: Option<String>,        // Name of the file or folder
    pub length: Option<u64>,         // Single-file size
    pub files: Vec<FileEntry>,       // Multi-file layout, empty for single-file torrents
    pub piece_length: u64,           // Size of each piece
    #[serde(serialize_with = "serialize_pieces")]
    pub pieces: Vec<[u8; PIECE_HASH_LEN]>,    // SHA-1 hashes are 20 bytes each
}

/// One file of a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub length: u64,
    pub path: Vec<String>,
}

impl Torrent {
    /// Reads a .torrent file from disk and parses its contents.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MetainfoError> {
        let buf = fs::read(path)?;
        Self::from_bytes(&buf)
    }

    /// Parses a whole .torrent buffer. Trailing bytes after the root dict are an error.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_bytes_with_max_depth(buf, DEFAULT_MAX_DEPTH)
    }

    pub fn from_bytes_with_max_depth(buf: &[u8], max_depth: usize) -> Result<Self, MetainfoError> {
        let bvalue = Decoder::new(buf).with_max_depth(max_depth).decode_complete()?;
        Self::from_bvalue(&bvalue)
    }

    /// Creates a `Torrent` from a `BValue` (the result of a bencode parse).
    ///
    /// The info hash is taken over the decoded `info` value itself, so keys
    /// this view ignores still count towards it.
    pub fn from_bvalue(value: &BValue) -> Result<Self, MetainfoError> {
        let root_dict = as_dict(value, "<root>")?;

        let announce = get_bytestring(root_dict, "announce")?;

        let info_value = root_dict
            .get(b"info".as_slice())
            .ok_or_else(|| MetainfoError::MissingField("info".to_string()))?;
        let info = TorrentInfo::from_bvalue(as_dict(info_value, "info")?)?;
        let info_hash = InfoHash::of_info(info_value);

        Ok(Torrent {
            announce,
            info,
            info_hash,
        })
    }
}

impl TorrentInfo {
    pub fn from_bvalue(info_dict: &Dict) -> Result<Self, MetainfoError> {
        let name = match info_dict.get(b"name".as_slice()) {
            Some(_) => Some(get_bytestring(info_dict, "name")?),
            None => None,
        };

        let files = match info_dict.get(b"files".as_slice()) {
            Some(value) => parse_files(value)?,
            None => Vec::new(),
        };

        // `total_length` sums these, so the sum has to fit as well
        if files
            .iter()
            .try_fold(0u64, |acc, f| acc.checked_add(f.length))
            .is_none()
        {
            return Err(MetainfoError::InvalidValue {
                field: "files".to_string(),
                value: i64::MAX,
                reason: "total length overflows",
            });
        }

        let length = match info_dict.get(b"length".as_slice()) {
            Some(_) => Some(get_non_negative(info_dict, "length")?),
            None if !files.is_empty() => None,
            None => return Err(MetainfoError::MissingField("length".to_string())),
        };

        let piece_length = get_non_negative(info_dict, "piece length")?;
        if piece_length == 0 {
            return Err(MetainfoError::InvalidValue {
                field: "piece length".to_string(),
                value: 0,
                reason: "must be positive",
            });
        }

        let pieces = split_pieces(lookup_bytestring(info_dict, "pieces")?)?;

        Ok(TorrentInfo {
            name,
            length,
            files,
            piece_length,
            pieces,
        })
    }

    /// Total content size: `length` for single-file torrents, otherwise the
    /// sum over `files`.
    pub fn total_length(&self) -> u64 {
        match self.length {
            Some(length) => length,
            None => self
                .files
                .iter()
                .fold(0u64, |acc, f| acc.saturating_add(f.length)),
        }
    }

    pub fn piece_hashes_hex(&self) -> Vec<String> {
        self.pieces.iter().map(piece_hex).collect()
    }
}

fn parse_files(value: &BValue) -> Result<Vec<FileEntry>, MetainfoError> {
    let items = value.as_list().ok_or_else(|| wrong_type("files", "list", value))?;

    items
        .iter()
        .map(|item| {
            let entry = as_dict(item, "files")?;
            let length = get_non_negative(entry, "length")?;
            let path_value = entry
                .get(b"path".as_slice())
                .ok_or_else(|| MetainfoError::MissingField("path".to_string()))?;
            let path = path_value
                .as_list()
                .ok_or_else(|| wrong_type("path", "list", path_value))?
                .iter()
                .map(|segment| match segment {
                    BValue::ByteString(b) => String::from_utf8(b.clone())
                        .map_err(|_| MetainfoError::InvalidUtf8("path".to_string())),
                    other => Err(wrong_type("path", "byte string", other)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FileEntry { length, path })
        })
        .collect()
}

fn as_dict<'a>(value: &'a BValue, field: &str) -> Result<&'a Dict, MetainfoError> {
    value.as_dict().ok_or_else(|| wrong_type(field, "dictionary", value))
}

fn wrong_type(field: &str, expected: &'static str, found: &BValue) -> MetainfoError {
    MetainfoError::WrongType {
        field: field.to_string(),
        expected,
        found: found.type_name(),
    }
}

fn serialize_pieces<S: Serializer>(pieces: &[[u8; PIECE_HASH_LEN]], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(pieces.iter().map(piece_hex))
}


/// Looks up a key in the dictionary and returns a byte slice if the value is a ByteString.
pub fn lookup_bytestring<'a>(
    dict: &'a Dict,
    key: &str,
) -> Result<&'a [u8], MetainfoError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or_else(|| MetainfoError::MissingField(key.to_string()))?;

    match val {
        BValue::ByteString(b) => Ok(b),
        other => Err(wrong_type(key, "byte string", other)),
    }
}

/// Gets a ByteString from the dictionary and converts it into a UTF-8 String.
pub fn get_bytestring(
    dict: &Dict,
    key: &str,
) -> Result<String, MetainfoError> {
    let bytes = lookup_bytestring(dict, key)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| MetainfoError::InvalidUtf8(key.to_string()))
}

/// Retrieves an integer value from the dictionary.
pub fn get_integer(
    dict: &Dict,
    key: &str,
) -> Result<i64, MetainfoError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or_else(|| MetainfoError::MissingField(key.to_string()))?;

    match val {
        BValue::Integer(i) => Ok(*i),
        other => Err(wrong_type(key, "integer", other)),
    }
}

/// Like `get_integer`, for sizes that can't be negative.
pub fn get_non_negative(
    dict: &Dict,
    key: &str,
) -> Result<u64, MetainfoError> {
    let value = get_integer(dict, key)?;
    u64::try_from(value).map_err(|_| MetainfoError::InvalidValue {
        field: key.to_string(),
        value,
        reason: "must not be negative",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::{decode_bencode, ErrorKind};
    use crate::torrent::infohash::sha1_digest;
    use std::io::Write;

    const MINIMAL: &[u8] = b"d8:announce13:http://x.com/4:infod6:lengthi100e12:piece lengthi20e6:pieces20:AAAAAAAAAAAAAAAAAAAAee";

    #[test]
    fn test_minimal_document() {
        let torrent = Torrent::from_bytes(MINIMAL).unwrap();
        assert_eq!(torrent.announce, "http://x.com/");
        assert_eq!(torrent.info.length, Some(100));
        assert_eq!(torrent.info.piece_length, 20);
        assert_eq!(torrent.info.pieces, vec![[0x41u8; 20]]);
        assert_eq!(torrent.info.piece_hashes_hex(), vec!["41".repeat(20)]);
        assert_eq!(torrent.info.name, None);
        assert_eq!(torrent.info.total_length(), 100);
    }

    #[test]
    fn test_info_hash_covers_raw_info_dict() {
        let torrent = Torrent::from_bytes(MINIMAL).unwrap();
        let info = b"d6:lengthi100e12:piece lengthi20e6:pieces20:AAAAAAAAAAAAAAAAAAAAe";
        assert_eq!(torrent.info_hash.0, sha1_digest(info));
    }

    #[test]
    fn test_info_hash_includes_unknown_keys() {
        let with_private = b"d8:announce3:url4:infod6:lengthi1e12:piece lengthi1e6:pieces0:7:privatei1eee";
        let without = b"d8:announce3:url4:infod6:lengthi1e12:piece lengthi1e6:pieces0:ee";
        let a = Torrent::from_bytes(with_private).unwrap();
        let b = Torrent::from_bytes(without).unwrap();
        assert_eq!(a.info, b.info);
        assert_ne!(a.info_hash, b.info_hash);
    }

    #[test]
    fn test_name_is_read_when_present() {
        let input = b"d8:announce3:url4:infod6:lengthi5e4:name5:a.txt12:piece lengthi5e6:pieces0:ee";
        let torrent = Torrent::from_bytes(input).unwrap();
        assert_eq!(torrent.info.name.as_deref(), Some("a.txt"));
    }

    #[test]
    fn test_multi_file_layout() {
        let input = b"d8:announce3:url4:infod5:filesld6:lengthi3e4:pathl1:a1:beed6:lengthi4e4:pathl1:ceee4:name3:dir12:piece lengthi8e6:pieces0:ee";
        let torrent = Torrent::from_bytes(input).unwrap();
        assert_eq!(torrent.info.length, None);
        assert_eq!(
            torrent.info.files,
            vec![
                FileEntry { length: 3, path: vec!["a".to_string(), "b".to_string()] },
                FileEntry { length: 4, path: vec!["c".to_string()] },
            ]
        );
        assert_eq!(torrent.info.total_length(), 7);
    }

    #[test]
    fn test_multi_file_total_overflow() {
        let file = "d6:lengthi9223372036854775807e4:pathl1:aee";
        let input = format!(
            "d8:announce3:url4:infod5:filesl{}e12:piece lengthi8e6:pieces0:ee",
            file.repeat(3)
        );
        let err = Torrent::from_bytes(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            MetainfoError::InvalidValue { ref field, .. } if field == "files"
        ));
        assert_eq!(err.kind(), Some(ErrorKind::InvariantViolation));

        // two of them still fit in a u64
        let input = format!(
            "d8:announce3:url4:infod5:filesl{}e12:piece lengthi8e6:pieces0:ee",
            file.repeat(2)
        );
        let torrent = Torrent::from_bytes(input.as_bytes()).unwrap();
        assert_eq!(torrent.info.total_length(), 2 * i64::MAX as u64);
    }

    #[test]
    fn test_missing_fields() {
        let no_announce = b"d4:infod6:lengthi1e12:piece lengthi1e6:pieces0:ee";
        assert!(matches!(
            Torrent::from_bytes(no_announce),
            Err(MetainfoError::MissingField(f)) if f == "announce"
        ));

        let no_info = b"d8:announce3:urle";
        assert!(matches!(
            Torrent::from_bytes(no_info),
            Err(MetainfoError::MissingField(f)) if f == "info"
        ));

        let no_length = b"d8:announce3:url4:infod12:piece lengthi1e6:pieces0:ee";
        assert!(matches!(
            Torrent::from_bytes(no_length),
            Err(MetainfoError::MissingField(f)) if f == "length"
        ));
    }

    #[test]
    fn test_wrong_types() {
        let root_list = b"le";
        let err = Torrent::from_bytes(root_list).unwrap_err();
        assert!(matches!(err, MetainfoError::WrongType { expected: "dictionary", found: "list", .. }));

        let int_announce = b"d8:announcei1e4:infodee";
        let err = Torrent::from_bytes(int_announce).unwrap_err();
        assert!(matches!(err, MetainfoError::WrongType { expected: "byte string", found: "integer", .. }));
        assert_eq!(err.kind(), Some(ErrorKind::InvariantViolation));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        let negative = b"d8:announce3:url4:infod6:lengthi-1e12:piece lengthi1e6:pieces0:ee";
        assert!(matches!(
            Torrent::from_bytes(negative),
            Err(MetainfoError::InvalidValue { value: -1, .. })
        ));

        let zero_piece = b"d8:announce3:url4:infod6:lengthi1e12:piece lengthi0e6:pieces0:ee";
        assert!(matches!(
            Torrent::from_bytes(zero_piece),
            Err(MetainfoError::InvalidValue { value: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_partial_piece_hash() {
        let input = b"d8:announce3:url4:infod6:lengthi1e12:piece lengthi1e6:pieces3:abcee";
        let err = Torrent::from_bytes(input).unwrap_err();
        assert!(matches!(err, MetainfoError::InvalidPiecesLength { len: 3 }));
    }

    #[test]
    fn test_malformed_bencode_is_reported() {
        let err = Torrent::from_bytes(b"d8:announce").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::MalformedInput));

        let mut trailing = MINIMAL.to_vec();
        trailing.push(b'x');
        let err = Torrent::from_bytes(&trailing).unwrap_err();
        assert!(matches!(err, MetainfoError::Bencode(_)));
    }

    #[test]
    fn test_from_bvalue_matches_from_bytes() {
        let (_, value) = decode_bencode(MINIMAL).unwrap();
        let a = Torrent::from_bvalue(&value).unwrap();
        let b = Torrent::from_bytes(MINIMAL).unwrap();
        assert_eq!(a.info, b.info);
        assert_eq!(a.info_hash, b.info_hash);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL).unwrap();
        let torrent = Torrent::from_file(file.path()).unwrap();
        assert_eq!(torrent.announce, "http://x.com/");

        let err = Torrent::from_file(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, MetainfoError::Io(_)));
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_serializes_hashes_as_hex() {
        let torrent = Torrent::from_bytes(MINIMAL).unwrap();
        let json = serde_json::to_value(&torrent).unwrap();
        assert_eq!(json["announce"], "http://x.com/");
        assert_eq!(json["info"]["pieces"][0], "41".repeat(20));
        assert_eq!(json["info_hash"], torrent.info_hash.to_hex());
    }
}
