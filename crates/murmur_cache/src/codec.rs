//! Binary encoding of cache entry files.
//!
//! Each entry file is laid out as a 4-byte little-endian header length, a
//! bincode-encoded [`EntryHeader`], and the bincode-encoded
//! [`CacheEntry`] payload. The header carries magic bytes, a format version,
//! and an XXH3-128 checksum of the payload so that truncated or partially
//! written files are detected on read.

use std::path::Path;

use murmur_common::CacheEntry;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Magic bytes identifying a Murmur cache entry.
const ENTRY_MAGIC: [u8; 4] = *b"MRMR";

/// Current entry format version. Increment on breaking changes to the header
/// or payload format.
const ENTRY_FORMAT_VERSION: u32 = 1;

/// Header prepended to every entry file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryHeader {
    /// Magic bytes: must be `b"MRMR"`.
    pub magic: [u8; 4],

    /// Entry format version.
    pub format_version: u32,

    /// XXH3-128 checksum of the payload bytes.
    pub checksum: u128,
}

/// Serializes an entry into the on-disk representation.
pub fn encode_entry(entry: &CacheEntry) -> Result<Vec<u8>, CacheError> {
    let payload = bincode::serde::encode_to_vec(entry, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

    let header = EntryHeader {
        magic: ENTRY_MAGIC,
        format_version: ENTRY_FORMAT_VERSION,
        checksum: xxhash_rust::xxh3::xxh3_128(&payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}

/// Decodes the on-disk representation read from `path`.
///
/// Every validation failure is reported as [`CacheError::Corrupt`].
pub fn decode_entry(path: &Path, raw: &[u8]) -> Result<CacheEntry, CacheError> {
    let corrupt = |reason: String| CacheError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    if raw.len() < 4 {
        return Err(corrupt(format!("file too short ({} bytes)", raw.len())));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&raw[..4]);
    let header_len = u32::from_le_bytes(len_bytes) as usize;
    if raw.len() - 4 < header_len {
        return Err(corrupt("truncated header".to_string()));
    }

    let (header, _): (EntryHeader, usize) =
        bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
            .map_err(|e| corrupt(format!("invalid header: {e}")))?;

    if header.magic != ENTRY_MAGIC {
        return Err(corrupt("bad magic bytes".to_string()));
    }
    if header.format_version != ENTRY_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {} (expected {ENTRY_FORMAT_VERSION})",
            header.format_version
        )));
    }

    let payload = &raw[4 + header_len..];
    if xxhash_rust::xxh3::xxh3_128(payload) != header.checksum {
        return Err(corrupt("checksum mismatch".to_string()));
    }

    let (entry, read): (CacheEntry, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|e| corrupt(format!("invalid payload: {e}")))?;
    if read != payload.len() {
        return Err(corrupt("trailing bytes after payload".to_string()));
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_common::Fingerprint;

    fn sample_entry() -> CacheEntry {
        let fp = Fingerprint::of_pairs([("Text", "Hello"), ("SampleRate", "16000")]);
        CacheEntry::new(fp, b"OggS fake audio".to_vec(), "audio/ogg")
    }

    fn with_header(header: &EntryHeader, payload: &[u8]) -> Vec<u8> {
        let header_bytes =
            bincode::serde::encode_to_vec(header, bincode::config::standard()).unwrap();
        let mut output = Vec::new();
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(payload);
        output
    }

    #[test]
    fn encode_decode_preserves_entry() {
        let entry = sample_entry();
        let raw = encode_entry(&entry).unwrap();
        let back = decode_entry(Path::new("e"), &raw).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = decode_entry(Path::new("e"), b"garbage data").unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn short_file_is_corrupt() {
        let err = decode_entry(Path::new("e"), b"AB").unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let raw = encode_entry(&sample_entry()).unwrap();
        let err = decode_entry(Path::new("e"), &raw[..raw.len() - 3]).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn wrong_magic_is_corrupt() {
        let payload =
            bincode::serde::encode_to_vec(&sample_entry(), bincode::config::standard()).unwrap();
        let header = EntryHeader {
            magic: *b"BAAD",
            format_version: ENTRY_FORMAT_VERSION,
            checksum: xxhash_rust::xxh3::xxh3_128(&payload),
        };
        let err = decode_entry(Path::new("e"), &with_header(&header, &payload)).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn wrong_version_is_corrupt() {
        let payload =
            bincode::serde::encode_to_vec(&sample_entry(), bincode::config::standard()).unwrap();
        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: 999,
            checksum: xxhash_rust::xxh3::xxh3_128(&payload),
        };
        let err = decode_entry(Path::new("e"), &with_header(&header, &payload)).unwrap_err();
        assert!(err.to_string().contains("format version 999"));
    }

    #[test]
    fn valid_checksum_over_undecodable_payload_is_corrupt() {
        let payload = b"\xff\xff\xff";
        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: ENTRY_FORMAT_VERSION,
            checksum: xxhash_rust::xxh3::xxh3_128(payload),
        };
        let err = decode_entry(Path::new("e"), &with_header(&header, payload)).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn large_payload() {
        let fp = Fingerprint::of_pairs([("Text", "long")]);
        let data: Vec<u8> = (0..100_000).map(|i| (i % 251) as u8).collect();
        let entry = CacheEntry::new(fp, data, "audio/mpeg");
        let raw = encode_entry(&entry).unwrap();
        assert_eq!(decode_entry(Path::new("e"), &raw).unwrap(), entry);
    }
}
