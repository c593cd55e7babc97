use crate::error::{ImgStoreError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Compute the XXH3 64-bit hash of data
pub fn hash64(data: &[u8]) -> u64 {
    twox_hash::xxh3::hash64(data)
}

/// Fixed-width (16 chars) lowercase hex encoding of a hash
pub fn to_hex(hash: u64) -> String {
    hex::encode(hash.to_be_bytes())
}

/// Identifier of a stored blob: the hex-encoded XXH3 hash of its bytes.
///
/// Only ever holds exactly 16 lowercase hex characters, so it is safe to use
/// as a leaf filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub const LEN: usize = 16;

    pub fn from_hash(hash: u64) -> Self {
        Self(to_hex(hash))
    }

    /// Derive the identifier of a payload
    pub fn of(data: &[u8]) -> Self {
        Self::from_hash(hash64(data))
    }

    pub fn parse(value: &str) -> Result<Self> {
        let well_formed = value.len() == Self::LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if !well_formed {
            return Err(ImgStoreError::InvalidRequest(format!(
                "invalid content id: {}",
                value
            )));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentId {
    type Err = ImgStoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash64_is_deterministic() {
        let data = b"hello world";
        assert_eq!(hash64(data), hash64(data));
        assert_eq!(hash64(b""), hash64(b""));
        assert_ne!(hash64(b"hello world"), hash64(b"hello world!"));
    }

    #[test]
    fn test_to_hex_is_fixed_width() {
        assert_eq!(to_hex(0), "0000000000000000");
        assert_eq!(to_hex(0xab), "00000000000000ab");
        assert_eq!(to_hex(u64::MAX), "ffffffffffffffff");
        assert_eq!(to_hex(0x0123_4567_89ab_cdef), "0123456789abcdef");
    }

    #[test]
    fn test_content_id_matches_hash() {
        let data = b"\x89PNG\r\n\x1a\n";
        let id = ContentId::of(data);
        assert_eq!(id.as_str(), to_hex(hash64(data)));
        assert_eq!(id.as_str().len(), ContentId::LEN);
        assert_eq!(ContentId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_content_id_rejects_malformed() {
        assert!(ContentId::parse("").is_err());
        assert!(ContentId::parse("0123456789abcde").is_err());
        assert!(ContentId::parse("0123456789ABCDEF").is_err());
        assert!(ContentId::parse("../../etc/passwd").is_err());
        assert!(ContentId::parse("0123456789abcdeg").is_err());
        assert!("0123456789abcdef".parse::<ContentId>().is_ok());
    }
}
