//! Object identifier (SHA-1 hash)
//!
//! Object ids are 40-character hexadecimal strings naming blobs and commits
//! by content: hashing equal content always yields an equal id.
//!
//! ## Storage
//!
//! Objects are stored as `<store>/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::errors::Result;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Length of an object id in hex characters.
pub const OBJECT_ID_LENGTH: usize = 40;

/// Content-addressed object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string.
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("invalid object id length: {}", id.len()).into());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("invalid object id characters: {}", id).into());
        }
        Ok(Self(id.to_lowercase()))
    }

    /// Digest a sequence of byte chunks into an object id.
    ///
    /// The chunks are fed to the hasher in order, so the caller controls
    /// the exact identity formula of each object kind.
    pub fn digest<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha1::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Convert to a fan-out path, `abc123...` becoming `ab/c123...`.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters, the standard abbreviation for display.
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    #[test]
    fn digest_is_deterministic() {
        let a = ObjectId::digest([b"Blob".as_slice(), b"f.txt", b"hello"]);
        let b = ObjectId::digest([b"Blob".as_slice(), b"f.txt", b"hello"]);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_is_content_sensitive() {
        let a = ObjectId::digest([b"Blob".as_slice(), b"f.txt", b"hello"]);
        let b = ObjectId::digest([b"Blob".as_slice(), b"g.txt", b"hello"]);
        assert_ne!(a, b);
    }

    #[test]
    fn to_path_splits_after_two_chars() {
        let id = ObjectId::digest([b"x".as_slice()]);
        let rendered = id.to_path().to_string_lossy().replace('\\', "/");
        assert_eq!(rendered.replace('/', ""), id.as_ref());
        assert_eq!(rendered.find('/'), Some(2));
    }

    proptest! {
        #[test]
        fn parse_accepts_exactly_40_hex_chars(id in "[0-9a-fA-F]{40}") {
            assert!(ObjectId::try_parse(id).is_ok());
        }

        #[test]
        fn parse_rejects_wrong_lengths(id in "[0-9a-f]{0,39}") {
            assert!(ObjectId::try_parse(id).is_err());
        }

        #[test]
        fn parse_rejects_non_hex(id in "[g-z]{40}") {
            assert!(ObjectId::try_parse(id).is_err());
        }
    }
}
