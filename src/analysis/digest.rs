//! Tile content digests and the hash functions that produce them

use crate::io::error::Result;
use sha2::{Digest, Sha256};
use std::fmt;

/// Fixed-format digest of a tile's pixel bytes
///
/// Two tiles with identical pixel content have equal digests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileDigest(String);

impl TileDigest {
    /// Wrap an already formatted digest string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Format raw digest bytes as lowercase hex
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TileDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pure function from tile bytes to digest
///
/// Implementations must be deterministic and free of side effects; the
/// analysis relies on equal bytes giving equal digests.
pub trait TileHasher {
    /// Hash the raw pixel bytes of one tile
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Hash` if the bytes cannot be hashed.
    fn hash(&self, bytes: &[u8]) -> Result<TileDigest>;
}

impl<F> TileHasher for F
where
    F: Fn(&[u8]) -> Result<TileDigest>,
{
    fn hash(&self, bytes: &[u8]) -> Result<TileDigest> {
        self(bytes)
    }
}

/// SHA-256 tile hasher producing 64 hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl TileHasher for Sha256Hasher {
    fn hash(&self, bytes: &[u8]) -> Result<TileDigest> {
        Ok(TileDigest::from_bytes(&Sha256::digest(bytes)))
    }
}
