//! Content digests used for change detection.
//!
//! SHA-256 is used for its distribution, not its security properties.

use std::fmt;

use sha2::{Digest, Sha256};

/// 256-bit digest of a byte payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest a byte payload.
pub fn digest(content: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(content);
    ContentDigest(hasher.finalize().into())
}
