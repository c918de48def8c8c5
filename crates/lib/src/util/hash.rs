//! Hashing utilities.
//!
//! Recipes are identified by the SHA-256 of their rendered text so that two
//! runs over the same report can be compared from the logs alone.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A full 64-character SHA-256 hash, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  /// First 12 characters, for log lines and summaries.
  pub fn short(&self) -> &str {
    match self.0.char_indices().nth(12) {
      Some((end, _)) => &self.0[..end],
      None => &self.0,
    }
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}
