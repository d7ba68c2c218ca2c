//! Record digest: SHA-256 over the canonical string, lowercase hex.

use sha2::{Digest, Sha256};

/// Hash a canonical string. Total on any input; always 64 lowercase hex chars.
pub fn digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
