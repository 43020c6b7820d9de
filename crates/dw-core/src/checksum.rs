//! SHA-256 checksum utility for drift detection.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 checksum of a migration's content
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
