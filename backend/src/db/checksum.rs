//! Dataset checksums.

use sha2::{Digest, Sha256};

/// SHA-256 of dataset file contents, hex encoded.
///
/// Reported by `/health` so clients can tell which dataset build is loaded.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
