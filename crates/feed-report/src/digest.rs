use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a generated feed.
pub fn feed_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
