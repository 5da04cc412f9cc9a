//! Script checksums.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `script`.
pub fn compute_checksum(script: &str) -> String {
    format!("{:x}", Sha256::digest(script.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            compute_checksum(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_checksum_differs_on_change() {
        assert_ne!(
            compute_checksum("CREATE TABLE a (id INT)"),
            compute_checksum("CREATE TABLE a (id BIGINT)")
        );
    }
}
