//! SHA-256 digests
//!
//! Manifest checksums use the canonical `sha256:<hex>` format; seeded object
//! identifiers are cut from the bare hex digest.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Lowercase hex SHA-256 digest of `content`.
pub fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Compute the checksum of string content as `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    format!("{}{}", PREFIX, sha256_hex(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_has_prefix() {
        assert!(compute_content_checksum("objects = {};").starts_with("sha256:"));
    }

    #[test]
    fn content_checksum_known_value() {
        assert_eq!(
            compute_content_checksum("hello world"),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn hex_digest_is_64_chars() {
        let digest = sha256_hex(b"MainUI.swift_ref");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
