//! Content fingerprints for generated documents
//!
//! Two runs with the same configuration must produce byte-identical output, so
//! a SHA-256 of the document is a cheap way to report and compare results.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Full lowercase hex SHA-256 of `content`.
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Compute 8-character hex hash of content (first 32 bits of SHA-256).
pub fn short_fingerprint(content: &[u8]) -> String {
    let full = fingerprint(content);
    full[..8].to_string()
}

/// Fingerprint of a file on disk.
pub fn file_fingerprint(path: &Path) -> ApplicationResult<String> {
    let content = std::fs::read(path).map_err(|e| ApplicationError::Config {
        message: format!("cannot read {} for hashing: {e}", path.display()),
    })?;
    Ok(fingerprint(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_known_content_when_fingerprinting_then_matches_sha256() {
        // sha256("hello")
        assert_eq!(
            fingerprint(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(short_fingerprint(b"hello"), "2cf24dba");
    }

    #[test]
    fn given_file_when_fingerprinting_then_same_as_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gpt.xml");
        fs::write(&path, "<Forest>\n</Forest>\n").unwrap();

        let hash = file_fingerprint(&path).unwrap();

        assert_eq!(hash, fingerprint(b"<Forest>\n</Forest>\n"));
    }

    #[test]
    fn given_missing_file_when_fingerprinting_then_error() {
        let temp = TempDir::new().unwrap();

        let result = file_fingerprint(&temp.path().join("absent.xml"));

        assert!(result.is_err());
    }
}
