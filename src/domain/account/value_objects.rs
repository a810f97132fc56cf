use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Account Value Objects
// ============================================================================

/// Account contact address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email(pub String);

impl Email {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hex-encoded SHA-256 digest of a raw credential. The raw credential is
/// dropped after digesting; only the digest is stored.
pub fn credential_digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_hex() {
        let a = credential_digest("s3cret");
        let b = credential_digest("s3cret");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_differs_per_input() {
        assert_ne!(credential_digest("s3cret"), credential_digest("s3cret!"));
    }

    #[test]
    fn test_email_serializes_as_plain_string() {
        let email = Email::new("ada@example.com");
        assert_eq!(email.as_str(), "ada@example.com");
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"ada@example.com\""
        );
    }
}
