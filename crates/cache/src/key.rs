//! Cache-key derivation.
//!
//! Keys are a namespace prefix plus the lowercase hex SHA-256 of the
//! identifying parts, joined with an ASCII unit separator so that
//! `("ab", "c")` and `("a", "bc")` never collide.

use sha2::{Digest, Sha256};

const SEPARATOR: &[u8] = &[0x1f];

/// Hash `parts` under `namespace`.
pub fn hashed_key(namespace: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(SEPARATOR);
        }
        hasher.update(part.as_bytes());
    }
    format!("{namespace}:{}", hex::encode(hasher.finalize()))
}

/// Key for a cached profile of `(question, user)`.
pub fn profile_key(question: &str, user_id: Option<&str>) -> String {
    hashed_key("profile", &[question, user_id.unwrap_or("")])
}
