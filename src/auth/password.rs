//! Password hashing
//!
//! Salted SHA-256 digests, base64-encoded. The salt is generated per user
//! and stored alongside the hash; verification recomputes the digest with
//! the stored salt and compares in constant time via HMAC.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use base64::{engine::general_purpose, Engine as _};

/// A freshly computed hash together with its salt
#[derive(Debug, Clone)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Hash a plaintext password with a newly generated random salt.
pub fn hash_password(plaintext: &str) -> PasswordHash {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = general_purpose::URL_SAFE_NO_PAD.encode(salt_bytes);
    let hash = digest(plaintext, &salt);
    PasswordHash { hash, salt }
}

/// Check a plaintext password against a stored hash and salt.
pub fn verify_password(plaintext: &str, salt: &str, expected_hash: &str) -> bool {
    // HMAC over the two digests gives a constant-time comparison without
    // pulling in a dedicated crate.
    type HmacSha256 = Hmac<Sha256>;
    let computed = digest(plaintext, salt);
    let Ok(mut mac) = HmacSha256::new_from_slice(salt.as_bytes()) else {
        return false;
    };
    mac.update(computed.as_bytes());
    let computed_tag = mac.finalize().into_bytes();

    let Ok(mut expected_mac) = HmacSha256::new_from_slice(salt.as_bytes()) else {
        return false;
    };
    expected_mac.update(expected_hash.as_bytes());
    expected_mac.verify_slice(&computed_tag).is_ok()
}

fn digest(plaintext: &str, salt: &str) -> String {
    use sha2::Digest;

    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(plaintext.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hashed = hash_password("s3cret");
        assert!(verify_password("s3cret", &hashed.salt, &hashed.hash));
    }

    #[test]
    fn wrong_password_fails() {
        let hashed = hash_password("s3cret");
        assert!(!verify_password("not-it", &hashed.salt, &hashed.hash));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }
}
