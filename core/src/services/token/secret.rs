//! Refresh token secrets and their stored digests.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a refresh secret
const SECRET_BYTES: usize = 64;

/// Generate a new opaque refresh secret, hex encoded
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a secret, hex encoded; this is what gets persisted
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time equality of two digests
pub fn digests_match(a: &str, b: &str) -> bool {
    constant_time_eq::constant_time_eq(a.as_bytes(), b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_long_and_distinct() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), SECRET_BYTES * 2);
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_and_hides_secret() {
        let secret = generate_secret();
        let digest = hash_secret(&secret);
        assert_eq!(digest, hash_secret(&secret));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, secret);
        assert!(digests_match(&digest, &hash_secret(&secret)));
        assert!(!digests_match(&digest, &hash_secret("other")));
    }
}
