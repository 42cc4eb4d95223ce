//! Session token generation and digesting.
//!
//! A token is 32 random bytes rendered as lowercase hex. The plaintext goes to
//! the caller once; only its SHA-256 digest is persisted as the session id.

use rand::RngCore;
use sha2::{Digest, Sha256};

use bazaar_core::session::SESSION_TOKEN_BYTES;

/// Source of fresh session tokens.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Tokens from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// SHA-256 hex digest of a session token; this is the stored session id.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_tokens_are_256_bit_hex() {
        let token = RandomTokenGenerator.generate();
        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, RandomTokenGenerator.generate());
    }

    #[test]
    fn digest_is_stable_and_fits_session_id() {
        let token = "deadbeef";
        assert_eq!(hash_token(token), hash_token(token));
        assert_eq!(hash_token(token).len(), 64);
        assert_ne!(hash_token(token), token);
        assert_ne!(hash_token("deadbeef"), hash_token("deadbeee"));
    }
}
