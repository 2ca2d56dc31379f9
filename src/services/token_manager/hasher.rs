use tracing::error;

use super::error::TokenError;

/// Wraps bcrypt (DefaultCost) over raw refresh-token bytes.
///
/// Note: bcrypt silently truncates inputs over 72 bytes. Refresh tokens
/// here are UUID strings (36 bytes), well under that limit; this wrapper
/// does not defend against longer inputs because the caller never
/// produces one, not because truncation is safe in general.
#[cfg_attr(test, mockall::automock)]
pub trait Hasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, TokenError>;
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BcryptHasher;

impl Hasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, TokenError> {
        if plaintext.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        bcrypt::hash(plaintext, bcrypt::DEFAULT_COST).map_err(|e| {
            error!(error = %e, "bcrypt hash failed");
            TokenError::CantHashToken
        })
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        // Any verification failure (mismatch or malformed hash) is treated
        // as "no match" — callers never distinguish the two.
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_matches() {
        let h = BcryptHasher;
        let hash = h.hash("a-refresh-token").unwrap();
        assert!(h.verify(&hash, "a-refresh-token"));
    }

    #[test]
    fn verify_rejects_wrong_plaintext() {
        let h = BcryptHasher;
        let hash = h.hash("a-refresh-token").unwrap();
        assert!(!h.verify(&hash, "a-different-token"));
    }

    #[test]
    fn rejects_empty_input() {
        let h = BcryptHasher;
        assert!(matches!(h.hash(""), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn same_plaintext_hashes_differ() {
        let h = BcryptHasher;
        let a = h.hash("a-refresh-token").unwrap();
        let b = h.hash("a-refresh-token").unwrap();
        assert_ne!(a, b, "bcrypt salts each hash independently");
        assert!(h.verify(&a, "a-refresh-token"));
        assert!(h.verify(&b, "a-refresh-token"));
    }
}
