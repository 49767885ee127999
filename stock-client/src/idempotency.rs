//! Idempotency token generation.
//!
//! Each attempt carries a fresh token so the remote service can detect
//! duplicate submissions. Tokens are best-effort unique only; collisions are
//! reported by the service (status 10013) and handled by the dispatcher.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Hex characters of the digest kept in the token.
const DIGEST_HEX_LEN: usize = 32;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a token for one attempt.
///
/// Formula: caller_id + hex(SHA256(random seed + sequence + now))[..32]
pub fn generate_token(caller_id: &str) -> String {
    let seed = Uuid::now_v7();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(now.to_le_bytes());

    let digest = hex::encode(hasher.finalize());
    format!("{}{}", caller_id, &digest[..DIGEST_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_prefixed_with_caller_id() {
        let token = generate_token("mall");

        assert!(token.starts_with("mall"));
        assert_eq!(token.len(), "mall".len() + DIGEST_HEX_LEN);
        assert!(token["mall".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_successive_tokens_differ() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token("mall")).collect();

        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_empty_caller_id_yields_bare_digest() {
        let token = generate_token("");

        assert_eq!(token.len(), DIGEST_HEX_LEN);
    }
}
