//! Password reset tokens
//!
//! The raw token is mailed to the user; only its SHA-256 digest is stored.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 20;

#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Hex token sent to the user
    pub raw: String,
    /// Hex SHA-256 of `raw`, persisted on the user
    pub hashed: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn generate(ttl: Duration) -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        let raw = hex::encode(bytes);
        let hashed = hash_reset_token(&raw);
        Self {
            raw,
            hashed,
            expires_at: Utc::now() + ttl,
        }
    }
}

pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
