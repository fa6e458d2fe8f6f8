// RSA Error Types
// Every failure the key generator, block codec and RSA engine can report

use thiserror::Error;

/// Errors surfaced by key generation, block encoding and the RSA engine.
///
/// Decrypting with the wrong key has no variant: textbook RSA carries no
/// integrity check, so a key mismatch yields garbage bytes instead of an error.
#[derive(Debug, Error)]
pub enum RsaError {
    #[error("invalid public exponent: {0}")]
    InvalidExponent(String),

    #[error("prime search exhausted after {draws} draws")]
    PrimeSearchExhausted { draws: u64 },

    #[error("block {index} is not smaller than the modulus")]
    ModulusOverflowBlock { index: usize },

    #[error("malformed ciphertext at token {position} ({token:?}): {reason}")]
    MalformedCiphertext {
        position: usize,
        token: String,
        reason: String,
    },

    #[error("modulus of {bits} bits is too small to hold a single byte block")]
    ModulusTooSmall { bits: u64 },

    #[error("invalid primes: {0}")]
    InvalidPrimes(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("key file error: {0}")]
    KeyFile(#[from] serde_json::Error),
}

impl RsaError {
    pub(crate) fn malformed(position: usize, token: &str, reason: impl Into<String>) -> Self {
        RsaError::MalformedCiphertext {
            position,
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;
