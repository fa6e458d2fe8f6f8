//! Textbook RSA from first principles.
//!
//! Keys come from [`rsa::generate`]; payloads of any length are split into
//! blocks below the modulus by [`rsa::BlockCodec`] and exponentiated one block
//! at a time by [`rsa::encrypt`] and [`rsa::decrypt`]. There is no padding.

pub mod cli;
pub mod error;
pub mod rsa;
pub mod util;

pub use error::{Result, RsaError};
pub use rsa::{decrypt, encrypt, generate, generate_key, KeyGenConfig, KeyMaterial, RsaKey};
