// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod primality;

pub use bigint::{block_size_for, extended_gcd, gcd, mod_inverse};
pub use codec::{check_bounds, BlockCodec};
pub use decrypt::{decrypt, decrypt_blocks, parse_blocks};
pub use encrypt::{encrypt, encrypt_blocks, format_blocks};
pub use keygen::{generate, generate_key, generate_with, KeyGenConfig, KeyMaterial, RsaKey};
pub use primality::{is_probable_prime, is_probable_prime_with, DEFAULT_ROUNDS};
