// RSA Decryption Implementation
// Parses the decimal block stream, computes m = c^d mod n per block and decodes

use num_bigint::BigUint;
use tracing::debug;

use super::codec::BlockCodec;
use super::keygen::RsaKey;
use crate::error::{Result, RsaError};

/// Decrypt a space-separated block stream with `(d, n)`.
///
/// Fails on the first malformed token, before any block is decrypted.
/// A wrong private exponent is not detected and returns meaningless bytes.
/// The only mismatch that surfaces is a smaller wrong modulus: a ciphertext
/// block at or above it is reported as `MalformedCiphertext`.
pub fn decrypt(ciphertext: &str, key: &RsaKey) -> Result<Vec<u8>> {
    let codec = BlockCodec::for_modulus(&key.modulus)?;
    let blocks = parse_blocks(ciphertext, &key.modulus)?;

    debug!(
        blocks = blocks.len(),
        block_size = codec.block_size(),
        "decrypting"
    );

    codec.decode(&decrypt_blocks(&blocks, key))
}

/// Compute c^d mod n for every block
pub fn decrypt_blocks(blocks: &[BigUint], key: &RsaKey) -> Vec<BigUint> {
    blocks
        .iter()
        .map(|block| block.modpow(&key.exponent, &key.modulus))
        .collect()
}

/// Parse whitespace-separated decimal blocks, each of which must be below `modulus`
pub fn parse_blocks(ciphertext: &str, modulus: &BigUint) -> Result<Vec<BigUint>> {
    let blocks = ciphertext
        .split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            let block: BigUint = token
                .parse()
                .map_err(|_| RsaError::malformed(position, token, "not a decimal integer"))?;

            if block >= *modulus {
                return Err(RsaError::malformed(position, token, "not below the modulus"));
            }
            Ok(block)
        })
        .collect::<Result<Vec<_>>>()?;

    if blocks.is_empty() {
        return Err(RsaError::malformed(0, "", "empty ciphertext"));
    }

    Ok(blocks)
}
