// RSA Encryption Implementation
// Textbook RSA over the block codec: no padding, c = m^e mod n per block

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use super::codec::{check_bounds, BlockCodec};
use super::keygen::RsaKey;
use crate::error::{Result, RsaError};

/// Separator between blocks in the textual ciphertext
pub const BLOCK_SEPARATOR: &str = " ";

/// Encrypt bytes with `(e, n)`
/// Returns the ciphertext as space-separated decimal blocks
pub fn encrypt(plaintext: &[u8], key: &RsaKey) -> Result<String> {
    let codec = BlockCodec::for_modulus(&key.modulus)?;
    let blocks = codec.encode(plaintext);

    debug!(
        bytes = plaintext.len(),
        blocks = blocks.len(),
        block_size = codec.block_size(),
        "encrypting"
    );

    let ciphertext = encrypt_blocks(&blocks, key)?;
    Ok(format_blocks(&ciphertext))
}

/// Compute b^e mod n for every block.
///
/// Every block must already be below the modulus; nothing is exponentiated
/// otherwise.
pub fn encrypt_blocks(blocks: &[BigUint], key: &RsaKey) -> Result<Vec<BigUint>> {
    if key.modulus.is_zero() {
        return Err(RsaError::ModulusTooSmall { bits: 0 });
    }

    check_bounds(blocks, &key.modulus)?;

    Ok(blocks
        .iter()
        .map(|block| block.modpow(&key.exponent, &key.modulus))
        .collect())
}

/// Serialize blocks as decimal integers
pub fn format_blocks(blocks: &[BigUint]) -> String {
    blocks
        .iter()
        .map(|block| block.to_string())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
