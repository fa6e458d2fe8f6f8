// Block Codec
// Splits a byte payload into integers below the modulus and back again.
//
// Layout: one block per `block_size` bytes, each chunk read as a little-endian
// base-256 number, followed by a marker block holding `len % block_size`.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use super::bigint::{bit_length, block_size_for};
use crate::error::{Result, RsaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCodec {
    block_size: usize,
}

impl BlockCodec {
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(RsaError::ModulusTooSmall { bits: 0 });
        }
        Ok(Self { block_size })
    }

    /// Codec whose blocks always fit below `modulus`
    pub fn for_modulus(modulus: &BigUint) -> Result<Self> {
        match block_size_for(modulus) {
            0 => Err(RsaError::ModulusTooSmall {
                bits: bit_length(modulus),
            }),
            block_size => Ok(Self { block_size }),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Encode `bytes` as data blocks followed by the length marker.
    pub fn encode(&self, bytes: &[u8]) -> Vec<BigUint> {
        let mut blocks: Vec<BigUint> = bytes
            .chunks(self.block_size)
            .map(BigUint::from_bytes_le)
            .collect();

        blocks.push(BigUint::from(bytes.len() % self.block_size));
        blocks
    }

    /// Rebuild the payload from data blocks and the trailing marker.
    ///
    /// Bits above the bytes a block is expected to carry are dropped, so a
    /// payload decrypted under the wrong key decodes to garbage, not an error.
    pub fn decode(&self, blocks: &[BigUint]) -> Result<Vec<u8>> {
        let (marker, data) = blocks
            .split_last()
            .ok_or_else(|| RsaError::malformed(0, "", "missing length marker"))?;

        let position = data.len();
        // A marker decrypted under the wrong key can be any value below n
        let remainder = (marker % self.block_size)
            .to_usize()
            .ok_or_else(|| RsaError::malformed(position, &marker.to_string(), "length marker"))?;

        if data.is_empty() && remainder != 0 {
            return Err(RsaError::malformed(
                position,
                &marker.to_string(),
                "length marker without data blocks",
            ));
        }

        // A zero marker means the last chunk was full
        let total = match remainder {
            0 => data.len() * self.block_size,
            r => (data.len() - 1) * self.block_size + r,
        };

        let mut text = Vec::with_capacity(total);
        for block in data {
            let take = (total - text.len()).min(self.block_size);
            let digits = block.to_bytes_le();
            text.extend((0..take).map(|i| digits.get(i).copied().unwrap_or(0)));
        }

        Ok(text)
    }
}

/// Reject any block that is not strictly below `modulus`.
pub fn check_bounds(blocks: &[BigUint], modulus: &BigUint) -> Result<()> {
    match blocks.iter().position(|block| block >= modulus) {
        Some(index) => Err(RsaError::ModulusOverflowBlock { index }),
        None => Ok(()),
    }
}
