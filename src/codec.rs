//! High-level owning wrapper over [`crate::encode`] and [`crate::decode`].

use crate::{decode, encode, Block, BlockMut, EncoderParams, Error};

/// An owning Cauchy GF(256) codec bound to a fixed `(k, m, B)` shape.
///
/// This mirrors the construct-once, encode/decode-many-times shape of
/// erasure coding libraries in this space: build a codec for a given
/// shard layout, then reuse it across many encode/decode calls without
/// re-validating parameters each time.
pub struct CauchyCodec {
    params: EncoderParams,
}

impl CauchyCodec {
    /// Builds a codec for `original_count` data shards and
    /// `recovery_count` parity shards, each `block_bytes` long.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        block_bytes: usize,
    ) -> Result<Self, Error> {
        crate::init(crate::VERSION)?;
        let params = EncoderParams::new(original_count, recovery_count, block_bytes)?;
        Ok(CauchyCodec { params })
    }

    /// Number of original (data) shards, `k`.
    pub fn original_count(&self) -> usize {
        self.params.original_count()
    }

    /// Number of recovery (parity) shards, `m`.
    pub fn recovery_count(&self) -> usize {
        self.params.recovery_count()
    }

    /// Shard length in bytes, `B`.
    pub fn block_bytes(&self) -> usize {
        self.params.block_bytes()
    }

    /// Produces `recovery_count()` freshly allocated recovery shards from
    /// `originals`.
    ///
    /// `originals[i]` is treated as original index `i`.
    pub fn encode_to_owned(&self, originals: &[&[u8]]) -> Result<Vec<Vec<u8>>, Error> {
        if originals.len() != self.original_count() {
            return Err(Error::InvalidParams);
        }
        let blocks: Vec<Block> = originals
            .iter()
            .enumerate()
            .map(|(i, buf)| Block {
                buffer: buf,
                index: i as u8,
            })
            .collect();

        let mut owned = vec![vec![0u8; self.block_bytes()]; self.recovery_count()];
        {
            let mut recovery_blocks: Vec<BlockMut> = owned
                .iter_mut()
                .enumerate()
                .map(|(i, buf)| BlockMut {
                    buffer: buf,
                    index: (self.original_count() + i) as u8,
                })
                .collect();
            encode(&self.params, &blocks, &mut recovery_blocks)?;
        }
        Ok(owned)
    }

    /// Reconstructs missing originals in place.
    ///
    /// See [`crate::decode`] for the exact input/output contract.
    pub fn decode(&self, blocks: &mut [BlockMut]) -> Result<(), Error> {
        decode(&self.params, blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_single_erasure_roundtrips() {
        let codec = CauchyCodec::new(3, 2, 4).unwrap();
        let originals: Vec<Vec<u8>> = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 9, 9, 9]];
        let refs: Vec<&[u8]> = originals.iter().map(|v| v.as_slice()).collect();
        let recovery = codec.encode_to_owned(&refs).unwrap();

        let mut owned = vec![originals[0].clone(), originals[1].clone(), recovery[0].clone()];
        let (o0, rest) = owned.split_at_mut(1);
        let (o1, o2) = rest.split_at_mut(1);
        let mut blocks = vec![
            BlockMut { buffer: &mut o0[0], index: 0 },
            BlockMut { buffer: &mut o1[0], index: 1 },
            BlockMut { buffer: &mut o2[0], index: 3 },
        ];
        codec.decode(&mut blocks).unwrap();
        assert_eq!(blocks[2].buffer, originals[2].as_slice());
        assert_eq!(blocks[2].index, 2);
    }

    #[test]
    fn rejects_wrong_original_count() {
        let codec = CauchyCodec::new(3, 1, 4).unwrap();
        let a = vec![0u8; 4];
        let refs: Vec<&[u8]> = vec![&a, &a];
        assert_eq!(codec.encode_to_owned(&refs), Err(Error::InvalidParams));
    }
}
