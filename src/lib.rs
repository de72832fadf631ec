//! Cauchy GF(256) MDS erasure coding over fixed-size shards.
//!
//! Given `k` equally-sized original shards, this crate produces `m`
//! recovery shards such that any `k` of the `k + m` shards are enough to
//! reconstruct the originals, with `k + m <= 256`. The construction is a
//! Cauchy generator matrix over GF(256): the first recovery row is a pure
//! XOR parity of the originals, and the rest are found via an LDU
//! factorization of the surviving-rows/erased-columns sub-matrix.
//!
//! See [`encode`] and [`decode`] for the low-level operations, or
//! [`CauchyCodec`] for a higher-level wrapper.

mod codec;
mod decoder;
mod encoder;
mod error;
mod field;
mod matrix;

pub use codec::CauchyCodec;
pub use decoder::decode;
pub use encoder::encode;
pub use error::Error;

use std::sync::Once;

/// This crate's compile-time version tag, checked by [`init`].
pub const VERSION: u32 = 1;

static INIT: Once = Once::new();

/// Verifies the caller's version tag against [`VERSION`] and initializes
/// the GF(256) field tables.
///
/// Not thread-sensitive: safe to call concurrently, and safe to call more
/// than once. Callers should invoke this once before any [`encode`] or
/// [`decode`] call, though the field tables are lazily built on first use
/// regardless.
pub fn init(version: u32) -> Result<(), Error> {
    if version != VERSION {
        return Err(Error::VersionMismatch);
    }
    INIT.call_once(|| {
        tracing::debug!("initializing GF(256) field tables");
        field::init();
    });
    Ok(())
}

/// Encoder/decoder parameters: shard count, recovery count, and the
/// common shard length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderParams {
    original_count: u16,
    recovery_count: u16,
    block_bytes: usize,
}

impl EncoderParams {
    /// Builds a validated parameter set.
    ///
    /// Errors with [`Error::InvalidParams`] if `original_count`,
    /// `recovery_count`, or `block_bytes` is zero, and
    /// [`Error::TooLarge`] if `original_count + recovery_count > 256`.
    pub fn new(
        original_count: usize,
        recovery_count: usize,
        block_bytes: usize,
    ) -> Result<Self, Error> {
        if original_count == 0 || recovery_count == 0 || block_bytes == 0 {
            return Err(Error::InvalidParams);
        }
        if original_count + recovery_count > 256 {
            return Err(Error::TooLarge);
        }
        Ok(EncoderParams {
            original_count: original_count as u16,
            recovery_count: recovery_count as u16,
            block_bytes,
        })
    }

    /// Number of original (data) shards, `k`.
    pub fn original_count(&self) -> usize {
        self.original_count as usize
    }

    /// Number of recovery (parity) shards, `m`.
    pub fn recovery_count(&self) -> usize {
        self.recovery_count as usize
    }

    /// Total shard count, `k + m`.
    pub fn total_count(&self) -> usize {
        self.original_count() + self.recovery_count()
    }

    /// Shard length in bytes, `B`.
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }
}

/// A borrowed original or recovery shard, with its wire index.
///
/// Indices in `[0, k)` denote original positions; indices in `[k, k+m)`
/// denote recovery positions.
#[derive(Debug)]
pub struct Block<'a> {
    pub buffer: &'a [u8],
    pub index: u8,
}

/// A mutably-borrowed shard, with its wire index.
///
/// Decoding mutates `buffer` in place for recovery entries and may
/// relabel `index` to the original position it now holds.
#[derive(Debug)]
pub struct BlockMut<'a> {
    pub buffer: &'a mut [u8],
    pub index: u8,
}

/// Maps a logical original shard index `i` in `[0, k)` to its wire index.
///
/// Per spec, this is simply `i`.
pub fn get_original_block_index(_params: &EncoderParams, i: usize) -> u8 {
    i as u8
}

/// Maps a logical recovery shard index `i` in `[0, m)` to its wire index.
///
/// Per spec, this is `k + i`.
pub fn get_recovery_block_index(params: &EncoderParams, i: usize) -> u8 {
    (params.original_count() + i) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_reject_zero_fields() {
        assert_eq!(EncoderParams::new(0, 1, 8), Err(Error::InvalidParams));
        assert_eq!(EncoderParams::new(1, 0, 8), Err(Error::InvalidParams));
        assert_eq!(EncoderParams::new(1, 1, 0), Err(Error::InvalidParams));
    }

    #[test]
    fn params_reject_too_large() {
        assert_eq!(EncoderParams::new(200, 100, 8), Err(Error::TooLarge));
        assert!(EncoderParams::new(200, 56, 8).is_ok());
    }

    #[test]
    fn index_mapping_matches_invariant() {
        let params = EncoderParams::new(4, 3, 16).unwrap();
        for i in 0..3 {
            let a = get_recovery_block_index(&params, i);
            let b = get_original_block_index(&params, 0);
            assert_eq!(a - b, (params.original_count() + i) as u8);
        }
    }

    #[test]
    fn init_rejects_version_mismatch() {
        assert_eq!(init(VERSION + 1), Err(Error::VersionMismatch));
        assert_eq!(init(VERSION), Ok(()));
    }
}
