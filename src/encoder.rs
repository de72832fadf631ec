//! Encoder: produces `m` recovery shards from `k` original shards.

use crate::{field, matrix, Block, BlockMut, EncoderParams, Error};

/// Produces `recovery_out.len()` recovery shards from `originals`.
///
/// `originals.len()` must equal `params.original_count()`,
/// `recovery_out.len()` must equal `params.recovery_count()`, and every
/// buffer (original and recovery) must be `params.block_bytes()` long.
pub fn encode(
    params: &EncoderParams,
    originals: &[Block],
    recovery_out: &mut [BlockMut],
) -> Result<(), Error> {
    let k = params.original_count();
    let m = params.recovery_count();
    let b = params.block_bytes();

    if originals.len() != k || recovery_out.len() != m {
        return Err(Error::InvalidParams);
    }
    for o in originals {
        if o.buffer.len() != b {
            return Err(Error::InvalidParams);
        }
    }
    for r in recovery_out.iter() {
        if r.buffer.len() != b {
            return Err(Error::InvalidParams);
        }
    }

    tracing::trace!(k, m, b, "encode");

    for (r, recovery) in recovery_out.iter_mut().enumerate() {
        encode_row(params, originals, r, recovery.buffer);
    }

    Ok(())
}

/// Computes the `r`-th recovery row (0-based) into `dst`.
fn encode_row(params: &EncoderParams, originals: &[Block], r: usize, dst: &mut [u8]) {
    let k = params.original_count();

    // Degenerate case: a single original shard is copied verbatim into
    // every recovery slot.
    if k == 1 {
        dst.copy_from_slice(originals[0].buffer);
        return;
    }

    // First row is the all-ones parity row: pure XOR of all originals.
    if r == 0 {
        field::addset_mem(dst, originals[0].buffer, originals[1].buffer);
        for original in &originals[2..k] {
            field::add_mem(dst, original.buffer);
        }
        return;
    }

    let x_0 = k as u8;
    let x_i = (k + r) as u8;

    let coeff0 = matrix::matrix_element(x_i, x_0, 0);
    field::mul_mem(dst, originals[0].buffer, coeff0);

    for (j, original) in originals.iter().enumerate().skip(1) {
        let coeff = matrix::matrix_element(x_i, x_0, j as u8);
        field::muladd_mem(dst, coeff, original.buffer);
    }
}
