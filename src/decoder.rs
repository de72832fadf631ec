//! Decoder: reconstructs erased original shards in place from any `k`
//! surviving original/recovery shards.

use smallvec::SmallVec;

use crate::{field, matrix, BlockMut, EncoderParams, Error};

const STACK_SHARDS: usize = 32;

/// Reconstructs missing originals in place.
///
/// `blocks` must have exactly `params.original_count()` entries with
/// distinct indices in `[0, params.total_count())`, all buffers
/// `params.block_bytes()` long. On success, every block that was a
/// recovery shard on input now holds the original shard named by its
/// (updated) `index`; surviving original shards are left untouched.
pub fn decode(params: &EncoderParams, blocks: &mut [BlockMut]) -> Result<(), Error> {
    let k = params.original_count();
    let b = params.block_bytes();

    if blocks.len() != k {
        return Err(Error::InvalidParams);
    }
    for block in blocks.iter() {
        if block.buffer.len() != b {
            return Err(Error::InvalidParams);
        }
    }

    tracing::trace!(k, m = params.recovery_count(), "decode");

    // Degenerate case: the sole supplied block already equals the
    // original (encode copied it verbatim into every recovery slot too).
    if k == 1 {
        blocks[0].index = 0;
        return Ok(());
    }

    let (original_positions, recovery_positions, erasure_indices) =
        initialize(params, blocks)?;

    tracing::trace!(erasures = recovery_positions.len(), "erasures identified");

    if recovery_positions.is_empty() {
        return Ok(());
    }

    // The XOR fast path is only valid when the lone present recovery
    // block is guaranteed to be the all-ones parity row, i.e. m == 1
    // (cm256.c:556 gates on the encoder's RecoveryCount, not the count of
    // recovery blocks actually supplied). For m > 1 a single erasure
    // falls through to decode_general, whose N == 1 case solves the
    // one-equation system directly regardless of which recovery row
    // survived.
    if params.recovery_count() == 1 {
        decode_m1(
            blocks,
            &original_positions,
            recovery_positions[0],
            erasure_indices[0],
        );
        return Ok(());
    }

    decode_general(params, blocks, &original_positions, &recovery_positions, &erasure_indices);
    Ok(())
}

/// Classifies the supplied blocks into original/recovery positions and
/// identifies which original indices are erased.
fn initialize(
    params: &EncoderParams,
    blocks: &[BlockMut],
) -> Result<
    (
        SmallVec<[usize; STACK_SHARDS]>,
        SmallVec<[usize; STACK_SHARDS]>,
        SmallVec<[u8; STACK_SHARDS]>,
    ),
    Error,
> {
    let k = params.original_count();

    let mut present = vec![false; k];
    let mut original_positions: SmallVec<[usize; STACK_SHARDS]> = SmallVec::new();
    let mut recovery_positions: SmallVec<[usize; STACK_SHARDS]> = SmallVec::new();

    for (pos, block) in blocks.iter().enumerate() {
        let row = block.index as usize;
        if row < k {
            if present[row] {
                return Err(Error::DuplicateIndex);
            }
            present[row] = true;
            original_positions.push(pos);
        } else {
            recovery_positions.push(pos);
        }
    }

    let mut erasure_indices: SmallVec<[u8; STACK_SHARDS]> = SmallVec::new();
    for (row, &seen) in present.iter().enumerate() {
        if !seen {
            erasure_indices.push(row as u8);
            if erasure_indices.len() >= recovery_positions.len() {
                break;
            }
        }
    }

    Ok((original_positions, recovery_positions, erasure_indices))
}

/// Borrows two distinct elements of a slice mutably at once.
fn two_distinct_mut<T>(slice: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "two_distinct_mut requires distinct indices");
    if a < b {
        let (left, right) = slice.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Fast path for a single erasure: the sole missing original is the XOR
/// of all surviving originals, by construction of the all-ones first row.
fn decode_m1(
    blocks: &mut [BlockMut],
    original_positions: &[usize],
    recovery_pos: usize,
    erased_index: u8,
) {
    for &op in original_positions {
        let (original, recovery) = two_distinct_mut(blocks, op, recovery_pos);
        field::add_mem(recovery.buffer, original.buffer);
    }
    blocks[recovery_pos].index = erased_index;
}

/// General decode for two or more erasures: cancel known originals, then
/// apply the LDU factorization of the Cauchy sub-matrix in place.
fn decode_general(
    params: &EncoderParams,
    blocks: &mut [BlockMut],
    original_positions: &[usize],
    recovery_positions: &[usize],
    erasure_indices: &[u8],
) {
    let x_0 = params.original_count() as u8;
    let n = recovery_positions.len();

    // Step 1: cancel known originals out of every recovery row. After
    // this, each recovery buffer is the linear combination of only the
    // erased originals.
    for &op in original_positions {
        let original_index = blocks[op].index;
        for &rp in recovery_positions {
            let x_i = blocks[rp].index;
            let coeff = matrix::matrix_element(x_i, x_0, original_index);
            let (original, recovery) = two_distinct_mut(blocks, op, rp);
            field::muladd_mem(recovery.buffer, coeff, original.buffer);
        }
    }

    let recovery_x: SmallVec<[u8; STACK_SHARDS]> =
        recovery_positions.iter().map(|&rp| blocks[rp].index).collect();

    let (l_rows, diag_d, u_cols) = generate_ldu(x_0, &recovery_x, erasure_indices);

    // Step 3: apply L^-1 (forward elimination).
    for (pivot, row) in l_rows.iter().enumerate() {
        for (offset, &coeff) in row.iter().enumerate() {
            let i = pivot + 1 + offset;
            let (src, dst) = two_distinct_mut(blocks, recovery_positions[pivot], recovery_positions[i]);
            field::muladd_mem(dst.buffer, coeff, src.buffer);
        }
    }

    // Step 4: apply D^-1 and relabel recovery blocks with the original
    // index each now holds.
    for i in 0..n {
        let pos = recovery_positions[i];
        let divisor = diag_d[i];
        let snapshot = blocks[pos].buffer.to_vec();
        field::div_mem(blocks[pos].buffer, &snapshot, divisor);
        blocks[pos].index = erasure_indices[i];
    }

    // Step 5: apply U^-1 (back substitution).
    for j in (1..n).rev() {
        let col = &u_cols[j];
        for i in (0..j).rev() {
            let coeff = col[i];
            let (src, dst) = two_distinct_mut(blocks, recovery_positions[j], recovery_positions[i]);
            field::muladd_mem(dst.buffer, coeff, src.buffer);
        }
    }
}

/// Boros-Kailath-Olshevsky Schur-type direct Cauchy factorization of the
/// `N x N` sub-matrix defined by `recovery_x` (rows) and `erasure_y`
/// (columns), specialized so the triangular factors' diagonals are
/// folded into `D`.
///
/// Returns `(l_rows, diag_d, u_cols)` where `l_rows[k]` holds `L[k+1..N][k]`
/// in increasing row order, and `u_cols[j]` holds `U[0..j][j]` in
/// increasing row order (empty for `j == 0`).
fn generate_ldu(
    x_0: u8,
    recovery_x: &[u8],
    erasure_y: &[u8],
) -> (Vec<Vec<u8>>, Vec<u8>, Vec<Vec<u8>>) {
    let n = recovery_x.len();
    debug_assert_eq!(n, erasure_y.len());

    let mut g = vec![1u8; n];
    let mut b = vec![1u8; n];
    let mut diag_d = vec![0u8; n];
    let mut l_rows: Vec<Vec<u8>> = Vec::with_capacity(n.saturating_sub(1));
    let mut u_cols: Vec<Vec<u8>> = (0..n).map(|j| vec![0u8; j]).collect();

    for k in 0..n - 1 {
        let x_k = recovery_x[k];
        let y_k = erasure_y[k];

        let d_kk = field::add(x_k, y_k);
        let l_kk = field::div(g[k], d_kk);
        let u_kk = field::mul(field::div(b[k], d_kk), field::add(x_0, y_k));
        diag_d[k] = field::mul(d_kk, field::mul(l_kk, u_kk));

        let mut l_row = Vec::with_capacity(n - k - 1);
        let mut u_row = Vec::with_capacity(n - k - 1);

        for j in k + 1..n {
            let x_j = recovery_x[j];
            let y_j = erasure_y[j];

            let l_jk = field::div(g[j], field::add(x_j, y_k));
            let u_kj = field::div(b[j], field::add(x_k, y_j));
            l_row.push(l_jk);
            u_row.push(u_kj);

            g[j] = field::mul(g[j], field::div(field::add(x_j, x_k), field::add(x_j, y_k)));
            b[j] = field::mul(b[j], field::div(field::add(y_j, y_k), field::add(y_j, x_k)));
        }

        for v in l_row.iter_mut() {
            *v = field::div(*v, l_kk);
        }
        for v in u_row.iter_mut() {
            *v = field::div(*v, u_kk);
        }

        for (offset, &val) in u_row.iter().enumerate() {
            let j = k + 1 + offset;
            u_cols[j][k] = val;
        }
        l_rows.push(l_row);
    }

    let x_n = recovery_x[n - 1];
    let y_n = erasure_y[n - 1];
    let l_nn = g[n - 1];
    let u_nn = field::mul(b[n - 1], field::add(x_0, y_n));
    diag_d[n - 1] = field::div(field::mul(l_nn, u_nn), field::add(x_n, y_n));

    // Fold (x_0 + y_j) into every off-diagonal entry of column j.
    for j in (1..n).rev() {
        let y_j = erasure_y[j];
        let factor = field::add(x_0, y_j);
        for v in u_cols[j].iter_mut() {
            *v = field::mul(*v, factor);
        }
    }

    (l_rows, diag_d, u_cols)
}
