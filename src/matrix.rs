//! Cauchy matrix element generator.
//!
//! The encoder and decoder both fix `x_i = k + i` for recovery row `i`,
//! `y_j = j` for original column `j`, and a normalizer `x_0 = k`. This
//! module computes a single entry of that Cauchy matrix.

use crate::field;

/// `a(x_i, x_0, y_j) = (y_j + x_0) / (x_i + y_j)` in GF(256).
///
/// For `x_i == x_0` this returns 1 by construction, but callers must not
/// rely on that — the first recovery row is handled as a pure XOR fast
/// path and never calls this function.
#[inline]
pub fn matrix_element(x_i: u8, x_0: u8, y_j: u8) -> u8 {
    field::div(field::add(y_j, x_0), field::add(x_i, y_j))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_row_is_identity() {
        // x_i == x_0 always yields 1, regardless of y_j.
        for y_j in 0u8..10 {
            assert_eq!(matrix_element(4, 4, y_j), 1);
        }
    }

    #[test]
    fn denominator_never_zero_for_disjoint_coordinates() {
        // y_j < k <= x_i, so x_i + y_j is never zero for any valid pairing.
        let k = 10u8;
        for i in 0u8..5 {
            for y_j in 0..k {
                let x_i = k + i;
                assert_ne!(field::add(x_i, y_j), 0);
                let _ = matrix_element(x_i, k, y_j);
            }
        }
    }
}
