// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Density matrices derived from a pure state.

use ndarray::{Array1, Array2, ArrayD, Axis, IxDyn};
use num_complex::Complex64;

use crate::error::Result;
use crate::validation::{validate_keep_set, validate_state};

/// Pure-state density matrix |ψ⟩⟨ψ|.
pub fn pure_density_matrix(state: &Array1<Complex64>) -> Array2<Complex64> {
    let d = state.len();
    Array2::from_shape_fn((d, d), |(i, j)| state[i] * state[j].conj())
}

/// Reduced density matrix of `state` on the subsystems in `keep`.
///
/// The outer product is viewed as a 2n-axis tensor (row axes for subsystems
/// 0..n, then column axes) and the row/column pair of every subsystem outside
/// `keep` is traced out, highest index first so lower axis positions stay
/// put. Kept subsystems appear in ascending index order regardless of the
/// order of `keep`.
///
/// Time and memory are O(4^n); `n` is capped by
/// [`MAX_SUBSYSTEMS`](crate::validation::MAX_SUBSYSTEMS).
///
/// # Returns
/// A 2^|keep| × 2^|keep| matrix.
pub fn partial_trace(
    state: &Array1<Complex64>,
    keep: &[usize],
    num_subsystems: usize,
) -> Result<Array2<Complex64>> {
    validate_state(state.len(), num_subsystems)?;
    let keep = validate_keep_set(keep, num_subsystems)?;
    let n = num_subsystems;

    let mut tensor: ArrayD<Complex64> = ArrayD::from_shape_fn(IxDyn(&vec![2; 2 * n]), |idx| {
        let (mut row, mut col) = (0usize, 0usize);
        for b in 0..n {
            row = (row << 1) | idx[b];
            col = (col << 1) | idx[n + b];
        }
        state[row] * state[col].conj()
    });

    for q in (0..n).rev() {
        if keep.binary_search(&q).is_ok() {
            continue;
        }
        let m = tensor.ndim() / 2;
        let view = tensor.view();
        let traced = &view
            .clone()
            .index_axis_move(Axis(q + m), 0)
            .index_axis_move(Axis(q), 0)
            + &view
                .index_axis_move(Axis(q + m), 1)
                .index_axis_move(Axis(q), 1);
        tensor = traced;
    }

    let k = keep.len();
    let d = 1usize << k;
    let mut idx = vec![0usize; 2 * k];
    Ok(Array2::from_shape_fn((d, d), |(r, c)| {
        for b in 0..k {
            idx[b] = (r >> (k - 1 - b)) & 1;
            idx[k + b] = (c >> (k - 1 - b)) & 1;
        }
        tensor[IxDyn(&idx)]
    }))
}
