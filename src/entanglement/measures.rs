// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pairwise and single-subsystem entanglement measures.
//!
//! Every measure reads a pure state through [`partial_trace`] and never
//! mutates it. Subsystem pairs are unordered; `(a, b)` and `(b, a)` give the
//! same value.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{PreconditionError, Result};
use crate::linalg::{hermitian_eigenvalues, hermitian_sqrt, kron};
use crate::state::partial_trace;
use crate::validation::{validate_pair, validate_state};

/// Eigenvalues at or below this are dropped from entropy sums.
pub const DEFAULT_ENTROPY_EPSILON: f64 = 1e-12;

/// Von Neumann entropy −Σ p·log₂ p of a density matrix.
///
/// Eigenvalues ≤ `epsilon` are filtered out rather than clamped, so rounding
/// noise never reaches `log₂`.
pub fn von_neumann_entropy(rho: &Array2<Complex64>, epsilon: f64) -> Result<f64> {
    let eigenvalues = hermitian_eigenvalues(rho)?;
    let entropy: f64 = eigenvalues
        .iter()
        .filter(|&&p| p > epsilon)
        .map(|&p| -p * p.log2())
        .sum();
    Ok(entropy)
}

/// Quantum mutual information I(a:b) = S(ρ_a) + S(ρ_b) − S(ρ_ab).
pub fn mutual_information(
    state: &Array1<Complex64>,
    a: usize,
    b: usize,
    num_subsystems: usize,
) -> Result<f64> {
    mutual_information_with(state, a, b, num_subsystems, DEFAULT_ENTROPY_EPSILON)
}

pub(crate) fn mutual_information_with(
    state: &Array1<Complex64>,
    a: usize,
    b: usize,
    num_subsystems: usize,
    epsilon: f64,
) -> Result<f64> {
    let rho_ab = pair_density(state, a, b, num_subsystems)?;
    let rho_a = partial_trace(state, &[a], num_subsystems)?;
    let rho_b = partial_trace(state, &[b], num_subsystems)?;
    Ok(von_neumann_entropy(&rho_a, epsilon)? + von_neumann_entropy(&rho_b, epsilon)?
        - von_neumann_entropy(&rho_ab, epsilon)?)
}

/// Wootters concurrence of the reduced state on `(a, b)`, in `[0, 1]`.
pub fn concurrence(
    state: &Array1<Complex64>,
    a: usize,
    b: usize,
    num_subsystems: usize,
) -> Result<f64> {
    let rho = pair_density(state, a, b, num_subsystems)?;
    concurrence_of(&rho)
}

/// Tangle, the squared concurrence.
pub fn tangle(state: &Array1<Complex64>, a: usize, b: usize, num_subsystems: usize) -> Result<f64> {
    concurrence(state, a, b, num_subsystems).map(|c| c * c)
}

/// Simplified three-tangle max(0, 1 − τ₀₁ − τ₀₂) over subsystems 0, 1, 2.
///
/// This is not the Coffman–Kundu–Wootters residual tangle: it ignores τ₁₂
/// and the one-versus-rest term. Values are comparable only with other
/// outputs of this function.
pub fn simplified_three_tangle(state: &Array1<Complex64>, num_subsystems: usize) -> Result<f64> {
    if num_subsystems < 3 {
        return Err(PreconditionError::TooFewSubsystems {
            required: 3,
            actual: num_subsystems,
        }
        .into());
    }
    let t01 = tangle(state, 0, 1, num_subsystems)?;
    let t02 = tangle(state, 0, 2, num_subsystems)?;
    Ok(simplified_three_tangle_from(t01, t02))
}

pub(crate) fn simplified_three_tangle_from(t01: f64, t02: f64) -> f64 {
    (1.0 - t01 - t02).max(0.0)
}

/// Negativity (‖ρ^{T_a}‖₁ − 1)/2 of the reduced state on `(a, b)`,
/// clamped at zero.
pub fn negativity(
    state: &Array1<Complex64>,
    a: usize,
    b: usize,
    num_subsystems: usize,
) -> Result<f64> {
    let rho = pair_density(state, a, b, num_subsystems)?;
    negativity_of(&rho)
}

/// Eigenvalues of each single-subsystem reduced state, ascending, one list
/// per subsystem.
pub fn entanglement_spectrum(
    state: &Array1<Complex64>,
    num_subsystems: usize,
) -> Result<Vec<Vec<f64>>> {
    validate_state(state.len(), num_subsystems)?;
    (0..num_subsystems)
        .map(|q| subsystem_spectrum(state, q, num_subsystems))
        .collect()
}

pub(crate) fn subsystem_spectrum(
    state: &Array1<Complex64>,
    subsystem: usize,
    num_subsystems: usize,
) -> Result<Vec<f64>> {
    let rho = partial_trace(state, &[subsystem], num_subsystems)?;
    hermitian_eigenvalues(&rho)
}

/// 4×4 reduced density matrix on an unordered pair.
pub(crate) fn pair_density(
    state: &Array1<Complex64>,
    a: usize,
    b: usize,
    num_subsystems: usize,
) -> Result<Array2<Complex64>> {
    validate_state(state.len(), num_subsystems)?;
    validate_pair(a, b, num_subsystems)?;
    partial_trace(state, &[a, b], num_subsystems)
}

fn pauli_y() -> Array2<Complex64> {
    let mut y = Array2::zeros((2, 2));
    y[[0, 1]] = Complex64::new(0.0, -1.0);
    y[[1, 0]] = Complex64::new(0.0, 1.0);
    y
}

/// Concurrence of a two-qubit density matrix.
///
/// ρ̃ = (Y⊗Y)·ρ*·(Y⊗Y), R = √(√ρ·ρ̃·√ρ); C = max(0, λ₁ − λ₂ − λ₃ − λ₄)
/// over R's eigenvalues in descending order.
pub(crate) fn concurrence_of(rho: &Array2<Complex64>) -> Result<f64> {
    let yy = {
        let y = pauli_y();
        kron(&y, &y)
    };
    let rho_tilde = yy.dot(&rho.mapv(|z| z.conj())).dot(&yy);
    let sqrt_rho = hermitian_sqrt(rho)?;
    let r = hermitian_sqrt(&sqrt_rho.dot(&rho_tilde).dot(&sqrt_rho))?;

    let mut lambdas = hermitian_eigenvalues(&r)?;
    lambdas.reverse();
    let c = lambdas[0] - lambdas[1..].iter().sum::<f64>();
    Ok(c.clamp(0.0, 1.0))
}

/// Negativity of a two-qubit density matrix via the partial transpose on
/// the first factor.
pub(crate) fn negativity_of(rho: &Array2<Complex64>) -> Result<f64> {
    // View ρ as (a_row, b_row, a_col, b_col) and swap a_row with a_col.
    let transposed = Array2::from_shape_fn((4, 4), |(i, j)| {
        rho[[2 * (j / 2) + i % 2, 2 * (i / 2) + j % 2]]
    });
    let trace_norm: f64 = hermitian_eigenvalues(&transposed)?
        .iter()
        .map(|l| l.abs())
        .sum();
    Ok(((trace_norm - 1.0) / 2.0).max(0.0))
}
