// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Small dense linear algebra for density matrices and Fisher metrics.
//!
//! Matrices are `ndarray::Array2`; the Hermitian eigensolver is delegated
//! to `nalgebra::SymmetricEigen`, which accepts complex Hermitian input.
//! All routines target the few-qubit regime (dimension ≤ 2^10).

use nalgebra::DMatrix;
use ndarray::{s, Array1, Array2};
use num_complex::Complex64;

use crate::error::{NumericalError, PreconditionError, Result};

/// Iteration cap for the Hermitian eigensolver before reporting non-convergence.
pub const MAX_EIGEN_ITERATIONS: usize = 1_000;

/// Pivot magnitude below which a linear system is treated as singular.
pub const SINGULAR_PIVOT: f64 = 1e-15;

/// Conjugate transpose A†.
pub fn conjugate_transpose(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// Kronecker product A ⊗ B.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Trace Tr(A).
pub fn trace(a: &Array2<Complex64>) -> Complex64 {
    a.diag().iter().sum()
}

/// Eigendecomposition of a Hermitian matrix.
///
/// The input is symmetrized as (A + A†)/2 before decomposition so that
/// rounding noise in the anti-Hermitian part does not leak into the spectrum.
///
/// # Returns
/// `(eigenvalues, eigenvectors)` with eigenvalues sorted ascending and the
/// eigenvector for `eigenvalues[k]` stored in column `k`.
pub fn hermitian_eigh(a: &Array2<Complex64>) -> Result<(Vec<f64>, Array2<Complex64>)> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(PreconditionError::DimensionMismatch {
            field: "matrix columns".into(),
            expected: n,
            actual: a.ncols(),
        }
        .into());
    }
    if a.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(NumericalError::NonFinite("Hermitian matrix".into()).into());
    }
    if n == 0 {
        return Ok((Vec::new(), Array2::zeros((0, 0))));
    }

    let half = Complex64::new(0.5, 0.0);
    let hermitian = DMatrix::from_fn(n, n, |i, j| (a[[i, j]] + a[[j, i]].conj()) * half);

    let eigen = hermitian
        .try_symmetric_eigen(f64::EPSILON, MAX_EIGEN_ITERATIONS)
        .ok_or(NumericalError::EigenNonConvergence { dimension: n })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| eigen.eigenvalues[x].total_cmp(&eigen.eigenvalues[y]));

    let values = order.iter().map(|&k| eigen.eigenvalues[k]).collect();
    let vectors = Array2::from_shape_fn((n, n), |(i, k)| eigen.eigenvectors[(i, order[k])]);
    Ok((values, vectors))
}

/// Eigenvalues of a Hermitian matrix, ascending.
pub fn hermitian_eigenvalues(a: &Array2<Complex64>) -> Result<Vec<f64>> {
    hermitian_eigh(a).map(|(values, _)| values)
}

/// Principal square root of a Hermitian positive-semidefinite matrix.
///
/// Eigenvalues that rounding pushed below zero are clamped to zero, so the
/// result is always Hermitian PSD.
pub fn hermitian_sqrt(a: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let (values, vectors) = hermitian_eigh(a)?;
    let n = values.len();
    let mut scaled = vectors.clone();
    for (k, &lambda) in values.iter().enumerate() {
        let root = Complex64::new(lambda.max(0.0).sqrt(), 0.0);
        for i in 0..n {
            scaled[[i, k]] *= root;
        }
    }
    Ok(scaled.dot(&conjugate_transpose(&vectors)))
}

/// Solve A · x = b for real square A using Gaussian elimination with
/// partial pivoting.
///
/// Returns [`NumericalError::SingularMatrix`] when a pivot falls below
/// [`SINGULAR_PIVOT`].
pub fn solve_linear(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return Err(PreconditionError::DimensionMismatch {
            field: "linear system".into(),
            expected: n,
            actual: if n != a.ncols() { a.ncols() } else { b.len() },
        }
        .into());
    }
    if a.iter().chain(b.iter()).any(|x| !x.is_finite()) {
        return Err(NumericalError::NonFinite("linear system".into()).into());
    }

    // Augmented matrix [A | b]
    let mut aug = Array2::<f64>::zeros((n, n + 1));
    aug.slice_mut(s![.., ..n]).assign(a);
    aug.slice_mut(s![.., n]).assign(b);

    for col in 0..n {
        let mut max_val = 0.0;
        let mut max_row = col;
        for row in col..n {
            let val = aug[[row, col]].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        if pivot.abs() < SINGULAR_PIVOT {
            return Err(NumericalError::SingularMatrix { pivot: pivot.abs() }.into());
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / pivot;
            for j in col..=n {
                let val = aug[[col, j]];
                aug[[row, j]] -= factor * val;
            }
        }
    }

    // Back substitution
    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut sum = aug[[row, n]];
        for k in (row + 1)..n {
            sum -= aug[[row, k]] * x[k];
        }
        x[row] = sum / aug[[row, row]];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn pauli_y() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = c(0.0, -1.0);
        m[[1, 0]] = c(0.0, 1.0);
        m
    }

    fn assert_matrix_close(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        for ((i, j), val) in a.indexed_iter() {
            let diff = (val - b[[i, j]]).norm();
            assert!(
                diff < tol,
                "Mismatch at ({}, {}): {:?} vs {:?} (diff={})",
                i,
                j,
                val,
                b[[i, j]],
                diff
            );
        }
    }

    #[test]
    fn test_pauli_y_spectrum() {
        let values = hermitian_eigenvalues(&pauli_y()).unwrap();
        assert_relative_eq!(values[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eigh_reconstructs_matrix() {
        let mut h = Array2::zeros((3, 3));
        h[[0, 0]] = c(2.0, 0.0);
        h[[0, 1]] = c(0.5, -0.25);
        h[[1, 0]] = c(0.5, 0.25);
        h[[1, 1]] = c(-1.0, 0.0);
        h[[1, 2]] = c(0.0, 0.3);
        h[[2, 1]] = c(0.0, -0.3);
        h[[2, 2]] = c(0.7, 0.0);

        let (values, vectors) = hermitian_eigh(&h).unwrap();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));

        let mut diag = Array2::zeros((3, 3));
        for (k, v) in values.iter().enumerate() {
            diag[[k, k]] = c(*v, 0.0);
        }
        let rebuilt = vectors.dot(&diag).dot(&conjugate_transpose(&vectors));
        assert_matrix_close(&rebuilt, &h, 1e-10);
    }

    #[test]
    fn test_sqrt_squares_back() {
        let mut rho = Array2::zeros((2, 2));
        rho[[0, 0]] = c(0.7, 0.0);
        rho[[0, 1]] = c(0.2, 0.1);
        rho[[1, 0]] = c(0.2, -0.1);
        rho[[1, 1]] = c(0.3, 0.0);

        let root = hermitian_sqrt(&rho).unwrap();
        assert_matrix_close(&root.dot(&root), &rho, 1e-10);
    }

    #[test]
    fn test_sqrt_of_projector_is_projector() {
        let mut p = Array2::zeros((2, 2));
        p[[0, 0]] = c(1.0, 0.0);
        let root = hermitian_sqrt(&p).unwrap();
        assert_matrix_close(&root, &p, 1e-12);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut m = Array2::zeros((2, 2));
        m[[0, 0]] = c(f64::NAN, 0.0);
        let err = hermitian_eigenvalues(&m).unwrap_err();
        assert!(err.is_numerical());
    }

    #[test]
    fn test_kron_dimensions_and_values() {
        let y = pauli_y();
        let yy = kron(&y, &y);
        assert_eq!(yy.dim(), (4, 4));
        // (Y ⊗ Y)[0,3] = Y[0,1]·Y[0,1] = (-i)(-i) = -1
        assert_relative_eq!(yy[[0, 3]].re, -1.0, epsilon = 1e-14);
        // (Y ⊗ Y)[1,2] = Y[0,1]·Y[1,0] = (-i)(i) = 1
        assert_relative_eq!(yy[[1, 2]].re, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_trace() {
        let eye = Array2::from_diag_elem(4, c(1.0, 0.0));
        assert_relative_eq!(trace(&eye).re, 4.0, epsilon = 1e-14);
    }

    #[test]
    fn test_solve_linear() {
        let a = ndarray::arr2(&[[2.0, 1.0], [1.0, 3.0]]);
        let b = ndarray::arr1(&[3.0, 5.0]);
        let x = solve_linear(&a, &b).unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_linear_needs_pivoting() {
        let a = ndarray::arr2(&[[0.0, 1.0], [1.0, 0.0]]);
        let b = ndarray::arr1(&[2.0, 3.0]);
        let x = solve_linear(&a, &b).unwrap();
        assert_relative_eq!(x[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_linear_singular() {
        let a = ndarray::arr2(&[[1.0, 2.0], [2.0, 4.0]]);
        let b = ndarray::arr1(&[1.0, 1.0]);
        let err = solve_linear(&a, &b).unwrap_err();
        assert!(err.is_numerical());
    }
}
