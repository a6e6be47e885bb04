// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum natural gradient.
//!
//! Preconditions the gradient with the real part of the quantum geometric
//! (Fubini–Study) tensor of a parameterized state.
//!
//! Ref: Stokes et al. (2020), Quantum 4, 269.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, warn};

use super::types::QngConfig;
use crate::error::{Error, PreconditionError, Result};
use crate::linalg::solve_linear;
use crate::validation::validate_params;

/// Natural-gradient optimizer.
pub struct QngOptimizer {
    config: QngConfig,
    iteration: usize,
}

impl QngOptimizer {
    /// Create a new optimizer with the given configuration.
    pub fn new(config: QngConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        Ok(Self {
            config,
            iteration: 0,
        })
    }

    pub fn config(&self) -> &QngConfig {
        &self.config
    }

    /// Steps taken since construction or the last reset.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn reset(&mut self) {
        self.iteration = 0;
    }

    /// Fisher information F_ij = 4·Re(⟨∂ᵢψ|∂ⱼψ⟩ − ⟨∂ᵢψ|ψ⟩⟨ψ|∂ⱼψ⟩).
    ///
    /// Derivatives are forward differences with step `fisher_delta`; the
    /// upper triangle is computed and mirrored.
    pub fn compute_fisher_information<S>(&self, params: &[f64], state_fn: &S) -> Result<Array2<f64>>
    where
        S: Fn(&[f64]) -> Array1<Complex64> + ?Sized,
    {
        validate_params("params", params)?;
        let delta = self.config.fisher_delta;
        let psi = state_fn(params);
        if psi.is_empty() {
            return Err(PreconditionError::Field {
                field: "state_fn".into(),
                message: "returned an empty state".into(),
            }
            .into());
        }

        let n = params.len();
        let mut derivatives = Vec::with_capacity(n);
        let mut shifted = params.to_vec();
        for i in 0..n {
            shifted[i] += delta;
            let psi_i = state_fn(&shifted);
            shifted[i] = params[i];
            if psi_i.len() != psi.len() {
                return Err(PreconditionError::DimensionMismatch {
                    field: "state_fn output".into(),
                    expected: psi.len(),
                    actual: psi_i.len(),
                }
                .into());
            }
            derivatives.push((psi_i - &psi).mapv(|z| z / delta));
        }

        let overlaps: Vec<Complex64> = derivatives.iter().map(|d| inner(d, &psi)).collect();
        let mut fisher = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                let term = inner(&derivatives[i], &derivatives[j]) - overlaps[i] * overlaps[j].conj();
                let value = 4.0 * term.re;
                fisher[[i, j]] = value;
                fisher[[j, i]] = value;
            }
        }
        Ok(fisher)
    }

    /// One natural-gradient step: params − η·(F + εI)⁻¹·gradient.
    ///
    /// A singular or non-finite regularized metric falls back to the plain
    /// gradient; that is logged, not returned as an error.
    pub fn optimize_step<S>(
        &mut self,
        params: &[f64],
        gradient: &[f64],
        state_fn: &S,
    ) -> Result<Vec<f64>>
    where
        S: Fn(&[f64]) -> Array1<Complex64> + ?Sized,
    {
        if gradient.len() != params.len() {
            return Err(PreconditionError::DimensionMismatch {
                field: "gradient".into(),
                expected: params.len(),
                actual: gradient.len(),
            }
            .into());
        }

        let mut metric = self.compute_fisher_information(params, state_fn)?;
        for i in 0..params.len() {
            metric[[i, i]] += self.config.regularization;
        }

        let gradient = Array1::from(gradient.to_vec());
        let natural = match solve_linear(&metric, &gradient) {
            Ok(x) => x,
            Err(e) if e.is_numerical() => {
                warn!(
                    iteration = self.iteration,
                    error = %e,
                    "Fisher metric not invertible, using plain gradient"
                );
                gradient
            }
            Err(e) => return Err(e),
        };

        let lr = self.config.learning_rate;
        let updated: Vec<f64> = params
            .iter()
            .zip(natural.iter())
            .map(|(p, g)| p - lr * g)
            .collect();

        self.iteration += 1;
        debug!(iteration = self.iteration, "QNG step");
        Ok(updated)
    }
}

/// ⟨a|b⟩.
fn inner(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Complex64 {
    a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::hermitian_eigenvalues;
    use crate::schedule::{GateApplier, GateKind};
    use crate::state::StateVector;
    use approx::assert_relative_eq;

    /// RY(θ0) on q0, RY(θ1) on q1, ZZ(θ2), RX(θ3) on q0 applied to |00⟩.
    fn ansatz(params: &[f64]) -> Array1<Complex64> {
        let mut state = StateVector::zero(2).unwrap();
        state.apply_rotation(GateKind::Ry, 0, params[0]);
        state.apply_rotation(GateKind::Ry, 1, params[1]);
        state.apply_interaction(0, 1, params[2]).unwrap();
        state.apply_rotation(GateKind::Rx, 0, params[3]);
        state.into_amplitudes()
    }

    fn single_qubit(params: &[f64]) -> Array1<Complex64> {
        let mut state = StateVector::zero(1).unwrap();
        state.apply_rotation(GateKind::Ry, 0, params[0]);
        state.into_amplitudes()
    }

    fn optimizer() -> QngOptimizer {
        QngOptimizer::new(QngConfig::default()).unwrap()
    }

    fn to_complex(m: &Array2<f64>) -> Array2<Complex64> {
        m.mapv(|x| Complex64::new(x, 0.0))
    }

    #[test]
    fn test_fisher_symmetric_and_psd() {
        let opt = optimizer();
        for params in [[0.1, 0.2, 0.3, 0.4], [1.3, -0.7, 2.2, 0.05], [0.0, 0.0, 0.0, 0.0]] {
            let f = opt.compute_fisher_information(&params, &ansatz).unwrap();
            assert_eq!(f.dim(), (4, 4));
            for i in 0..4 {
                for j in 0..4 {
                    assert_eq!(f[[i, j]], f[[j, i]]);
                }
            }
            let eigenvalues = hermitian_eigenvalues(&to_complex(&f)).unwrap();
            assert!(
                eigenvalues.iter().all(|&l| l >= -1e-10),
                "eigenvalues {:?}",
                eigenvalues
            );
        }
    }

    #[test]
    fn test_fisher_single_rotation() {
        // |ψ(θ)⟩ = cos(θ/2)|0⟩ + sin(θ/2)|1⟩ has F = 4·(1/4) = 1
        let opt = optimizer();
        let f = opt.compute_fisher_information(&[0.7], &single_qubit).unwrap();
        assert_relative_eq!(f[[0, 0]], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_step_scales_by_inverse_metric() {
        let mut opt = optimizer();
        let params = [0.7];
        let updated = opt.optimize_step(&params, &[0.5], &single_qubit).unwrap();
        // F ≈ 1, so the natural gradient ≈ gradient
        assert_relative_eq!(updated[0], 0.7 - 0.01 * 0.5, epsilon = 1e-5);
        assert_eq!(opt.iteration(), 1);
    }

    #[test]
    fn test_singular_metric_falls_back_to_gradient() {
        // State independent of its parameter: F = 0 and no regularization
        let mut opt = QngOptimizer::new(QngConfig {
            regularization: 0.0,
            ..QngConfig::default()
        })
        .unwrap();
        let constant = |_: &[f64]| StateVector::bell().into_amplitudes();
        let updated = opt.optimize_step(&[1.0, 2.0], &[0.3, -0.4], &constant).unwrap();
        assert_relative_eq!(updated[0], 1.0 - 0.01 * 0.3, epsilon = 1e-15);
        assert_relative_eq!(updated[1], 2.0 + 0.01 * 0.4, epsilon = 1e-15);
        assert_eq!(opt.iteration(), 1);
    }

    #[test]
    fn test_reset_clears_iteration() {
        let mut opt = optimizer();
        opt.optimize_step(&[0.1], &[0.1], &single_qubit).unwrap();
        opt.optimize_step(&[0.1], &[0.1], &single_qubit).unwrap();
        assert_eq!(opt.iteration(), 2);
        opt.reset();
        assert_eq!(opt.iteration(), 0);
    }

    #[test]
    fn test_rejects_mismatched_gradient() {
        let mut opt = optimizer();
        assert!(opt.optimize_step(&[0.1, 0.2], &[0.1], &single_qubit).is_err());
        assert_eq!(opt.iteration(), 0);
    }

    #[test]
    fn test_rejects_changing_state_length() {
        let opt = optimizer();
        let unstable = |p: &[f64]| {
            if p[0] == 0.0 {
                single_qubit(p)
            } else {
                StateVector::bell().into_amplitudes()
            }
        };
        assert!(opt.compute_fisher_information(&[0.0], &unstable).is_err());
    }
}
