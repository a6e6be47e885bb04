// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense pure-state register.

use ndarray::Array1;
use num_complex::Complex64;
use tracing::warn;

use crate::error::{PreconditionError, Result};
use crate::schedule::{GateApplier, GateKind};
use crate::validation::{validate_pair, validate_register, validate_state};

/// Allowed deviation of Σ|ψᵢ|² from 1.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// Normalized amplitudes over `n` two-level subsystems.
///
/// Subsystem 0 is the most significant bit of the basis index.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    amplitudes: Array1<Complex64>,
    num_subsystems: usize,
}

impl StateVector {
    /// Wrap amplitudes that are already normalized.
    pub fn from_amplitudes(amplitudes: Array1<Complex64>, num_subsystems: usize) -> Result<Self> {
        validate_state(amplitudes.len(), num_subsystems)?;
        let norm_sqr = norm_sqr(&amplitudes);
        if !norm_sqr.is_finite() || (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(PreconditionError::Field {
                field: "state".into(),
                message: format!("squared norm {} is not 1", norm_sqr),
            }
            .into());
        }
        Ok(Self {
            amplitudes,
            num_subsystems,
        })
    }

    /// Normalize arbitrary non-zero amplitudes.
    pub fn normalized(amplitudes: Array1<Complex64>, num_subsystems: usize) -> Result<Self> {
        validate_state(amplitudes.len(), num_subsystems)?;
        let norm = norm_sqr(&amplitudes).sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(PreconditionError::Field {
                field: "state".into(),
                message: format!("cannot normalize a vector of norm {}", norm),
            }
            .into());
        }
        Ok(Self {
            amplitudes: amplitudes.mapv(|z| z / norm),
            num_subsystems,
        })
    }

    /// Computational basis state |index⟩.
    pub fn basis(num_subsystems: usize, index: usize) -> Result<Self> {
        validate_register(num_subsystems)?;
        let dim = 1usize << num_subsystems;
        if index >= dim {
            return Err(PreconditionError::Field {
                field: "index".into(),
                message: format!("basis index {} out of range for dimension {}", index, dim),
            }
            .into());
        }
        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_subsystems,
        })
    }

    /// |0…0⟩.
    pub fn zero(num_subsystems: usize) -> Result<Self> {
        Self::basis(num_subsystems, 0)
    }

    /// (|00⟩ + |11⟩)/√2.
    pub fn bell() -> Self {
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        Self {
            amplitudes: Array1::from(vec![h, zero, zero, h]),
            num_subsystems: 2,
        }
    }

    /// (|0…0⟩ + |1…1⟩)/√2.
    pub fn ghz(num_subsystems: usize) -> Result<Self> {
        let mut state = Self::zero(num_subsystems)?;
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        let last = state.amplitudes.len() - 1;
        state.amplitudes[0] = h;
        state.amplitudes[last] = h;
        Ok(state)
    }

    /// Equal superposition of all single-excitation basis states.
    pub fn w(num_subsystems: usize) -> Result<Self> {
        let mut state = Self::zero(num_subsystems)?;
        let amp = Complex64::new(1.0 / (num_subsystems as f64).sqrt(), 0.0);
        state.amplitudes[0] = Complex64::new(0.0, 0.0);
        for q in 0..num_subsystems {
            state.amplitudes[1usize << q] = amp;
        }
        Ok(state)
    }

    /// Borrow the amplitudes.
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Consume into the amplitude vector.
    pub fn into_amplitudes(self) -> Array1<Complex64> {
        self.amplitudes
    }

    pub fn num_subsystems(&self) -> usize {
        self.num_subsystems
    }

    /// Σ|ψᵢ|².
    pub fn norm_sqr(&self) -> f64 {
        norm_sqr(&self.amplitudes)
    }

    fn mask(&self, subsystem: usize) -> usize {
        1usize << (self.num_subsystems - 1 - subsystem)
    }
}

fn norm_sqr(amplitudes: &Array1<Complex64>) -> f64 {
    amplitudes.iter().map(|z| z.norm_sqr()).sum()
}

impl GateApplier for StateVector {
    /// An out-of-range `subsystem` leaves the state unchanged and logs a
    /// warning.
    fn apply_rotation(&mut self, gate: GateKind, subsystem: usize, angle: f64) {
        if subsystem >= self.num_subsystems {
            warn!(
                %gate,
                subsystem,
                num_subsystems = self.num_subsystems,
                "Ignoring rotation on out-of-range subsystem"
            );
            return;
        }

        let (s, c) = (angle / 2.0).sin_cos();
        let zero = Complex64::new(0.0, 0.0);
        // [[u00, u01], [u10, u11]] = exp(-i·angle·σ/2)
        let (u00, u01, u10, u11) = match gate {
            GateKind::Rx => (
                Complex64::new(c, 0.0),
                Complex64::new(0.0, -s),
                Complex64::new(0.0, -s),
                Complex64::new(c, 0.0),
            ),
            GateKind::Ry => (
                Complex64::new(c, 0.0),
                Complex64::new(-s, 0.0),
                Complex64::new(s, 0.0),
                Complex64::new(c, 0.0),
            ),
            GateKind::Rz => (Complex64::new(c, -s), zero, zero, Complex64::new(c, s)),
        };

        let mask = self.mask(subsystem);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                continue;
            }
            let j = i | mask;
            let (a0, a1) = (self.amplitudes[i], self.amplitudes[j]);
            self.amplitudes[i] = u00 * a0 + u01 * a1;
            self.amplitudes[j] = u10 * a0 + u11 * a1;
        }
    }

    fn supports_interaction(&self) -> bool {
        true
    }

    fn apply_interaction(&mut self, first: usize, second: usize, angle: f64) -> Result<()> {
        validate_pair(first, second, self.num_subsystems)?;
        let (m1, m2) = (self.mask(first), self.mask(second));
        let same = Complex64::from_polar(1.0, -angle / 2.0);
        let differ = Complex64::from_polar(1.0, angle / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let parity_even = (i & m1 == 0) == (i & m2 == 0);
            *amp *= if parity_even { same } else { differ };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_amplitudes_close(a: &Array1<Complex64>, b: &[Complex64]) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).norm() < 1e-12, "index {}: {:?} vs {:?}", i, x, y);
        }
    }

    #[test]
    fn test_presets_are_normalized() {
        assert_relative_eq!(StateVector::bell().norm_sqr(), 1.0, epsilon = 1e-12);
        for n in 1..=5 {
            assert_relative_eq!(StateVector::ghz(n).unwrap().norm_sqr(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(StateVector::w(n).unwrap().norm_sqr(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(StateVector::zero(n).unwrap().norm_sqr(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_w_state_support() {
        let w = StateVector::w(3).unwrap();
        let amps = w.amplitudes();
        let a = 1.0 / 3f64.sqrt();
        for (i, z) in amps.iter().enumerate() {
            let expected = if i.count_ones() == 1 { a } else { 0.0 };
            assert_relative_eq!(z.re, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_from_amplitudes_checks_norm() {
        let amps = Array1::from(vec![c(1.0, 0.0), c(1.0, 0.0)]);
        assert!(StateVector::from_amplitudes(amps.clone(), 1).is_err());
        let state = StateVector::normalized(amps, 1).unwrap();
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_amplitudes_checks_length() {
        let amps = Array1::from(vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)]);
        assert!(StateVector::from_amplitudes(amps, 2).is_err());
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        let amps = Array1::from(vec![c(0.0, 0.0); 4]);
        assert!(StateVector::normalized(amps, 2).is_err());
    }

    #[test]
    fn test_basis_out_of_range() {
        assert!(StateVector::basis(2, 4).is_err());
        assert!(StateVector::basis(0, 0).is_err());
    }

    #[test]
    fn test_rx_pi_flips() {
        let mut state = StateVector::zero(1).unwrap();
        state.apply_rotation(GateKind::Rx, 0, PI);
        assert_amplitudes_close(state.amplitudes(), &[c(0.0, 0.0), c(0.0, -1.0)]);
    }

    #[test]
    fn test_ry_half_pi_superposes() {
        let mut state = StateVector::zero(1).unwrap();
        state.apply_rotation(GateKind::Ry, 0, PI / 2.0);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_amplitudes_close(state.amplitudes(), &[c(h, 0.0), c(h, 0.0)]);
    }

    #[test]
    fn test_rz_phases() {
        let mut state = StateVector::zero(1).unwrap();
        state.apply_rotation(GateKind::Ry, 0, PI / 2.0);
        state.apply_rotation(GateKind::Rz, 0, PI);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_amplitudes_close(state.amplitudes(), &[c(0.0, -h), c(0.0, h)]);
    }

    #[test]
    fn test_rotation_targets_msb_subsystem() {
        let mut state = StateVector::zero(2).unwrap();
        state.apply_rotation(GateKind::Ry, 0, PI);
        // RY(π)|0⟩ = |1⟩ on subsystem 0 → index 0b10
        assert_relative_eq!(state.amplitudes()[2].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_rotation_is_ignored() {
        let mut state = StateVector::zero(2).unwrap();
        let before = state.clone();
        state.apply_rotation(GateKind::Rx, 5, 1.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rotations_preserve_norm() {
        let mut state = StateVector::ghz(3).unwrap();
        for (k, gate) in [GateKind::Rx, GateKind::Ry, GateKind::Rz].iter().enumerate() {
            for q in 0..3 {
                state.apply_rotation(*gate, q, 0.37 * (k + q + 1) as f64);
            }
        }
        state.apply_interaction(0, 2, 0.9).unwrap();
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zz_phases() {
        let mut state = StateVector::normalized(Array1::from(vec![c(1.0, 0.0); 4]), 2).unwrap();
        state.apply_interaction(0, 1, PI).unwrap();
        // even parity picks up e^{-iπ/2}, odd parity e^{iπ/2}
        assert_amplitudes_close(
            state.amplitudes(),
            &[c(0.0, -0.5), c(0.0, 0.5), c(0.0, 0.5), c(0.0, -0.5)],
        );
    }

    #[test]
    fn test_zz_entangles_plus_plus() {
        let mut state = StateVector::zero(2).unwrap();
        state.apply_rotation(GateKind::Ry, 0, PI / 2.0);
        state.apply_rotation(GateKind::Ry, 1, PI / 2.0);
        let before = crate::entanglement::concurrence(state.amplitudes(), 0, 1, 2).unwrap();
        assert!(before < 1e-6);

        state.apply_interaction(0, 1, PI / 2.0).unwrap();
        let after = crate::entanglement::concurrence(state.amplitudes(), 0, 1, 2).unwrap();
        assert_relative_eq!(after, 1.0, epsilon = 1e-6);
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interaction_rejects_bad_pair() {
        let mut state = StateVector::zero(2).unwrap();
        assert!(state.apply_interaction(0, 0, 1.0).is_err());
        assert!(state.apply_interaction(0, 2, 1.0).is_err());
    }
}
