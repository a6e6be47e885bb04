// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities.

use ndarray::Array1;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::schedule::{GateApplier, GateKind};

/// One gate request seen by [`RecordingApplier`].
#[derive(Debug, Clone, PartialEq)]
pub enum GateCall {
    Rotation(GateKind, usize, f64),
    Interaction(usize, usize, f64),
}

/// Gate applier that records every request instead of touching a state.
#[derive(Debug, Default)]
pub struct RecordingApplier {
    pub calls: Vec<GateCall>,
    pub interaction: bool,
}

impl RecordingApplier {
    /// Recorder that also accepts two-subsystem interactions.
    pub fn with_interaction() -> Self {
        Self {
            calls: Vec::new(),
            interaction: true,
        }
    }
}

impl GateApplier for RecordingApplier {
    fn apply_rotation(&mut self, gate: GateKind, subsystem: usize, angle: f64) {
        self.calls.push(GateCall::Rotation(gate, subsystem, angle));
    }

    fn supports_interaction(&self) -> bool {
        self.interaction
    }

    fn apply_interaction(&mut self, first: usize, second: usize, angle: f64) -> Result<()> {
        self.calls.push(GateCall::Interaction(first, second, angle));
        Ok(())
    }
}

/// Seeded random normalized state over `num_subsystems`.
pub fn random_state(num_subsystems: usize, seed: u64) -> Array1<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dim = 1usize << num_subsystems;
    let raw: Array1<Complex64> = (0..dim)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let norm = raw.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    raw.mapv(|z| z / norm)
}

/// Normalized product state ⊗_q (cos θ_q |0⟩ + e^{iφ_q} sin θ_q |1⟩).
pub fn product_state(angles: &[(f64, f64)]) -> Array1<Complex64> {
    let mut state = Array1::from(vec![Complex64::new(1.0, 0.0)]);
    for &(theta, phi) in angles {
        let zero = Complex64::new(theta.cos(), 0.0);
        let one = Complex64::from_polar(theta.sin(), phi);
        let next: Array1<Complex64> = state
            .iter()
            .flat_map(|&a| [a * zero, a * one])
            .collect();
        state = next;
    }
    state
}
