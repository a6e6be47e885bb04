// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Time-discretized evolution driver.
//!
//! The driver samples a [`HamiltonianModel`] on a uniform grid and turns each
//! control triple into gate requests on an external [`GateApplier`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::{ControlTriple, HamiltonianModel};
use crate::error::{Error, NumericalError, Result};
use crate::validation::{validate_num_subsystems, validate_time_grid};

/// Single-subsystem rotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    Rx,
    Ry,
    Rz,
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Rx => write!(f, "RX"),
            GateKind::Ry => write!(f, "RY"),
            GateKind::Rz => write!(f, "RZ"),
        }
    }
}

/// Gate-application capability of an external state engine.
pub trait GateApplier {
    /// Apply exp(−i·angle·σ/2) to one subsystem.
    ///
    /// This call is infallible. Callers keep `subsystem` inside the
    /// engine's register; an implementation may treat an out-of-range
    /// index as a no-op, and [`StateVector`](crate::state::StateVector)
    /// does so with a warning.
    fn apply_rotation(&mut self, gate: GateKind, subsystem: usize, angle: f64);

    /// Whether [`GateApplier::apply_interaction`] is available.
    fn supports_interaction(&self) -> bool {
        false
    }

    /// Apply exp(−i·angle·Z⊗Z/2) to a pair of subsystems.
    fn apply_interaction(&mut self, first: usize, second: usize, _angle: f64) -> Result<()> {
        Err(Error::Unsupported(format!(
            "two-subsystem interaction on ({}, {})",
            first, second
        )))
    }
}

impl<F> GateApplier for F
where
    F: FnMut(GateKind, usize, f64),
{
    fn apply_rotation(&mut self, gate: GateKind, subsystem: usize, angle: f64) {
        self(gate, subsystem, angle)
    }
}

/// How coupling above threshold is realized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouplingMode {
    /// Single-subsystem RY(coupling·dt·scale) on the lower subsystem of each
    /// neighbouring pair.
    #[default]
    Legacy,
    /// Genuine ZZ interaction on (q, q+1) with angle coupling·dt.
    Physical,
}

impl FromStr for CouplingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(CouplingMode::Legacy),
            "physical" => Ok(CouplingMode::Physical),
            other => Err(format!(
                "unknown coupling mode '{}' (expected legacy or physical)",
                other
            )),
        }
    }
}

impl fmt::Display for CouplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CouplingMode::Legacy => write!(f, "legacy"),
            CouplingMode::Physical => write!(f, "physical"),
        }
    }
}

/// Evolution grid and coupling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of subsystems driven.
    #[serde(default = "default_num_subsystems")]
    pub num_subsystems: usize,
    /// Total evolution time.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Time step.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Coupling strength above which a coupling gate is issued.
    #[serde(default = "default_coupling_threshold")]
    pub coupling_threshold: f64,
    /// Angle scale of the legacy RY coupling proxy.
    #[serde(default = "default_coupling_scale")]
    pub coupling_scale: f64,
    /// Coupling realization.
    #[serde(default)]
    pub coupling_mode: CouplingMode,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            num_subsystems: default_num_subsystems(),
            duration: default_duration(),
            dt: default_dt(),
            coupling_threshold: default_coupling_threshold(),
            coupling_scale: default_coupling_scale(),
            coupling_mode: CouplingMode::default(),
        }
    }
}

impl EvolutionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.num_subsystems == 0 {
            return Err("schedule.num_subsystems must be > 0".into());
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err("schedule.dt must be finite and > 0".into());
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err("schedule.duration must be finite and >= 0".into());
        }
        validate_time_grid(self.duration, self.dt).map_err(|e| format!("schedule: {}", e))?;
        if !self.coupling_threshold.is_finite() {
            return Err("schedule.coupling_threshold must be finite".into());
        }
        if !self.coupling_scale.is_finite() {
            return Err("schedule.coupling_scale must be finite".into());
        }
        Ok(())
    }

    /// Number of grid steps, floor(duration / dt).
    pub fn num_steps(&self) -> usize {
        (self.duration / self.dt).floor() as usize
    }
}

fn default_num_subsystems() -> usize {
    4
}

fn default_duration() -> f64 {
    1.0
}

fn default_dt() -> f64 {
    0.1
}

fn default_coupling_threshold() -> f64 {
    0.1
}

fn default_coupling_scale() -> f64 {
    0.1
}

/// One sampled grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvolutionStep {
    /// Step time, step·dt.
    pub t: f64,
    #[serde(flatten)]
    pub controls: ControlTriple,
}

/// Drive `applier` through `model` on the grid described by `config`.
///
/// At each step the control triple at t = step·dt is computed, then every
/// subsystem q receives RZ(longitudinal·dt) followed by RX(transverse·dt).
/// When coupling exceeds the threshold and q is not the last subsystem, a
/// coupling gate follows according to [`CouplingMode`].
///
/// # Errors
/// * Precondition violation for an empty register or a bad time grid.
/// * [`Error::Unsupported`] when physical coupling is requested from an
///   applier without an interaction gate; no gate is issued in that case.
/// * [`NumericalError::NonFinite`] if the model yields a non-finite triple.
pub fn time_dependent_evolution<A>(
    applier: &mut A,
    config: &EvolutionConfig,
    model: &HamiltonianModel,
) -> Result<Vec<EvolutionStep>>
where
    A: GateApplier + ?Sized,
{
    let n = config.num_subsystems;
    validate_num_subsystems(n)?;
    validate_time_grid(config.duration, config.dt)?;

    if config.coupling_mode == CouplingMode::Physical && !applier.supports_interaction() {
        return Err(Error::Unsupported(
            "physical coupling requires a two-subsystem interaction gate".into(),
        ));
    }

    let dt = config.dt;
    let steps = config.num_steps();
    let mut history = Vec::with_capacity(steps);

    for step in 0..steps {
        let t = step as f64 * dt;
        let controls = model.controls(t);
        if !controls.is_finite() {
            return Err(NumericalError::NonFinite(format!(
                "{} controls at t={}",
                model.name(),
                t
            ))
            .into());
        }

        for q in 0..n {
            applier.apply_rotation(GateKind::Rz, q, controls.longitudinal * dt);
            applier.apply_rotation(GateKind::Rx, q, controls.transverse * dt);

            if controls.coupling > config.coupling_threshold && q + 1 < n {
                match config.coupling_mode {
                    CouplingMode::Legacy => applier.apply_rotation(
                        GateKind::Ry,
                        q,
                        controls.coupling * dt * config.coupling_scale,
                    ),
                    CouplingMode::Physical => {
                        applier.apply_interaction(q, q + 1, controls.coupling * dt)?
                    }
                }
            }
        }

        history.push(EvolutionStep { t, controls });
    }

    debug!(
        model = model.name(),
        steps,
        num_subsystems = n,
        coupling_mode = %config.coupling_mode,
        "Evolution complete"
    );

    Ok(history)
}
