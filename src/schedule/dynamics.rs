// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Emotional-dynamics presets built on the evolution driver.

use serde::Serialize;
use tracing::info;

use super::evolution::{time_dependent_evolution, EvolutionConfig, GateApplier};
use super::models::HamiltonianModel;
use crate::error::Result;

/// Default relaxation window.
pub const RELAXATION_DURATION: f64 = 2.0;

/// Default observation window for mood cycles.
pub const OSCILLATION_DURATION: f64 = 5.0;

/// Summary of a preset run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DynamicsSummary {
    Relaxation {
        duration: f64,
        steps: usize,
        /// Coupling at the last step, 0 when no step ran.
        final_coupling: f64,
    },
    Oscillation {
        frequency: f64,
        duration: f64,
        steps: usize,
    },
}

/// Relax an anxious state with heat diffusion, D = 1 + anxiety and
/// gradient = anxiety (anxiety conventionally in `[0, 1]`).
pub fn emotional_relaxation<A>(
    applier: &mut A,
    anxiety_level: f64,
    num_subsystems: usize,
    duration: f64,
) -> Result<DynamicsSummary>
where
    A: GateApplier + ?Sized,
{
    let config = EvolutionConfig {
        num_subsystems,
        duration,
        ..EvolutionConfig::default()
    };
    let model = HamiltonianModel::Heat {
        diffusion_rate: 1.0 + anxiety_level,
        gradient: anxiety_level,
    };
    let history = time_dependent_evolution(applier, &config, &model)?;
    let final_coupling = history.last().map_or(0.0, |step| step.controls.coupling);

    info!(
        anxiety_level,
        steps = history.len(),
        final_coupling,
        "Emotional relaxation complete"
    );

    Ok(DynamicsSummary::Relaxation {
        duration,
        steps: history.len(),
        final_coupling,
    })
}

/// Drive a mood cycle with a unit-amplitude wave at `mood_frequency`.
pub fn emotional_oscillation<A>(
    applier: &mut A,
    mood_frequency: f64,
    num_subsystems: usize,
    duration: f64,
) -> Result<DynamicsSummary>
where
    A: GateApplier + ?Sized,
{
    let config = EvolutionConfig {
        num_subsystems,
        duration,
        ..EvolutionConfig::default()
    };
    let model = HamiltonianModel::Wave {
        frequency: mood_frequency,
        amplitude: 1.0,
        phase: 0.0,
    };
    let history = time_dependent_evolution(applier, &config, &model)?;

    info!(
        mood_frequency,
        steps = history.len(),
        "Emotional oscillation complete"
    );

    Ok(DynamicsSummary::Oscillation {
        frequency: mood_frequency,
        duration,
        steps: history.len(),
    })
}
