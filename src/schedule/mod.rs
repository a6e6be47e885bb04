// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! PDE-inspired Hamiltonian schedules.
//!
//! Deterministic control-field generators (heat diffusion, wave oscillation,
//! coherent decay, reaction-diffusion and an emotion-driven selector) plus a
//! driver that discretizes an interval and issues gates to an external
//! state engine through [`GateApplier`].

pub mod dynamics;
pub mod evolution;
pub mod models;

pub use dynamics::{emotional_oscillation, emotional_relaxation, DynamicsSummary};
pub use evolution::{
    time_dependent_evolution, CouplingMode, EvolutionConfig, EvolutionStep, GateApplier,
    GateKind,
};
pub use models::{
    adaptive, heat, reaction_diffusion, schrodinger, wave, ControlTriple, EmotionalCondition,
    HamiltonianModel, Needs,
};
