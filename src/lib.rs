// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! QEMO numeric core
//!
//! Entanglement metrics, PDE-inspired Hamiltonian schedules and parameter
//! optimizers for a small quantum state used as a proxy for an agent's
//! emotional condition.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Caller (evolve → measure → tune)       │
//! ├───────────────┬───────────────┬──────────────┤
//! │  schedule     │  entanglement │  optimize    │
//! │  (gate        │  (partial     │  (SPSA, QNG, │
//! │   requests)   │   trace)      │   hybrid)    │
//! ├───────────────┴───────┬───────┴──────────────┤
//! │  GateApplier          │  state + linalg      │
//! │  (external engine)    │  (ndarray, nalgebra) │
//! └───────────────────────┴──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`state`]: State vectors, density matrices and partial trace
//! - [`entanglement`]: Pairwise and multipartite entanglement metrics
//! - [`schedule`]: Control-field models and the evolution driver
//! - [`optimize`]: SPSA, natural-gradient and hybrid optimizers
//! - [`validation`]: Input validation utilities
//! - [`linalg`]: Hermitian eigensolver and dense helpers
//! - [`error`]: Error types

pub mod config;
pub mod entanglement;
pub mod error;
pub mod linalg;
pub mod optimize;
pub mod schedule;
pub mod state;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
