// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Entanglement metrics.
//!
//! Pure functions over a borrowed state vector. Cost is dominated by the
//! partial trace, which is exponential in the subsystem count.
//!
//! # Example
//!
//! ```
//! use qemo_core::entanglement::{compute_all_metrics, SubsystemPair};
//! use qemo_core::state::StateVector;
//!
//! let bell = StateVector::bell();
//! let report = compute_all_metrics(bell.amplitudes(), 2).unwrap();
//! let c = report.concurrence[&SubsystemPair::new(0, 1)].value;
//! assert!((c - 1.0).abs() < 0.1);
//! ```

pub mod measures;
pub mod report;

pub use measures::{
    concurrence, entanglement_spectrum, mutual_information, negativity, simplified_three_tangle,
    tangle, von_neumann_entropy, DEFAULT_ENTROPY_EPSILON,
};
pub use report::{
    compute_all_metrics, compute_all_metrics_with, Measured, MetricsConfig, MetricsReport,
    SubsystemPair,
};
