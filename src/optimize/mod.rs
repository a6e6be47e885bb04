// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parameter optimizers.
//!
//! Three independent strategies minimizing a caller-supplied loss:
//!
//! - [`SpsaOptimizer`]: gradient-free, two loss evaluations per iteration
//! - [`QngOptimizer`]: natural-gradient steps preconditioned by the quantum
//!   Fisher information of a caller-supplied state function
//! - [`HybridOptimizer`]: SPSA followed by natural-gradient refinement
//!
//! Each instance owns its run state. Instances are not shared between
//! threads; create one per concurrent run.

pub mod hybrid;
pub mod qng;
pub mod spsa;
pub mod types;

pub use hybrid::{central_difference_gradient, HybridOptimizer};
pub use qng::QngOptimizer;
pub use spsa::{SpsaOptimizer, PLATEAU_WINDOW};
pub use types::{
    HybridConfig, HybridOutcome, HybridReport, OptimizerState, QngConfig, SpsaConfig,
    SpsaOutcome,
};
