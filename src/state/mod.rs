// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! State representation.
//!
//! A pure state is a vector of 2^n complex amplitudes with subsystem 0 as the
//! most significant bit of the basis index. Density matrices are derived on
//! demand and never cached.

pub mod density;
pub mod vector;

pub use density::{partial_trace, pure_density_matrix};
pub use vector::{StateVector, NORM_TOLERANCE};
