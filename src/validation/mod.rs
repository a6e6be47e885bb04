// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Precondition checks at the public call boundary.

use crate::error::{PreconditionError, Result};

/// Hard ceiling on subsystem count for dense density-matrix work.
///
/// Partial trace builds a 4^n-element outer product, so memory and time grow
/// exponentially with n.
pub const MAX_SUBSYSTEMS: usize = 10;

/// Ceiling on floor(duration / dt) for one evolution run.
pub const MAX_TIME_STEPS: usize = 100_000;

/// Validate a subsystem count for gate-level work (no ceiling).
pub fn validate_num_subsystems(num_subsystems: usize) -> Result<()> {
    if num_subsystems == 0 {
        return Err(PreconditionError::NoSubsystems.into());
    }
    Ok(())
}

/// Validate a subsystem count for a dense register: at least one and at
/// most [`MAX_SUBSYSTEMS`].
pub fn validate_register(num_subsystems: usize) -> Result<()> {
    validate_num_subsystems(num_subsystems)?;
    if num_subsystems > MAX_SUBSYSTEMS {
        return Err(PreconditionError::ResourceLimit {
            resource: "num_subsystems".into(),
            limit: MAX_SUBSYSTEMS as u64,
            requested: num_subsystems as u64,
        }
        .into());
    }
    Ok(())
}

/// Validate a state-vector length against `num_subsystems`.
pub fn validate_state(len: usize, num_subsystems: usize) -> Result<()> {
    validate_register(num_subsystems)?;
    let expected = 1usize << num_subsystems;
    if len != expected {
        return Err(PreconditionError::DimensionMismatch {
            field: "state".into(),
            expected,
            actual: len,
        }
        .into());
    }
    Ok(())
}

/// Validate a single subsystem index.
pub fn validate_subsystem(index: usize, num_subsystems: usize) -> Result<()> {
    if index >= num_subsystems {
        return Err(PreconditionError::InvalidSubsystem {
            index,
            num_subsystems,
        }
        .into());
    }
    Ok(())
}

/// Validate an unordered pair of distinct subsystems.
pub fn validate_pair(a: usize, b: usize, num_subsystems: usize) -> Result<()> {
    validate_subsystem(a, num_subsystems)?;
    validate_subsystem(b, num_subsystems)?;
    if a == b {
        return Err(PreconditionError::DuplicateSubsystem(a).into());
    }
    Ok(())
}

/// Validate a keep set for partial trace and return it sorted ascending.
pub fn validate_keep_set(keep: &[usize], num_subsystems: usize) -> Result<Vec<usize>> {
    let mut sorted = keep.to_vec();
    sorted.sort_unstable();
    for (i, &index) in sorted.iter().enumerate() {
        validate_subsystem(index, num_subsystems)?;
        if i > 0 && sorted[i - 1] == index {
            return Err(PreconditionError::DuplicateSubsystem(index).into());
        }
    }
    Ok(sorted)
}

/// Validate an evolution time grid, including the [`MAX_TIME_STEPS`]
/// ceiling on the step count.
pub fn validate_time_grid(duration: f64, dt: f64) -> Result<()> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(PreconditionError::Field {
            field: "dt".into(),
            message: format!("must be finite and > 0, got {}", dt),
        }
        .into());
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(PreconditionError::Field {
            field: "duration".into(),
            message: format!("must be finite and >= 0, got {}", duration),
        }
        .into());
    }
    let steps = (duration / dt).floor();
    if !steps.is_finite() || steps > MAX_TIME_STEPS as f64 {
        return Err(PreconditionError::ResourceLimit {
            resource: "steps".into(),
            limit: MAX_TIME_STEPS as u64,
            requested: if steps.is_finite() { steps as u64 } else { u64::MAX },
        }
        .into());
    }
    Ok(())
}

/// Validate that a parameter vector is non-empty and finite.
pub fn validate_params(field: &str, params: &[f64]) -> Result<()> {
    if params.is_empty() {
        return Err(PreconditionError::Field {
            field: field.into(),
            message: "must not be empty".into(),
        }
        .into());
    }
    if let Some(i) = params.iter().position(|p| !p.is_finite()) {
        return Err(PreconditionError::Field {
            field: field.into(),
            message: format!("contains non-finite value at index {}", i),
        }
        .into());
    }
    Ok(())
}
