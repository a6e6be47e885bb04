// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the emotional quantum core.

use std::fmt;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Contract violation at a call boundary
    Precondition(PreconditionError),
    /// Numerical failure inside a linear-algebra routine
    Numerical(NumericalError),
    /// Collaborator lacks a requested capability
    Unsupported(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Precondition(e) => write!(f, "Precondition violated: {}", e),
            Error::Numerical(e) => write!(f, "Numerical instability: {}", e),
            Error::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Precondition(e) => Some(e),
            Error::Numerical(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Whether this error is a numerical failure that callers may degrade
    /// to a zero-valued result instead of aborting.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::Numerical(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<PreconditionError> for Error {
    fn from(e: PreconditionError) -> Self {
        Error::Precondition(e)
    }
}

impl From<NumericalError> for Error {
    fn from(e: NumericalError) -> Self {
        Error::Numerical(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Contract violations detected at a call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PreconditionError {
    /// At least one subsystem is required
    NoSubsystems,
    /// Subsystem index outside [0, n)
    InvalidSubsystem { index: usize, num_subsystems: usize },
    /// The same subsystem was named twice
    DuplicateSubsystem(usize),
    /// Operation needs more subsystems than the state has
    TooFewSubsystems { required: usize, actual: usize },
    /// Vector or matrix has the wrong length
    DimensionMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    /// Field validation failed
    Field { field: String, message: String },
    /// Resource ceiling exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreconditionError::NoSubsystems => write!(f, "at least one subsystem is required"),
            PreconditionError::InvalidSubsystem {
                index,
                num_subsystems,
            } => write!(
                f,
                "subsystem index {} out of range for {} subsystems",
                index, num_subsystems
            ),
            PreconditionError::DuplicateSubsystem(index) => {
                write!(f, "subsystem {} listed more than once", index)
            }
            PreconditionError::TooFewSubsystems { required, actual } => write!(
                f,
                "operation requires at least {} subsystems, got {}",
                required, actual
            ),
            PreconditionError::DimensionMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "'{}' has length {}, expected {}",
                field, actual, expected
            ),
            PreconditionError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            PreconditionError::ResourceLimit {
                resource,
                limit,
                requested,
            } => write!(
                f,
                "Resource limit exceeded for {}: limit={}, requested={}",
                resource, limit, requested
            ),
        }
    }
}

impl std::error::Error for PreconditionError {}

/// Numerical failures from eigensolvers and linear solves.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalError {
    /// Hermitian eigendecomposition did not converge
    EigenNonConvergence { dimension: usize },
    /// Pivot fell below the singularity threshold
    SingularMatrix { pivot: f64 },
    /// Input contained NaN or infinite entries
    NonFinite(String),
}

impl fmt::Display for NumericalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericalError::EigenNonConvergence { dimension } => write!(
                f,
                "eigendecomposition of {}x{} matrix did not converge",
                dimension, dimension
            ),
            NumericalError::SingularMatrix { pivot } => {
                write!(f, "matrix is singular (pivot magnitude {:.3e})", pivot)
            }
            NumericalError::NonFinite(what) => write!(f, "non-finite values in {}", what),
        }
    }
}

impl std::error::Error for NumericalError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // =========================================================================
    // Error Display tests
    // =========================================================================

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("alpha must be > 0".into());
        assert_eq!(e.to_string(), "Configuration error: alpha must be > 0");
    }

    #[test]
    fn test_error_display_precondition() {
        let e = Error::Precondition(PreconditionError::InvalidSubsystem {
            index: 4,
            num_subsystems: 3,
        });
        assert_eq!(
            e.to_string(),
            "Precondition violated: subsystem index 4 out of range for 3 subsystems"
        );
    }

    #[test]
    fn test_error_display_numerical() {
        let e = Error::Numerical(NumericalError::EigenNonConvergence { dimension: 4 });
        assert_eq!(
            e.to_string(),
            "Numerical instability: eigendecomposition of 4x4 matrix did not converge"
        );
    }

    #[test]
    fn test_error_display_unsupported() {
        let e = Error::Unsupported("two-subsystem gates".into());
        assert_eq!(e.to_string(), "Unsupported operation: two-subsystem gates");
    }

    #[test]
    fn test_error_display_io() {
        let e = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "IO error: gone");
    }

    #[test]
    fn test_error_display_serialization() {
        let e = Error::Serialization("invalid yaml".into());
        assert_eq!(e.to_string(), "Serialization error: invalid yaml");
    }

    // =========================================================================
    // PreconditionError / NumericalError Display tests
    // =========================================================================

    #[test]
    fn test_precondition_display_dimension_mismatch() {
        let e = PreconditionError::DimensionMismatch {
            field: "state".into(),
            expected: 8,
            actual: 6,
        };
        assert_eq!(e.to_string(), "'state' has length 6, expected 8");
    }

    #[test]
    fn test_precondition_display_resource_limit() {
        let e = PreconditionError::ResourceLimit {
            resource: "num_subsystems".into(),
            limit: 10,
            requested: 12,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for num_subsystems: limit=10, requested=12"
        );
    }

    #[test]
    fn test_precondition_display_too_few() {
        let e = PreconditionError::TooFewSubsystems {
            required: 3,
            actual: 2,
        };
        assert_eq!(
            e.to_string(),
            "operation requires at least 3 subsystems, got 2"
        );
    }

    #[test]
    fn test_numerical_display_singular() {
        let e = NumericalError::SingularMatrix { pivot: 0.0 };
        assert!(e.to_string().starts_with("matrix is singular"));
    }

    // =========================================================================
    // Error::source() and From impls
    // =========================================================================

    #[test]
    fn test_error_source_precondition() {
        let e = Error::Precondition(PreconditionError::NoSubsystems);
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_config() {
        let e = Error::Config("x".into());
        assert!(e.source().is_none());
    }

    #[test]
    fn test_is_numerical() {
        let e: Error = NumericalError::NonFinite("state".into()).into();
        assert!(e.is_numerical());
        let e: Error = PreconditionError::NoSubsystems.into();
        assert!(!e.is_numerical());
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }
}
