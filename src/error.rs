//! Error types for warehouse-replay.
//!
//! Only fatal conditions live here: a missing input, an undecipherable plan
//! document or an invalid configuration abort the run before any frame is
//! produced. Recoverable problems (a bad fact line, a rejected action) are
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s instead and never surface
//! as errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the fact or plan inputs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plan document is not valid JSON: {reason}")]
    MalformedPlan {
        reason: String,
    },

    #[error("Plan document is missing '{field}'")]
    MissingField {
        field: String,
    },

    #[error("Config file {} is invalid: {reason}", path.display())]
    MalformedConfig {
        path: PathBuf,
        reason: String,
    },

    #[error("Witness {index} requested but the plan only has {available}")]
    WitnessOutOfRange {
        index: usize,
        available: usize,
    },
}

impl InputError {
    /// Classifies an I/O failure on `path`, separating "not found" from other errors.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Validation errors for replay configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Delay {value} is invalid: must be between 0 and 3600 seconds")]
    InvalidDelay {
        value: f64,
    },

    #[error("Grid symbol '{name}' is invalid: {reason}")]
    InvalidSymbol {
        name: String,
        reason: String,
    },

    #[error("Witness selector '{value}' is invalid: expected 'first', 'last' or an index")]
    InvalidWitness {
        value: String,
    },
}

/// Top-level error type for warehouse-replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ReplayError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is an input error.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for warehouse-replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = InputError::from_io("facts.lp", io);
        assert!(matches!(err, InputError::NotFound { .. }));
        assert!(format!("{err}").contains("facts.lp"));
    }

    #[test]
    fn test_other_io_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = InputError::from_io("plan.json", io);
        assert!(matches!(err, InputError::Io { .. }));
        assert!(format!("{err}").contains("denied"));
    }

    #[test]
    fn test_witness_out_of_range_message() {
        let err = InputError::WitnessOutOfRange {
            index: 4,
            available: 2,
        };
        let msg = format!("{err}");
        assert!(msg.contains('4'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_replay_error_from_input() {
        let err: ReplayError = InputError::MissingField {
            field: "Call".to_string(),
        }
        .into();
        assert!(err.is_input());
        assert!(!err.is_validation());
        assert!(format!("{err}").contains("Call"));
    }

    #[test]
    fn test_replay_error_from_validation() {
        let err: ReplayError = ValidationError::InvalidDelay { value: -1.0 }.into();
        assert!(err.is_validation());
        assert!(format!("{err}").contains("-1"));
    }

    #[test]
    fn test_replay_error_internal() {
        let err = ReplayError::internal("digest encoding failed");
        assert!(err.is_internal());
        assert!(format!("{err}").contains("digest encoding failed"));
    }
}
