//! Error types for the propagation engine.
//!
//! All errors are strongly typed using thiserror. Configuration problems and
//! bad call arguments are kept apart so callers can tell a broken indicator
//! set from a broken request.

use thiserror::Error;

use crate::indicator::IndicatorId;
use crate::source::SourceError;

/// Errors in the indicator/edge configuration a run depends on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Unknown indicator {id} referenced by {context}")]
    UnknownIndicator {
        id: IndicatorId,
        context: String,
    },

    #[error("Indicator {id} is registered more than once")]
    DuplicateIndicator {
        id: IndicatorId,
    },

    #[error("Indicator {id} has a non-finite baseline value {value}")]
    NonFiniteBaseline {
        id: IndicatorId,
        value: f64,
    },

    #[error("Edge {source_id} -> {target_id} has a non-finite coefficient {coefficient}")]
    NonFiniteCoefficient {
        source_id: IndicatorId,
        target_id: IndicatorId,
        coefficient: f64,
    },

    #[error("Invalid configuration: {reason}")]
    Invalid {
        reason: String,
    },
}

/// Errors in the arguments of a single call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("Horizon must be at least 1 year, got {horizon}")]
    NonPositiveHorizon {
        horizon: u32,
    },

    #[error("Reporting window starting at {start_year} with horizon {horizon} overflows the year range")]
    YearOverflow {
        start_year: i32,
        horizon: u32,
    },

    #[error("Scenario shock for indicator {id} is not finite: {value}")]
    NonFiniteShock {
        id: IndicatorId,
        value: f64,
    },

    #[error("Risk rule for indicator {id} has a non-finite threshold {threshold}")]
    NonFiniteThreshold {
        id: IndicatorId,
        threshold: f64,
    },

    #[error("Risk rule for indicator {id} has an empty message")]
    EmptyRuleMessage {
        id: IndicatorId,
    },
}

/// Errors raised by the scenario runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Scenario queue is full (capacity {capacity})")]
    QueueFull {
        capacity: usize,
    },

    #[error("Scenario runtime is disconnected")]
    Disconnected,

    #[error("Scenario timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl RippleError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if this is an invalid-argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true if this error came from a backing source or sink.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }

    /// Returns true if this error came from the scenario runtime.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if resubmitting the same request may succeed.
    ///
    /// Runs are pure and deterministic, so only runtime back-pressure is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Execution(e) => matches!(
                e,
                ExecutionError::QueueFull { .. } | ExecutionError::Timeout { .. }
            ),
            Self::Configuration(_) | Self::InvalidArgument(_) | Self::Source(_) | Self::Internal { .. } => {
                false
            }
        }
    }
}

/// Result type alias for engine operations.
pub type RippleResult<T> = Result<T, RippleError>;
