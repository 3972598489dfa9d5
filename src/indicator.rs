//! Indicator and edge types.
//!
//! Indicators are the nodes of the causal graph; interaction edges carry a
//! percent change from one indicator to another after a fixed lag.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Caller-defined indicator key.
///
/// Identifiers are stable but not contiguous and not checked against any
/// external taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorId(u32);

impl IndicatorId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for IndicatorId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named indicator with its fixed reference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Indicator key.
    pub id: IndicatorId,
    /// Human-readable display name.
    pub name: String,
    /// Steady-state reference value. Never updated during a run.
    pub baseline_value: f64,
}

impl Indicator {
    /// Creates an indicator.
    #[must_use]
    pub fn new(id: impl Into<IndicatorId>, name: impl Into<String>, baseline_value: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            baseline_value,
        }
    }

    /// Checks that the baseline is a usable number.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.baseline_value.is_finite() {
            return Err(ConfigurationError::NonFiniteBaseline {
                id: self.id,
                value: self.baseline_value,
            });
        }
        Ok(())
    }
}

/// A causal transmission rule.
///
/// A change of `x` percent in `source_id`, observed `lag_years` after it
/// occurs, produces a change of `x * coefficient` percent in `target_id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionEdge {
    /// Indicator whose deviation is transmitted.
    pub source_id: IndicatorId,
    /// Indicator that receives the transmitted deviation.
    pub target_id: IndicatorId,
    /// Percent-per-percent transmission factor. Negative means inverse.
    pub coefficient: f64,
    /// Years between the source change and its effect on the target.
    pub lag_years: u32,
}

impl InteractionEdge {
    /// Creates an edge.
    #[must_use]
    pub fn new(
        source_id: impl Into<IndicatorId>,
        target_id: impl Into<IndicatorId>,
        coefficient: f64,
        lag_years: u32,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            coefficient,
            lag_years,
        }
    }

    /// Checks that the coefficient is a usable number.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.coefficient.is_finite() {
            return Err(ConfigurationError::NonFiniteCoefficient {
                source_id: self.source_id,
                target_id: self.target_id,
                coefficient: self.coefficient,
            });
        }
        Ok(())
    }

    /// Percent change delivered to the target for a `percent` change in the source.
    #[must_use]
    pub fn transmit(&self, percent: f64) -> f64 {
        percent * self.coefficient
    }
}

impl fmt::Display for InteractionEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (x{}, lag {}y)",
            self.source_id, self.target_id, self.coefficient, self.lag_years
        )
    }
}
