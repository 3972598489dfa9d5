//! Risk rules over cumulative deviations.
//!
//! Rules are evaluated against one year of the ledger, by convention the
//! injection cutoff year: the last year that received fresh transmissions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Forecast;
use crate::error::InvalidArgument;
use crate::indicator::IndicatorId;
use crate::ledger::DeltaLedger;

/// Strict comparison applied to a deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Fires when the deviation is strictly above the threshold.
    #[serde(rename = ">")]
    GreaterThan,
    /// Fires when the deviation is strictly below the threshold.
    #[serde(rename = "<")]
    LessThan,
}

impl Comparator {
    /// Apply the comparison.
    #[must_use]
    pub fn holds(self, observed: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => observed > threshold,
            Self::LessThan => observed < threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::LessThan => write!(f, "<"),
        }
    }
}

/// A threshold on one indicator's cumulative deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRule {
    /// Indicator checked.
    pub indicator_id: IndicatorId,
    /// Comparison direction.
    pub comparator: Comparator,
    /// Threshold in percent deviation from baseline.
    pub threshold: f64,
    /// Message emitted when the rule fires.
    pub message: String,
}

impl RiskRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(
        indicator_id: impl Into<IndicatorId>,
        comparator: Comparator,
        threshold: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            indicator_id: indicator_id.into(),
            comparator,
            threshold,
            message: message.into(),
        }
    }

    /// Fires when the deviation rises above `threshold`.
    #[must_use]
    pub fn above(indicator_id: impl Into<IndicatorId>, threshold: f64, message: impl Into<String>) -> Self {
        Self::new(indicator_id, Comparator::GreaterThan, threshold, message)
    }

    /// Fires when the deviation falls below `threshold`.
    #[must_use]
    pub fn below(indicator_id: impl Into<IndicatorId>, threshold: f64, message: impl Into<String>) -> Self {
        Self::new(indicator_id, Comparator::LessThan, threshold, message)
    }

    /// Rejects non-finite thresholds and blank messages.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        if !self.threshold.is_finite() {
            return Err(InvalidArgument::NonFiniteThreshold {
                id: self.indicator_id,
                threshold: self.threshold,
            });
        }
        if self.message.trim().is_empty() {
            return Err(InvalidArgument::EmptyRuleMessage { id: self.indicator_id });
        }
        Ok(())
    }

    /// Returns true if the rule fires for `observed`.
    #[must_use]
    pub fn fires(&self, observed: f64) -> bool {
        self.comparator.holds(observed, self.threshold)
    }
}

impl fmt::Display for RiskRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} {}", self.indicator_id, self.comparator, self.threshold)
    }
}

/// A rule that fired, with the value that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFlag {
    /// Indicator checked.
    pub indicator_id: IndicatorId,
    /// Comparison direction.
    pub comparator: Comparator,
    /// Rule threshold.
    pub threshold: f64,
    /// Deviation observed in the evaluation year.
    pub observed: f64,
    /// Rule message.
    pub message: String,
}

/// Stateless evaluator for risk rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskAnalyzer;

impl RiskAnalyzer {
    /// Messages of every rule that fires at `evaluation_year`, in rule order.
    ///
    /// Missing indicators and missing years read as zero deviation.
    #[must_use]
    pub fn evaluate(ledger: &DeltaLedger, evaluation_year: i32, rules: &[RiskRule]) -> Vec<String> {
        Self::evaluate_flags(ledger, evaluation_year, rules)
            .into_iter()
            .map(|flag| flag.message)
            .collect()
    }

    /// Structured form of `evaluate`.
    #[must_use]
    pub fn evaluate_flags(ledger: &DeltaLedger, evaluation_year: i32, rules: &[RiskRule]) -> Vec<RiskFlag> {
        rules
            .iter()
            .filter_map(|rule| {
                let observed = ledger.get(evaluation_year, rule.indicator_id);
                rule.fires(observed).then(|| RiskFlag {
                    indicator_id: rule.indicator_id,
                    comparator: rule.comparator,
                    threshold: rule.threshold,
                    observed,
                    message: rule.message.clone(),
                })
            })
            .collect()
    }

    /// Evaluate a forecast at its canonical evaluation year.
    #[must_use]
    pub fn evaluate_forecast(forecast: &Forecast, rules: &[RiskRule]) -> Vec<RiskFlag> {
        Self::evaluate_flags(forecast.ledger(), forecast.evaluation_year(), rules)
    }
}
