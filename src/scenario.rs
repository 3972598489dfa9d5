//! Policy scenarios: immediate percent shocks applied at the start year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgument;
use crate::indicator::IndicatorId;

/// Caller-supplied map of immediate percent shocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Optional human-readable label, e.g. "Abolish Payroll Tax".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Indicator -> percent shock.
    #[serde(default)]
    pub shocks: BTreeMap<IndicatorId, f64>,
}

impl Scenario {
    /// Creates an empty (zero-shock) scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scenario with a label.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            shocks: BTreeMap::new(),
        }
    }

    /// Sets the shock for one indicator, replacing any previous value.
    #[must_use]
    pub fn with_shock(mut self, id: impl Into<IndicatorId>, percent: f64) -> Self {
        self.shocks.insert(id.into(), percent);
        self
    }

    /// Shock for `id`, if any.
    #[must_use]
    pub fn shock(&self, id: IndicatorId) -> Option<f64> {
        self.shocks.get(&id).copied()
    }

    /// Returns true if no indicator is shocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shocks.is_empty()
    }

    /// Iterate shocks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (IndicatorId, f64)> + '_ {
        self.shocks.iter().map(|(id, pct)| (*id, *pct))
    }

    /// Rejects non-finite shocks.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        for (id, value) in self.iter() {
            if !value.is_finite() {
                return Err(InvalidArgument::NonFiniteShock { id, value });
            }
        }
        Ok(())
    }
}

impl FromIterator<(IndicatorId, f64)> for Scenario {
    fn from_iter<T: IntoIterator<Item = (IndicatorId, f64)>>(iter: T) -> Self {
        Self {
            name: None,
            shocks: iter.into_iter().collect(),
        }
    }
}
