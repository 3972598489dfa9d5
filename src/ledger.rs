//! Year-indexed state of a run.
//!
//! `DeltaLedger` holds cumulative percent deviations from baseline and is the
//! only evolving state of the engine. `SimulationResult` holds the absolute
//! values derived from it.
//!
//! Key invariants:
//! - Contributions to one (year, indicator) pair are summed, never overwritten,
//!   except by the engine's carry-forward step which writes the running total.
//! - Missing entries read as zero deviation.
//! - Iteration order is ascending by year, then by indicator id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::indicator::IndicatorId;

/// Per-year indicator values.
pub type YearValues = BTreeMap<IndicatorId, f64>;

/// Year -> (indicator -> cumulative percent deviation from baseline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeltaLedger {
    years: BTreeMap<i32, YearValues>,
}

impl DeltaLedger {
    /// Create a ledger with an empty entry for every year in `years`.
    #[must_use]
    pub fn with_years(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            years: years.into_iter().map(|y| (y, YearValues::new())).collect(),
        }
    }

    /// Deviation of `id` in `year`; zero when absent.
    #[must_use]
    pub fn get(&self, year: i32, id: IndicatorId) -> f64 {
        self.years
            .get(&year)
            .and_then(|values| values.get(&id))
            .copied()
            .unwrap_or(0.0)
    }

    /// All recorded deviations for `year`.
    #[must_use]
    pub fn year(&self, year: i32) -> Option<&YearValues> {
        self.years.get(&year)
    }

    /// Returns true if `year` is tracked.
    #[must_use]
    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// Tracked years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Iterate `(year, values)` in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearValues)> {
        self.years.iter().map(|(y, v)| (*y, v))
    }

    /// Deviation trajectory of one indicator across all tracked years.
    #[must_use]
    pub fn trajectory(&self, id: IndicatorId) -> Vec<(i32, f64)> {
        self.years().map(|y| (y, self.get(y, id))).collect()
    }

    /// Add `delta` to the entry for (`year`, `id`), summing with any prior contribution.
    pub(crate) fn accumulate(&mut self, year: i32, id: IndicatorId, delta: f64) {
        *self.years.entry(year).or_default().entry(id).or_insert(0.0) += delta;
    }

    /// Overwrite the entry for (`year`, `id`).
    pub(crate) fn set(&mut self, year: i32, id: IndicatorId, value: f64) {
        self.years.entry(year).or_default().insert(id, value);
    }

    /// Copy of one year's entries, taken before that year's transmissions.
    pub(crate) fn snapshot(&self, year: i32) -> Vec<(IndicatorId, f64)> {
        self.years
            .get(&year)
            .map(|values| values.iter().map(|(id, pct)| (*id, *pct)).collect())
            .unwrap_or_default()
    }
}

/// Year -> (indicator -> absolute value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationResult {
    years: BTreeMap<i32, YearValues>,
}

impl SimulationResult {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute value of `id` in `year`.
    #[must_use]
    pub fn value(&self, year: i32, id: IndicatorId) -> Option<f64> {
        self.years.get(&year).and_then(|values| values.get(&id)).copied()
    }

    /// All values for `year`.
    #[must_use]
    pub fn year(&self, year: i32) -> Option<&YearValues> {
        self.years.get(&year)
    }

    /// Years present, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Iterate `(year, values)` in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearValues)> {
        self.years.iter().map(|(y, v)| (*y, v))
    }

    pub(crate) fn insert_year(&mut self, year: i32, values: YearValues) {
        self.years.insert(year, values);
    }
}

/// Absolute value of an indicator at a given deviation from its baseline.
#[must_use]
pub fn apply_deviation(baseline: f64, deviation_pct: f64) -> f64 {
    baseline * (1.0 + deviation_pct / 100.0)
}
