//! Run output: the reporting window, the forecast and its identity.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidArgument;
use crate::ledger::{DeltaLedger, SimulationResult, YearValues};

/// Stable identifier for one propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The calendar years a run reports on.
///
/// Reporting years are `start_year ..= start_year + horizon`. The injection
/// cutoff year, `start_year + horizon - 1`, is the last year that may receive
/// new transmissions; the final year only carries deviations forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    start_year: i32,
    horizon: u32,
}

impl ReportingWindow {
    /// Validate and build a window.
    pub fn new(start_year: i32, horizon: u32) -> Result<Self, InvalidArgument> {
        if horizon < 1 {
            return Err(InvalidArgument::NonPositiveHorizon { horizon });
        }
        if start_year.checked_add_unsigned(horizon).is_none() {
            return Err(InvalidArgument::YearOverflow { start_year, horizon });
        }
        Ok(Self { start_year, horizon })
    }

    /// First reporting year (the shock year).
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Number of years after the start year.
    #[must_use]
    pub const fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Last reporting year.
    #[must_use]
    pub fn final_year(&self) -> i32 {
        // Checked in `new`.
        self.start_year.saturating_add_unsigned(self.horizon)
    }

    /// Last year eligible for fresh transmissions.
    #[must_use]
    pub fn injection_cutoff_year(&self) -> i32 {
        self.final_year() - 1
    }

    /// All reporting years, ascending.
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.final_year()
    }
}

fn hash_table<'a>(
    hasher: &mut blake3::Hasher,
    tag: u8,
    table: impl Iterator<Item = (i32, &'a YearValues)>,
) {
    hasher.update(&[tag]);
    for (year, values) in table {
        hasher.update(&year.to_le_bytes());
        for (id, value) in values {
            hasher.update(&id.get().to_le_bytes());
            hasher.update(&value.to_bits().to_le_bytes());
        }
    }
}

/// Output of one propagation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    run_id: RunId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scenario_name: Option<String>,
    start_year: i32,
    horizon: u32,
    result: SimulationResult,
    ledger: DeltaLedger,
}

impl Forecast {
    pub(crate) fn new(
        run_id: RunId,
        scenario_name: Option<String>,
        window: ReportingWindow,
        result: SimulationResult,
        ledger: DeltaLedger,
    ) -> Self {
        Self {
            run_id,
            scenario_name,
            start_year: window.start_year(),
            horizon: window.horizon(),
            result,
            ledger,
        }
    }

    /// Run identity, for log correlation.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Label of the scenario that produced this forecast.
    #[must_use]
    pub fn scenario_name(&self) -> Option<&str> {
        self.scenario_name.as_deref()
    }

    /// Shock year.
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Horizon in years.
    #[must_use]
    pub const fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Reporting window of the run.
    #[must_use]
    pub fn window(&self) -> ReportingWindow {
        ReportingWindow {
            start_year: self.start_year,
            horizon: self.horizon,
        }
    }

    /// Last reporting year.
    #[must_use]
    pub fn final_year(&self) -> i32 {
        self.window().final_year()
    }

    /// Last year with fresh transmissions.
    #[must_use]
    pub fn injection_cutoff_year(&self) -> i32 {
        self.window().injection_cutoff_year()
    }

    /// Year risk rules are evaluated against by convention.
    #[must_use]
    pub fn evaluation_year(&self) -> i32 {
        self.injection_cutoff_year()
    }

    /// Absolute values per year.
    #[must_use]
    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    /// Cumulative percent deviations per year.
    #[must_use]
    pub fn ledger(&self) -> &DeltaLedger {
        &self.ledger
    }

    /// Split into `(SimulationResult, DeltaLedger)`.
    #[must_use]
    pub fn into_parts(self) -> (SimulationResult, DeltaLedger) {
        (self.result, self.ledger)
    }

    /// Content hash of the ledger and result (blake3, hex).
    ///
    /// Two runs with identical inputs produce identical fingerprints; the run
    /// id and scenario name are not part of the hash.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.start_year.to_le_bytes());
        hasher.update(&self.horizon.to_le_bytes());
        hash_table(&mut hasher, b'L', self.ledger.iter());
        hash_table(&mut hasher, b'R', self.result.iter());
        hasher.finalize().to_hex().to_string()
    }
}
