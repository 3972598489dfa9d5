//! Abstract collaborator traits for the propagation engine.
//!
//! The engine never reaches into process-wide state. It is handed a baseline
//! source and a graph source at construction time, and hands finished
//! forecasts to a result sink chosen by the caller.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::engine::Forecast;
use crate::indicator::{IndicatorId, InteractionEdge};

/// Errors raised by a backing source or sink.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Backend failure (database, remote service, poisoned lock).
    #[error("Source backend error: {0}")]
    Backend(String),

    /// Serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O failed while reading configuration or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies the fixed reference value of every known indicator.
///
/// Implementations must return the same map for every call within one
/// simulation run.
pub trait BaselineSource: Send + Sync {
    /// Returns indicator id -> baseline value for every known indicator.
    fn get_baseline(&self) -> Result<BTreeMap<IndicatorId, f64>, SourceError>;

    /// Returns the display name of an indicator, if the source knows one.
    fn display_name(&self, _id: IndicatorId) -> Option<String> {
        None
    }
}

/// Supplies the causal edges between indicators.
pub trait GraphSource: Send + Sync {
    /// Returns the outgoing edges of `source_id` in a fixed, reproducible order.
    ///
    /// An indicator with no outgoing edges is a valid terminal node and yields
    /// an empty vector.
    fn edges_from(&self, source_id: IndicatorId) -> Result<Vec<InteractionEdge>, SourceError>;

    /// Returns every indicator that has at least one outgoing edge.
    ///
    /// Used to validate the whole edge set before a run starts.
    fn sources(&self) -> Result<Vec<IndicatorId>, SourceError>;
}

/// Receives finished forecasts for downstream rendering or storage.
pub trait ResultSink: Send + Sync {
    /// Accepts one forecast.
    fn accept(&self, forecast: &Forecast) -> Result<(), SourceError>;
}
