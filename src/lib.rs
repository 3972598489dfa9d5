//! # Policy Ripple - lagged propagation of policy shocks
//!
//! Models how a one-time policy shock to a handful of socio-economic
//! indicators spreads, with lags and attenuation, through a fixed causal graph
//! over a multi-year horizon. A run produces a year-by-year forecast of
//! absolute values, a ledger of cumulative percent deviations, and a set of
//! automated risk flags.
//!
//! ## Core Concepts
//!
//! - **Indicator**: a named quantity with a fixed baseline value
//! - **InteractionEdge**: "x% in source, `lag` years later, becomes `x * coefficient`% in target"
//! - **DeltaLedger**: year -> indicator -> cumulative percent deviation
//! - **Forecast**: ledger plus absolute values for one run
//! - **RiskRule**: threshold on one indicator's deviation in the evaluation year
//!
//! ## Usage
//!
//! ```rust,ignore
//! use policy_ripple::{reference, RiskAnalyzer, Scenario};
//!
//! let engine = reference::engine()?;
//! let scenario = Scenario::named("Abolish Payroll Tax")
//!     .with_shock(9, -15.0)
//!     .with_shock(5, 20.0);
//!
//! let forecast = engine.run(&scenario, 2026, 5)?;
//! let flags = RiskAnalyzer::evaluate_forecast(&forecast, &reference::risk_rules());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod error;
pub mod indicator;
pub mod ledger;
pub mod scenario;

// Collaborators, engine and consumers
pub mod config;
pub mod engine;
pub mod reference;
pub mod report;
pub mod risk;
pub mod source;

// Re-export primary types at crate root for convenience
pub use config::{GraphConfig, SimulationConfig};
pub use engine::runtime::{RuntimeConfig, ScenarioHandle, ScenarioJob, ScenarioRuntime};
pub use engine::{Forecast, PropagationEngine, ReportingWindow, RunId, DEFAULT_HORIZON};
pub use error::{ConfigurationError, ExecutionError, InvalidArgument, RippleError, RippleResult};
pub use indicator::{Indicator, IndicatorId, InteractionEdge};
pub use ledger::{DeltaLedger, SimulationResult};
pub use report::ReportFormatter;
pub use risk::{Comparator, RiskAnalyzer, RiskFlag, RiskRule};
pub use scenario::Scenario;
pub use source::{
    BaselineSource, GraphSource, IndicatorRegistry, InteractionGraph, JsonLinesSink, MemorySink,
    ResultSink, SourceError,
};
