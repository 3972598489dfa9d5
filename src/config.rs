//! Run and graph configuration.
//!
//! Both configurations load from JSON. `validate` must be called (or the
//! `from_json_*` constructors used) before handing a configuration to the
//! engine.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::{PropagationEngine, ReportingWindow, DEFAULT_HORIZON};
use crate::error::{ConfigurationError, RippleResult};
use crate::indicator::{Indicator, InteractionEdge};
use crate::reference;
use crate::risk::RiskRule;
use crate::scenario::Scenario;
use crate::source::{IndicatorRegistry, InteractionGraph, SourceError};

fn read_json_file(path: &Path) -> Result<String, SourceError> {
    Ok(std::fs::read_to_string(path)?)
}

fn parse_err(e: &serde_json::Error) -> ConfigurationError {
    ConfigurationError::Invalid {
        reason: format!("malformed JSON configuration: {e}"),
    }
}

/// What to simulate: scenario, window and the rules to flag with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Shock year.
    pub start_year: i32,
    /// Years after the start year.
    pub horizon: u32,
    /// Shocks applied at the start year.
    pub scenario: Scenario,
    /// Rules evaluated at the injection cutoff year.
    pub risk_rules: Vec<RiskRule>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: reference::START_YEAR,
            horizon: DEFAULT_HORIZON,
            scenario: reference::payroll_tax_scenario(),
            risk_rules: reference::risk_rules(),
        }
    }
}

impl SimulationConfig {
    /// Validate window, shocks and rules.
    pub fn validate(&self) -> RippleResult<()> {
        ReportingWindow::new(self.start_year, self.horizon)?;
        self.scenario.validate()?;
        for rule in &self.risk_rules {
            rule.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take reference defaults.
    pub fn from_json_str(json: &str) -> RippleResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| parse_err(&e))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> RippleResult<Self> {
        let text = read_json_file(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> RippleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SourceError::Serialization(e.to_string()).into())
    }
}

/// Indicator set and causal edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Known indicators with baselines.
    pub indicators: Vec<Indicator>,
    /// Causal edges in declaration order.
    #[serde(default)]
    pub edges: Vec<InteractionEdge>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            indicators: reference::indicators(),
            edges: reference::edges(),
        }
    }
}

impl GraphConfig {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> RippleResult<Self> {
        Ok(serde_json::from_str(json).map_err(|e| parse_err(&e))?)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> RippleResult<Self> {
        let text = read_json_file(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Build the registry.
    pub fn registry(&self) -> Result<IndicatorRegistry, ConfigurationError> {
        IndicatorRegistry::from_indicators(self.indicators.iter().cloned())
    }

    /// Build the graph.
    pub fn graph(&self) -> Result<InteractionGraph, ConfigurationError> {
        InteractionGraph::from_edges(self.edges.iter().copied())
    }

    /// Build an engine over this configuration.
    ///
    /// Edge endpoints are checked against the registry here, so a broken
    /// graph is reported at load time rather than on the first run.
    pub fn engine(&self) -> Result<PropagationEngine, ConfigurationError> {
        let registry = self.registry()?;
        for edge in &self.edges {
            for (id, role) in [(edge.source_id, "edge source"), (edge.target_id, "edge target")] {
                if !registry.contains(id) {
                    return Err(ConfigurationError::UnknownIndicator {
                        id,
                        context: format!("{role} of {edge}"),
                    });
                }
            }
        }
        Ok(PropagationEngine::new(Arc::new(registry), Arc::new(self.graph()?)))
    }
}
