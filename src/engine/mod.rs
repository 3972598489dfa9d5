//! Propagation engine.
//!
//! Turns a one-time scenario shock into a year-by-year forecast by pushing
//! percent deviations through the lagged edges of the interaction graph.
//!
//! Key invariants:
//! - The baseline is fetched once per run and never updated from evolving state.
//! - Every referenced indicator is validated before any ledger state exists.
//! - Years are processed in strictly increasing order.
//! - Transmissions never land after the injection cutoff year, so cyclic
//!   graphs terminate.

mod forecast;

/// Bounded worker pool for running many scenarios concurrently.
pub mod runtime;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::{ConfigurationError, RippleResult};
use crate::indicator::{IndicatorId, InteractionEdge};
use crate::ledger::{apply_deviation, DeltaLedger, SimulationResult, YearValues};
use crate::scenario::Scenario;
use crate::source::{BaselineSource, GraphSource};

pub use forecast::{Forecast, ReportingWindow, RunId};

/// Horizon used when the caller does not pick one.
pub const DEFAULT_HORIZON: u32 = 5;

/// Validated, read-only inputs of one run.
struct RunPlan {
    baseline: BTreeMap<IndicatorId, f64>,
    edges: HashMap<IndicatorId, Vec<InteractionEdge>>,
}

impl RunPlan {
    fn outgoing(&self, source_id: IndicatorId) -> &[InteractionEdge] {
        self.edges.get(&source_id).map_or(&[], Vec::as_slice)
    }

    fn require_known(&self, id: IndicatorId, context: impl FnOnce() -> String) -> Result<(), ConfigurationError> {
        if self.baseline.contains_key(&id) {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownIndicator {
                id,
                context: context(),
            })
        }
    }
}

/// Year-by-year simulator over an injected registry and graph.
///
/// The engine holds no per-run state; one instance may serve any number of
/// concurrent runs.
#[derive(Clone)]
pub struct PropagationEngine {
    baseline: Arc<dyn BaselineSource>,
    graph: Arc<dyn GraphSource>,
}

impl std::fmt::Debug for PropagationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagationEngine").finish_non_exhaustive()
    }
}

impl PropagationEngine {
    /// Create an engine over a baseline source and a graph source.
    #[must_use]
    pub fn new(baseline: Arc<dyn BaselineSource>, graph: Arc<dyn GraphSource>) -> Self {
        Self { baseline, graph }
    }

    /// The baseline source this engine reads from.
    #[must_use]
    pub fn baseline_source(&self) -> &dyn BaselineSource {
        self.baseline.as_ref()
    }

    /// The graph source this engine reads from.
    #[must_use]
    pub fn graph_source(&self) -> &dyn GraphSource {
        self.graph.as_ref()
    }

    /// Run with the default five-year horizon.
    pub fn run_with_default_horizon(&self, scenario: &Scenario, start_year: i32) -> RippleResult<Forecast> {
        self.run(scenario, start_year, DEFAULT_HORIZON)
    }

    /// Run the scenario, window and horizon described by a configuration.
    pub fn run_with(&self, config: &SimulationConfig) -> RippleResult<Forecast> {
        self.run(&config.scenario, config.start_year, config.horizon)
    }

    /// Propagate `scenario` from `start_year` over `horizon` years.
    ///
    /// # Errors
    /// - `InvalidArgument` if `horizon < 1`, the window overflows, or a shock is not finite.
    /// - `ConfigurationError` if the scenario or any edge references an indicator
    ///   the baseline source does not know.
    /// - `Source` if a collaborator fails.
    pub fn run(&self, scenario: &Scenario, start_year: i32, horizon: u32) -> RippleResult<Forecast> {
        let window = ReportingWindow::new(start_year, horizon)?;
        scenario.validate()?;
        let plan = self.plan(scenario)?;

        let run_id = RunId::new();
        info!(
            %run_id,
            start_year,
            horizon,
            shocks = scenario.shocks.len(),
            indicators = plan.baseline.len(),
            "starting propagation run"
        );

        let cutoff = window.injection_cutoff_year();
        let mut ledger = DeltaLedger::with_years(window.years());
        for (id, pct) in scenario.iter() {
            ledger.set(start_year, id, pct);
        }

        let mut result = SimulationResult::new();
        let shocked: YearValues = plan
            .baseline
            .iter()
            .map(|(&id, &base)| (id, apply_deviation(base, scenario.shock(id).unwrap_or(0.0))))
            .collect();
        result.insert_year(start_year, shocked);

        for year in window.start_year()..=cutoff {
            let mut injections = 0usize;
            for (source_id, pct) in ledger.snapshot(year) {
                for edge in plan.outgoing(source_id) {
                    let effect_year = match year.checked_add_unsigned(edge.lag_years) {
                        Some(y) if y <= cutoff => y,
                        _ => continue,
                    };
                    ledger.accumulate(effect_year, edge.target_id, edge.transmit(pct));
                    injections += 1;
                }
            }

            let next = year + 1;
            let mut values = YearValues::new();
            for (&id, &base) in &plan.baseline {
                let total = ledger.get(year, id) + ledger.get(next, id);
                ledger.set(next, id, total);
                values.insert(id, apply_deviation(base, total));
            }
            result.insert_year(next, values);

            debug!(%run_id, year, injections, "propagated year");
        }

        info!(%run_id, final_year = window.final_year(), "propagation run complete");
        Ok(Forecast::new(run_id, scenario.name.clone(), window, result, ledger))
    }

    /// Fetch the baseline and edges once and check every reference.
    fn plan(&self, scenario: &Scenario) -> RippleResult<RunPlan> {
        let baseline = self.baseline.get_baseline()?;
        for (&id, &value) in &baseline {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteBaseline { id, value }.into());
            }
        }

        let mut plan = RunPlan {
            baseline,
            edges: HashMap::new(),
        };

        for (id, _) in scenario.iter() {
            plan.require_known(id, || "scenario shock".to_string())?;
        }

        for source_id in self.graph.sources()? {
            plan.require_known(source_id, || "edge source".to_string())?;
            let edges = self.graph.edges_from(source_id)?;
            for edge in &edges {
                edge.validate()?;
                plan.require_known(edge.target_id, || format!("edge target of {edge}"))?;
            }
            if !edges.is_empty() {
                plan.edges.insert(source_id, edges);
            }
        }

        Ok(plan)
    }
}
