//! In-memory registry and graph.
//!
//! These are the reference implementations of `BaselineSource` and
//! `GraphSource`. Both are loaded once and then shared read-only behind an
//! `Arc`, so they need no interior locking.

use std::collections::{BTreeMap, HashMap};

use crate::error::ConfigurationError;
use crate::indicator::{Indicator, IndicatorId, InteractionEdge};

use super::traits::{BaselineSource, GraphSource, SourceError};

/// Indicator registry: id -> display name and baseline value.
#[derive(Debug, Clone, Default)]
pub struct IndicatorRegistry {
    by_id: BTreeMap<IndicatorId, Indicator>,
}

impl IndicatorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of indicators.
    pub fn from_indicators(
        indicators: impl IntoIterator<Item = Indicator>,
    ) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for indicator in indicators {
            registry.register(indicator)?;
        }
        Ok(registry)
    }

    /// Register an indicator. Ids must be unique and baselines finite.
    pub fn register(&mut self, indicator: Indicator) -> Result<(), ConfigurationError> {
        indicator.validate()?;
        if self.by_id.contains_key(&indicator.id) {
            return Err(ConfigurationError::DuplicateIndicator { id: indicator.id });
        }
        self.by_id.insert(indicator.id, indicator);
        Ok(())
    }

    /// Look up an indicator.
    #[must_use]
    pub fn get(&self, id: IndicatorId) -> Option<&Indicator> {
        self.by_id.get(&id)
    }

    /// Returns true if the id is registered.
    #[must_use]
    pub fn contains(&self, id: IndicatorId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Iterate indicators in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.by_id.values()
    }

    /// Number of registered indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no indicator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl BaselineSource for IndicatorRegistry {
    fn get_baseline(&self) -> Result<BTreeMap<IndicatorId, f64>, SourceError> {
        Ok(self
            .by_id
            .values()
            .map(|ind| (ind.id, ind.baseline_value))
            .collect())
    }

    fn display_name(&self, id: IndicatorId) -> Option<String> {
        self.by_id.get(&id).map(|ind| ind.name.clone())
    }
}

/// Interaction graph pre-indexed by source indicator.
///
/// Edges sharing a source are kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    by_source: HashMap<IndicatorId, Vec<InteractionEdge>>,
    edge_count: usize,
}

impl InteractionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from edges in declaration order.
    pub fn from_edges(
        edges: impl IntoIterator<Item = InteractionEdge>,
    ) -> Result<Self, ConfigurationError> {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Append an edge. Cycles and self-loops are allowed.
    pub fn add_edge(&mut self, edge: InteractionEdge) -> Result<(), ConfigurationError> {
        edge.validate()?;
        self.by_source.entry(edge.source_id).or_default().push(edge);
        self.edge_count += 1;
        Ok(())
    }

    /// Outgoing edges of `source_id` without copying.
    #[must_use]
    pub fn outgoing(&self, source_id: IndicatorId) -> &[InteractionEdge] {
        self.by_source.get(&source_id).map_or(&[], Vec::as_slice)
    }

    /// Total number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edge_count
    }

    /// Returns true if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

impl GraphSource for InteractionGraph {
    fn edges_from(&self, source_id: IndicatorId) -> Result<Vec<InteractionEdge>, SourceError> {
        Ok(self.outgoing(source_id).to_vec())
    }

    fn sources(&self) -> Result<Vec<IndicatorId>, SourceError> {
        let mut ids: Vec<IndicatorId> = self.by_source.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
