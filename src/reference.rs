//! Reference configuration.
//!
//! The indicator set, causal edges, risk rules and headline scenario of the
//! payroll-tax study. Used by the demo binary, benches and tests.

use std::sync::Arc;

use crate::engine::PropagationEngine;
use crate::error::ConfigurationError;
use crate::indicator::{Indicator, InteractionEdge};
use crate::risk::RiskRule;
use crate::scenario::Scenario;
use crate::source::{IndicatorRegistry, InteractionGraph};

/// CPI (Inflation).
pub const CPI: u32 = 1;
/// Business Confidence.
pub const CONFIDENCE: u32 = 5;
/// Private Investment.
pub const INVESTMENT: u32 = 7;
/// State Tax Revenue.
pub const TAX_REVENUE: u32 = 9;
/// Government primary vote.
pub const VOTE: u32 = 11;
/// Public Service Headcount.
pub const PUBLIC_HEADCOUNT: u32 = 19;
/// Traffic Congestion Index.
pub const TRAFFIC: u32 = 21;
/// Mental Health Incidents.
pub const MENTAL_HEALTH: u32 = 34;
/// Income Inequality (Gini).
pub const INEQUALITY: u32 = 38;
/// PM2.5 Air Quality.
pub const AIR_QUALITY: u32 = 41;

/// Start year of the reference study.
pub const START_YEAR: i32 = 2026;

/// Reference indicators with their 2026 baselines.
#[must_use]
pub fn indicators() -> Vec<Indicator> {
    vec![
        Indicator::new(CPI, "CPI (Inflation)", 140.0),
        Indicator::new(CONFIDENCE, "Business Confidence", 100.0),
        Indicator::new(INVESTMENT, "Private Investment", 50.0),
        Indicator::new(TAX_REVENUE, "State Tax Revenue", 30.0),
        Indicator::new(VOTE, "Government Primary Vote", 42.0),
        Indicator::new(PUBLIC_HEADCOUNT, "Public Service Headcount", 150_000.0),
        Indicator::new(TRAFFIC, "Traffic Congestion Index", 85.0),
        Indicator::new(MENTAL_HEALTH, "Mental Health Incidents", 20_000.0),
        Indicator::new(INEQUALITY, "Income Inequality (Gini)", 0.34),
        Indicator::new(AIR_QUALITY, "PM2.5 Air Quality", 8.5),
    ]
}

/// Reference causal edges in declaration order.
#[must_use]
pub fn edges() -> Vec<InteractionEdge> {
    vec![
        InteractionEdge::new(CONFIDENCE, INVESTMENT, 0.8, 1),
        InteractionEdge::new(CONFIDENCE, VOTE, 0.2, 2),
        InteractionEdge::new(INVESTMENT, TAX_REVENUE, 0.5, 2),
        // Private investment reduces relative public dependency.
        InteractionEdge::new(INVESTMENT, PUBLIC_HEADCOUNT, -0.3, 1),
        InteractionEdge::new(INVESTMENT, INEQUALITY, 0.4, 3),
        InteractionEdge::new(TAX_REVENUE, PUBLIC_HEADCOUNT, 0.6, 1),
        InteractionEdge::new(TAX_REVENUE, VOTE, -0.4, 0),
        InteractionEdge::new(TRAFFIC, AIR_QUALITY, 0.8, 0),
        InteractionEdge::new(TRAFFIC, MENTAL_HEALTH, 0.5, 1),
        InteractionEdge::new(AIR_QUALITY, MENTAL_HEALTH, 0.3, 1),
    ]
}

/// Reference risk rules.
#[must_use]
pub fn risk_rules() -> Vec<RiskRule> {
    vec![
        RiskRule::above(INEQUALITY, 5.0, "CRITICAL: Income Inequality Spike (>5%) detected."),
        RiskRule::above(TRAFFIC, 5.0, "WARNING: Traffic Congestion rising significantly."),
        RiskRule::above(AIR_QUALITY, 2.0, "ENV: PM2.5 Air Quality degrading due to activity."),
        RiskRule::below(
            PUBLIC_HEADCOUNT,
            -10.0,
            "SOCIAL: Severe Public Service cuts may impact delivery.",
        ),
    ]
}

/// "Abolish Payroll Tax for Small Business": revenue down 15%, confidence up 20%.
#[must_use]
pub fn payroll_tax_scenario() -> Scenario {
    Scenario::named("Abolish Payroll Tax for Small Business")
        .with_shock(TAX_REVENUE, -15.0)
        .with_shock(CONFIDENCE, 20.0)
}

/// Reference registry.
pub fn registry() -> Result<IndicatorRegistry, ConfigurationError> {
    IndicatorRegistry::from_indicators(indicators())
}

/// Reference graph.
pub fn graph() -> Result<InteractionGraph, ConfigurationError> {
    InteractionGraph::from_edges(edges())
}

/// Engine over the reference registry and graph.
pub fn engine() -> Result<PropagationEngine, ConfigurationError> {
    Ok(PropagationEngine::new(Arc::new(registry()?), Arc::new(graph()?)))
}
