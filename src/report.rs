//! Human-readable rendering of a forecast.

use crate::engine::Forecast;
use crate::error::RippleResult;
use crate::indicator::IndicatorId;
use crate::risk::RiskFlag;
use crate::source::BaselineSource;

const NAME_WIDTH: usize = 30;

fn display_name(names: &dyn BaselineSource, id: IndicatorId) -> String {
    names.display_name(id).unwrap_or_else(|| format!("#{id}"))
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        name.chars().take(width).collect()
    }
}

/// Renders tables, trajectories and risk flags as plain text.
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    report_year: Option<i32>,
    include_trajectory: bool,
}

impl ReportFormatter {
    /// Formatter reporting at the evaluation year, without trajectories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a specific year instead of the evaluation year.
    #[must_use]
    pub fn at_year(mut self, year: i32) -> Self {
        self.report_year = Some(year);
        self
    }

    /// Append the year-by-year deviation table.
    #[must_use]
    pub fn with_trajectory(mut self) -> Self {
        self.include_trajectory = true;
        self
    }

    /// Render the full report.
    ///
    /// `names` supplies baselines and display names; it is normally the same
    /// source the engine ran against.
    ///
    /// For targets of lag-0 edges, `Forecast` and `Change %` can disagree in
    /// any year before the final one: the value is fixed before that year's
    /// same-year injections reach the ledger.
    pub fn render(
        &self,
        forecast: &Forecast,
        names: &dyn BaselineSource,
        flags: &[RiskFlag],
    ) -> RippleResult<String> {
        let baseline = names.get_baseline()?;
        let year = self.report_year.unwrap_or_else(|| forecast.evaluation_year());
        let ledger = forecast.ledger();
        let mut lines = Vec::new();

        if let Some(name) = forecast.scenario_name() {
            lines.push(format!(">>> Policy Simulation: '{name}' <<<"));
            lines.push(String::new());
        }

        lines.push(format!(
            "--- {}-Year Impact Forecast ({year} vs Baseline) ---",
            forecast.horizon()
        ));
        lines.push(format!(
            "{:<30} | {:<10} | {:<10} | Change %",
            "Indicator", "Base", "Forecast"
        ));
        lines.push("-".repeat(65));
        for (&id, &base) in &baseline {
            let value = forecast.result().value(year, id).unwrap_or(base);
            let pct = ledger.get(year, id);
            lines.push(format!(
                "{:<30} | {base:<10.1} | {value:<10.1} | {pct:+.1}%",
                truncate(&display_name(names, id), NAME_WIDTH)
            ));
        }

        if self.include_trajectory {
            lines.push(String::new());
            lines.push("--- Deviation Trajectory (% vs Baseline) ---".to_string());
            let years: Vec<i32> = ledger.years().collect();
            let mut header = format!("{:<30}", "Indicator");
            for y in &years {
                header.push_str(&format!(" | {y:>7}"));
            }
            lines.push(header);
            for &id in baseline.keys() {
                let mut row = format!("{:<30}", truncate(&display_name(names, id), NAME_WIDTH));
                for &y in &years {
                    row.push_str(&format!(" | {:>+7.1}", ledger.get(y, id)));
                }
                lines.push(row);
            }
        }

        lines.push(String::new());
        lines.push("--- Executive Brief ---".to_string());
        lines.extend(self.brief(forecast, names, year, baseline.keys().copied()));

        if !flags.is_empty() {
            lines.push(String::new());
            lines.push("[!] AUTOMATED RISK FLAGS:".to_string());
            for flag in flags {
                lines.push(format!("    - {}", flag.message));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    /// Largest gain and largest drop at `year`.
    fn brief(
        &self,
        forecast: &Forecast,
        names: &dyn BaselineSource,
        year: i32,
        ids: impl Iterator<Item = IndicatorId>,
    ) -> Vec<String> {
        let deviations: Vec<(IndicatorId, f64)> =
            ids.map(|id| (id, forecast.ledger().get(year, id))).collect();

        let gain = deviations
            .iter()
            .filter(|(_, pct)| *pct > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let drop = deviations
            .iter()
            .filter(|(_, pct)| *pct < 0.0)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let mut out = Vec::new();
        match gain {
            Some(&(id, pct)) => out.push(format!("Largest gain: {} ({pct:+.1}%)", display_name(names, id))),
            None => out.push("Largest gain: none".to_string()),
        }
        match drop {
            Some(&(id, pct)) => out.push(format!("Largest drop: {} ({pct:+.1}%)", display_name(names, id))),
            None => out.push("Largest drop: none".to_string()),
        }
        out
    }
}
