//! Policy Ripple report
//!
//! Runs one scenario through the propagation engine and prints the impact
//! table, executive brief and risk flags.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use policy_ripple::{
    GraphConfig, JsonLinesSink, ReportFormatter, ResultSink, RiskAnalyzer, SimulationConfig,
};

/// Command line options
#[derive(Default)]
struct Args {
    /// Simulation configuration file (scenario, window, rules)
    config: Option<PathBuf>,
    /// Graph configuration file (indicators, edges)
    graph: Option<PathBuf>,
    /// Overrides the configured start year
    start_year: Option<i32>,
    /// Overrides the configured horizon
    horizon: Option<u32>,
    /// Append the year-by-year deviation table
    trajectory: bool,
    /// Emit the forecast as one JSON line instead of a table
    json: bool,
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    if i + 1 < args.len() {
        &args[i + 1]
    } else {
        eprintln!("error: {flag} requires a value");
        std::process::exit(1);
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                parsed.config = Some(PathBuf::from(value_of(&args, i, "--config")));
                i += 2;
            }
            "--graph" | "-g" => {
                parsed.graph = Some(PathBuf::from(value_of(&args, i, "--graph")));
                i += 2;
            }
            "--start-year" | "-s" => {
                let raw = value_of(&args, i, "--start-year");
                parsed.start_year = Some(raw.parse().unwrap_or_else(|_| {
                    eprintln!("error: invalid start year: {raw}");
                    std::process::exit(1);
                }));
                i += 2;
            }
            "--horizon" | "-y" => {
                let raw = value_of(&args, i, "--horizon");
                parsed.horizon = Some(raw.parse().unwrap_or_else(|_| {
                    eprintln!("error: invalid horizon: {raw}");
                    std::process::exit(1);
                }));
                i += 2;
            }
            "--trajectory" | "-t" => {
                parsed.trajectory = true;
                i += 1;
            }
            "--json" => {
                parsed.json = true;
                i += 1;
            }
            "--help" | "-h" => {
                println!("ripple-report - policy shock propagation report");
                println!();
                println!("USAGE:");
                println!("    ripple-report [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -c, --config <FILE>       Simulation config JSON [default: built-in scenario]");
                println!("    -g, --graph <FILE>        Graph config JSON [default: built-in graph]");
                println!("    -s, --start-year <YEAR>   Shock year [default: 2026]");
                println!("    -y, --horizon <YEARS>     Years after the start year [default: 5]");
                println!("    -t, --trajectory          Include the year-by-year deviation table");
                println!("        --json                Print the forecast as JSON");
                println!("    -h, --help                Print help information");
                println!();
                println!("Log verbosity follows RUST_LOG [default: info].");
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    parsed
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args();
    init_logging();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(start_year) = args.start_year {
        config.start_year = start_year;
    }
    if let Some(horizon) = args.horizon {
        config.horizon = horizon;
    }
    config.validate()?;

    let graph = match &args.graph {
        Some(path) => GraphConfig::from_json_file(path)?,
        None => GraphConfig::default(),
    };
    let engine = graph.engine()?;
    info!(
        indicators = graph.indicators.len(),
        edges = graph.edges.len(),
        "graph loaded"
    );

    let forecast = engine.run_with(&config)?;
    let flags = RiskAnalyzer::evaluate_forecast(&forecast, &config.risk_rules);

    if args.json {
        let sink = JsonLinesSink::new(std::io::stdout());
        sink.accept(&forecast)?;
        return Ok(());
    }

    let mut formatter = ReportFormatter::new();
    if args.trajectory {
        formatter = formatter.with_trajectory();
    }
    print!("{}", formatter.render(&forecast, engine.baseline_source(), &flags)?);
    Ok(())
}
