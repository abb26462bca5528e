use clap::Parser;
use grid_console::config;
use grid_console::scenario::ScenarioRunner;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const GRID_CONSOLE_TAG: &str = "grid-console:";

#[derive(Debug, Parser)]
#[command(name = "grid-console")]
#[command(about = "Run a json5 scenario of counter and map operations through rx-grid")]
struct Cli {
    /// Scenario file (json5)
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Overrides the grid latency from the scenario file
    #[arg(long, value_name = "MS")]
    latency_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let scenario = match config::load(&cli.config) {
        Ok(scenario) => scenario,
        Err(err) => {
            error!("{GRID_CONSOLE_TAG} {err:#}");
            return ExitCode::from(2);
        }
    };

    let runner = match ScenarioRunner::start(&scenario.grid, cli.latency_ms) {
        Ok(runner) => runner,
        Err(err) => {
            error!("{GRID_CONSOLE_TAG} unable to start grid: {err}");
            return ExitCode::from(2);
        }
    };
    info!(
        "{GRID_CONSOLE_TAG} loaded {} with {} steps",
        cli.config.display(),
        scenario.steps.len()
    );

    let stdout = io::stdout();
    runner
        .run(&scenario.steps, |report| {
            let mut out = stdout.lock();
            match serde_json::to_string(&report) {
                Ok(line) => {
                    let _ = writeln!(out, "{line}");
                }
                Err(err) => error!("{GRID_CONSOLE_TAG} unable to encode step {}: {err}", report.step),
            }
        })
        .await;

    ExitCode::SUCCESS
}
