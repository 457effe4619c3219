use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use server_queue_simulation::api::config_dto::SimulationConfigDto;
use server_queue_simulation::config::SimulationConfig;
use server_queue_simulation::domain::report::OutputFormat;
use server_queue_simulation::domain::statistics::WaitPolicy;
use server_queue_simulation::loader::parser::parse_json_file;
use server_queue_simulation::{logger, run_simulation};

/// Simulates servers draining a backlog of timestamped requests and reports the average wait.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Comma separated request table: timestamp, label, processing time
    #[arg(long)]
    file: Option<PathBuf>,

    /// Number of round-robin probed servers. Without it a single server is simulated.
    #[arg(long)]
    servers: Option<usize>,

    /// JSON file with default settings, overridden by the flags given here
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_parser = ["text", "json"])]
    format: Option<String>,

    /// Record negative waits (dispatch before arrival) as zero
    #[arg(long)]
    clamp_negative_waits: bool,

    /// Write every dispatch and completion of the run to this CSV file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn to_config_dto(&self) -> anyhow::Result<SimulationConfigDto> {
        let format = match &self.format {
            Some(format) => Some(format.parse::<OutputFormat>()?),
            None => None,
        };

        Ok(SimulationConfigDto {
            file: self.file.clone(),
            servers: self.servers,
            wait_policy: self.clamp_negative_waits.then_some(WaitPolicy::ClampToZero),
            format,
            stats_file: self.stats.clone(),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level.as_deref());

    let base = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from '{}'...", path.display());
            parse_json_file::<SimulationConfigDto>(path).with_context(|| format!("failed to load config '{}'", path.display()))?
        }
        None => SimulationConfigDto::default(),
    };

    let config = SimulationConfig::try_from(base.override_with(cli.to_config_dto()?))?;
    log::debug!("Effective configuration: {:?}", config);

    let report = run_simulation(&config).with_context(|| format!("simulation of '{}' failed", config.file.display()))?;
    println!("{}", report.render(config.format)?);

    Ok(())
}
