use crate::config::SimulationConfig;
use crate::domain::diagnostics::{FanOutSink, LogSink, StatsRecorder};
use crate::domain::report::SimulationReport;
use crate::domain::simulator::engine::SimulationEngine;
use crate::error::Result;
use crate::loader::parser::load_requests;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads the request table named by `config`, runs it through the configured
/// engine and reduces the recorded waits to a report.
///
/// If a stats file is configured, the dispatch and completion events of the run
/// are written there as well.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport> {
    let requests = load_requests(&config.file)?;

    let mut log_sink = LogSink;
    let mut recorder = StatsRecorder::new();
    let mut sink = FanOutSink::new().with(&mut log_sink);
    if config.stats_file.is_some() {
        sink = sink.with(&mut recorder);
    }

    let outcome = SimulationEngine::new(config.policy_type, requests, config.wait_policy, &mut sink)?.run();
    drop(sink);

    if let Some(stats_file) = &config.stats_file {
        recorder.write_to_file(stats_file)?;
    }

    SimulationReport::from_outcome(&outcome)
}
