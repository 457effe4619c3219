use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::simulator::dispatch_policy::PolicyType;
use crate::domain::simulator::engine::SimulationOutcome;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(format: &str) -> Result<OutputFormat> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::ConfigError(format!("unknown output format '{}'", format))),
        }
    }
}

/// Summary of one run, reduced from its wait-time samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub policy: PolicyType,
    pub servers: usize,
    pub requests: usize,
    pub average_wait: f64,
    pub min_wait: i64,
    pub max_wait: i64,
    pub simulated_seconds: i64,
}

impl SimulationReport {
    /// Fails with [`Error::EmptyInput`] if the run dispatched nothing.
    pub fn from_outcome(outcome: &SimulationOutcome) -> Result<SimulationReport> {
        let average_wait = outcome.average_wait()?;

        Ok(SimulationReport {
            policy: outcome.policy_type,
            servers: outcome.server_count,
            requests: outcome.samples.len(),
            average_wait,
            min_wait: outcome.samples.min().unwrap_or_default(),
            max_wait: outcome.samples.max().unwrap_or_default(),
            simulated_seconds: outcome.simulated_seconds,
        })
    }

    fn server_label(&self) -> String {
        match self.policy {
            PolicyType::SingleServer => "one server".to_string(),
            PolicyType::RoundRobin { servers } => format!("{} servers", servers),
        }
    }

    pub fn render_text(&self) -> String {
        format!("Average wait time for {}: {:.2} seconds", self.server_label(), self.average_wait)
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.render_json(),
        }
    }
}
