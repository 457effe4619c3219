use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::report::OutputFormat;
use crate::domain::statistics::WaitPolicy;

/// Raw simulation settings as read from a JSON config file or the command line.
///
/// Every field is optional so that several sources can be layered with
/// [`SimulationConfigDto::override_with`] before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimulationConfigDto {
    pub file: Option<PathBuf>,
    pub servers: Option<usize>,
    pub wait_policy: Option<WaitPolicy>,
    pub format: Option<OutputFormat>,
    pub stats_file: Option<PathBuf>,
}

impl SimulationConfigDto {
    /// Returns `self` with every field that is set in `other` replaced.
    pub fn override_with(self, other: SimulationConfigDto) -> SimulationConfigDto {
        SimulationConfigDto {
            file: other.file.or(self.file),
            servers: other.servers.or(self.servers),
            wait_policy: other.wait_policy.or(self.wait_policy),
            format: other.format.or(self.format),
            stats_file: other.stats_file.or(self.stats_file),
        }
    }
}
