use std::path::PathBuf;

use crate::api::config_dto::SimulationConfigDto;
use crate::domain::report::OutputFormat;
use crate::domain::simulator::dispatch_policy::PolicyType;
use crate::domain::statistics::WaitPolicy;
use crate::error::Error;

/// Validated settings of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub file: PathBuf,
    pub policy_type: PolicyType,
    pub wait_policy: WaitPolicy,
    pub format: OutputFormat,
    pub stats_file: Option<PathBuf>,
}

impl TryFrom<SimulationConfigDto> for SimulationConfig {
    type Error = Error;

    fn try_from(dto: SimulationConfigDto) -> Result<Self, Self::Error> {
        let file = dto.file.ok_or_else(|| Error::ConfigError("no request file given, use --file or set \"file\" in the config".to_string()))?;
        let policy_type = PolicyType::from_server_count(dto.servers)?;

        Ok(SimulationConfig {
            file,
            policy_type,
            wait_policy: dto.wait_policy.unwrap_or_default(),
            format: dto.format.unwrap_or_default(),
            stats_file: dto.stats_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_single_server_text_report() {
        let dto = SimulationConfigDto { file: Some(PathBuf::from("requests.csv")), ..Default::default() };
        let config = SimulationConfig::try_from(dto).unwrap();

        assert_eq!(config.policy_type, PolicyType::SingleServer);
        assert_eq!(config.wait_policy, WaitPolicy::Signed);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.stats_file, None);
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        assert!(matches!(SimulationConfig::try_from(SimulationConfigDto::default()), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_zero_servers_is_rejected() {
        let dto = SimulationConfigDto { file: Some(PathBuf::from("requests.csv")), servers: Some(0), ..Default::default() };

        assert!(matches!(SimulationConfig::try_from(dto), Err(Error::InvalidServerCount(0))));
    }

    #[test]
    fn test_command_line_overrides_config_file() {
        let from_file: SimulationConfigDto =
            serde_json::from_str(r#"{ "file": "from_file.csv", "servers": 4, "waitPolicy": "clamp-to-zero", "format": "json" }"#).unwrap();
        let from_cli = SimulationConfigDto { servers: Some(2), ..Default::default() };

        let config = SimulationConfig::try_from(from_file.override_with(from_cli)).unwrap();

        assert_eq!(config.file, PathBuf::from("from_file.csv"));
        assert_eq!(config.policy_type, PolicyType::RoundRobin { servers: 2 });
        assert_eq!(config.wait_policy, WaitPolicy::ClampToZero);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_config_keys_are_rejected() {
        assert!(serde_json::from_str::<SimulationConfigDto>(r#"{ "servrs": 2 }"#).is_err());
    }
}
