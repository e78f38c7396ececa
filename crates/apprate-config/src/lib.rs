//! Configuration parsing and validation for apprate
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Prompt thresholds (launch counts, whole days, star threshold)
//! - Response routing (feedback channel, store package)
//! - Validation that reports every problem, never clamps

mod policy;
mod schema;
mod validation;

pub use policy::*;
pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Policy> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Policy> {
    let raw: RawConfig = toml::from_str(content)?;
    Policy::from_raw(raw)
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use apprate_api::FeedbackChannel;
    use std::io::Write;

    #[test]
    fn parse_minimal_config() {
        let policy = parse_config("config_version = 1").unwrap();
        assert_eq!(policy.thresholds, ThresholdConfig::default());
        assert_eq!(policy.response.feedback_channel, FeedbackChannel::Mail);
    }

    #[test]
    fn parse_thresholds() {
        let config = r#"
            config_version = 1

            [thresholds]
            minimum_launch_times = 3
            minimum_days = 2
            rating_threshold = 4.5

            [response]
            feedback_channel = "custom"
        "#;

        let policy = parse_config(config).unwrap();
        assert_eq!(policy.thresholds.minimum_launch_times(), 3);
        assert_eq!(policy.thresholds.minimum_days(), 2);
        assert_eq!(policy.thresholds.rating_threshold().half_stars(), 9);
        assert_eq!(policy.response.feedback_channel, FeedbackChannel::Custom);
    }

    #[test]
    fn reject_wrong_version() {
        let result = parse_config("config_version = 99");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_negative_threshold() {
        let config = r#"
            config_version = 1

            [thresholds]
            minimum_days = -1
            minimum_launch_times = -4
        "#;

        match parse_config(config) {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "config_version = 1").unwrap();
        writeln!(file, "[storage]").unwrap();
        writeln!(file, "data_dir = \"/var/tmp/apprate\"").unwrap();

        let policy = load_config(file.path()).unwrap();
        assert_eq!(
            policy.storage.db_path(),
            std::path::PathBuf::from("/var/tmp/apprate/apprate.db")
        );
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
