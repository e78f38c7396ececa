//! Raw configuration schema (as parsed from TOML)
//!
//! Counts are parsed as signed integers so that a negative value reaches
//! validation and is reported, instead of failing as an opaque parse error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Prompt thresholds
    #[serde(default)]
    pub thresholds: RawThresholds,

    /// Where responses are routed
    #[serde(default)]
    pub response: RawResponse,

    /// Persistence settings
    #[serde(default)]
    pub storage: RawStorage,
}

/// Prompt thresholds. Unset values fall back to the documented defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawThresholds {
    /// Launches before the first prompt
    pub minimum_launch_times: Option<i64>,

    /// Whole days since first launch before the first prompt
    pub minimum_days: Option<i64>,

    /// Additional launches since the last prompt before a repeat prompt
    pub minimum_launch_times_to_show_again: Option<i64>,

    /// Whole days since "rate later" before a repeat prompt
    pub minimum_days_to_show_again: Option<i64>,

    /// Stars (0-5, half steps) at or above which the user goes to the store
    pub rating_threshold: Option<f64>,
}

/// Response routing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawResponse {
    /// "mail" or "custom"
    pub feedback_channel: Option<String>,

    /// Store package identifier used to build the listing URL
    pub package_id: Option<String>,
}

/// Persistence settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorage {
    /// Data directory for the counter database
    pub data_dir: Option<PathBuf>,
}
