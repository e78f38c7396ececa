//! Validated policy structures

use crate::schema::{RawConfig, RawResponse, RawStorage, RawThresholds};
use crate::validation::{parse_feedback_channel, validate_config, validate_thresholds};
use crate::{CURRENT_CONFIG_VERSION, ConfigError, ConfigResult};
use apprate_api::{FeedbackChannel, StarRating, store_listing_url};
use std::path::PathBuf;

pub const DEFAULT_MINIMUM_LAUNCH_TIMES: u32 = 5;
pub const DEFAULT_MINIMUM_DAYS: u32 = 3;
pub const DEFAULT_MINIMUM_LAUNCH_TIMES_TO_SHOW_AGAIN: u32 = 5;
pub const DEFAULT_MINIMUM_DAYS_TO_SHOW_AGAIN: u32 = 14;
/// Three stars, in half-star units
pub const DEFAULT_RATING_THRESHOLD_HALF_STARS: u8 = 6;

/// Validated policy ready for use by the engine
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub thresholds: ThresholdConfig,
    pub response: ResponsePolicy,
    pub storage: StorageConfig,
}

impl Policy {
    /// Validate a raw config and convert it. Invalid values are rejected,
    /// never replaced by defaults.
    pub fn from_raw(raw: RawConfig) -> ConfigResult<Self> {
        if raw.config_version != CURRENT_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(raw.config_version));
        }

        let errors = validate_config(&raw);
        if !errors.is_empty() {
            return Err(ConfigError::ValidationFailed { errors });
        }

        Ok(Self {
            thresholds: ThresholdConfig::from_raw(&raw.thresholds),
            response: ResponsePolicy::from_raw(raw.response),
            storage: StorageConfig::from_raw(raw.storage),
        })
    }
}

/// Prompt thresholds.
///
/// Only obtainable validated: through [`ThresholdConfig::builder`], through
/// config parsing, or as the defaults. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdConfig {
    minimum_launch_times: u32,
    minimum_days: u32,
    minimum_launch_times_to_show_again: u32,
    minimum_days_to_show_again: u32,
    rating_threshold: StarRating,
}

impl ThresholdConfig {
    pub fn builder() -> ThresholdConfigBuilder {
        ThresholdConfigBuilder::default()
    }

    fn from_raw(raw: &RawThresholds) -> Self {
        let rating_threshold = raw
            .rating_threshold
            .and_then(|stars| StarRating::from_stars(stars).ok())
            .unwrap_or_else(default_rating_threshold);

        Self {
            minimum_launch_times: count_or(raw.minimum_launch_times, DEFAULT_MINIMUM_LAUNCH_TIMES),
            minimum_days: count_or(raw.minimum_days, DEFAULT_MINIMUM_DAYS),
            minimum_launch_times_to_show_again: count_or(
                raw.minimum_launch_times_to_show_again,
                DEFAULT_MINIMUM_LAUNCH_TIMES_TO_SHOW_AGAIN,
            ),
            minimum_days_to_show_again: count_or(
                raw.minimum_days_to_show_again,
                DEFAULT_MINIMUM_DAYS_TO_SHOW_AGAIN,
            ),
            rating_threshold,
        }
    }

    /// Launches before the first prompt
    pub fn minimum_launch_times(&self) -> u32 {
        self.minimum_launch_times
    }

    /// Whole days since first launch before the first prompt
    pub fn minimum_days(&self) -> u32 {
        self.minimum_days
    }

    /// Launches since the last shown prompt before a repeat prompt
    pub fn minimum_launch_times_to_show_again(&self) -> u32 {
        self.minimum_launch_times_to_show_again
    }

    /// Whole days since "rate later" before a repeat prompt
    pub fn minimum_days_to_show_again(&self) -> u32 {
        self.minimum_days_to_show_again
    }

    /// Ratings at or above this go to the store
    pub fn rating_threshold(&self) -> StarRating {
        self.rating_threshold
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::from_raw(&RawThresholds::default())
    }
}

fn count_or(value: Option<i64>, default: u32) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

fn default_rating_threshold() -> StarRating {
    StarRating::from_half_stars(DEFAULT_RATING_THRESHOLD_HALF_STARS)
        .unwrap_or(StarRating::MIN)
}

/// Builder for [`ThresholdConfig`].
///
/// Setters accept signed values; `build` rejects anything the config file
/// would reject.
#[derive(Debug, Clone, Default)]
pub struct ThresholdConfigBuilder {
    raw: RawThresholds,
}

impl ThresholdConfigBuilder {
    pub fn minimum_launch_times(mut self, launches: i64) -> Self {
        self.raw.minimum_launch_times = Some(launches);
        self
    }

    pub fn minimum_days(mut self, days: i64) -> Self {
        self.raw.minimum_days = Some(days);
        self
    }

    pub fn minimum_launch_times_to_show_again(mut self, launches: i64) -> Self {
        self.raw.minimum_launch_times_to_show_again = Some(launches);
        self
    }

    pub fn minimum_days_to_show_again(mut self, days: i64) -> Self {
        self.raw.minimum_days_to_show_again = Some(days);
        self
    }

    pub fn rating_threshold(mut self, stars: f64) -> Self {
        self.raw.rating_threshold = Some(stars);
        self
    }

    pub fn build(self) -> ConfigResult<ThresholdConfig> {
        let errors = validate_thresholds(&self.raw);
        if !errors.is_empty() {
            return Err(ConfigError::ValidationFailed { errors });
        }
        Ok(ThresholdConfig::from_raw(&self.raw))
    }
}

/// How responses are routed
#[derive(Debug, Clone, Default)]
pub struct ResponsePolicy {
    pub feedback_channel: FeedbackChannel,
    pub package_id: Option<String>,
}

impl ResponsePolicy {
    fn from_raw(raw: RawResponse) -> Self {
        Self {
            feedback_channel: raw
                .feedback_channel
                .as_deref()
                .and_then(|c| parse_feedback_channel(c).ok())
                .unwrap_or_default(),
            package_id: raw.package_id,
        }
    }

    /// Store listing URL, when a package identifier is configured
    pub fn listing_url(&self) -> Option<String> {
        self.package_id.as_deref().map(store_listing_url)
    }
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_raw(raw: RawStorage) -> Self {
        Self {
            data_dir: raw
                .data_dir
                .unwrap_or_else(apprate_util::default_data_dir),
        }
    }

    /// Path of the counter database
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(apprate_util::DB_FILENAME)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: apprate_util::default_data_dir(),
        }
    }
}
