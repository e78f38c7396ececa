//! Configuration validation

use crate::schema::{RawConfig, RawResponse, RawThresholds};
use apprate_api::StarRating;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Threshold '{field}' must not be negative (got {value})")]
    NegativeThreshold { field: String, value: i64 },

    #[error("Threshold '{field}' is too large (got {value})")]
    ThresholdTooLarge { field: String, value: i64 },

    #[error("Invalid rating threshold {value}: {message}")]
    InvalidRatingThreshold { value: f64, message: String },

    #[error("Unknown feedback channel '{0}' (expected \"mail\" or \"custom\")")]
    UnknownFeedbackChannel(String),

    #[error("package_id cannot be empty")]
    EmptyPackageId,
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = validate_thresholds(&config.thresholds);
    errors.extend(validate_response(&config.response));
    errors
}

/// Validate prompt thresholds. Every problem is reported, not just the first.
pub fn validate_thresholds(thresholds: &RawThresholds) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let counts = [
        ("minimum_launch_times", thresholds.minimum_launch_times),
        ("minimum_days", thresholds.minimum_days),
        (
            "minimum_launch_times_to_show_again",
            thresholds.minimum_launch_times_to_show_again,
        ),
        (
            "minimum_days_to_show_again",
            thresholds.minimum_days_to_show_again,
        ),
    ];

    for (field, value) in counts {
        if let Some(value) = value {
            if let Err(e) = check_count(field, value) {
                errors.push(e);
            }
        }
    }

    if let Some(value) = thresholds.rating_threshold {
        if let Err(e) = StarRating::from_stars(value) {
            errors.push(ValidationError::InvalidRatingThreshold {
                value,
                message: e.to_string(),
            });
        }
    }

    errors
}

fn validate_response(response: &RawResponse) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(channel) = &response.feedback_channel {
        if let Err(e) = parse_feedback_channel(channel) {
            errors.push(e);
        }
    }

    if let Some(package_id) = &response.package_id {
        if package_id.trim().is_empty() {
            errors.push(ValidationError::EmptyPackageId);
        }
    }

    errors
}

fn check_count(field: &str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeThreshold {
            field: field.to_string(),
            value,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::ThresholdTooLarge {
        field: field.to_string(),
        value,
    })
}

/// Parse a feedback channel name
pub fn parse_feedback_channel(s: &str) -> Result<apprate_api::FeedbackChannel, ValidationError> {
    match s.to_lowercase().as_str() {
        "mail" | "email" => Ok(apprate_api::FeedbackChannel::Mail),
        "custom" => Ok(apprate_api::FeedbackChannel::Custom),
        _ => Err(ValidationError::UnknownFeedbackChannel(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apprate_api::FeedbackChannel;

    #[test]
    fn test_parse_feedback_channel() {
        assert_eq!(parse_feedback_channel("mail").unwrap(), FeedbackChannel::Mail);
        assert_eq!(parse_feedback_channel("Email").unwrap(), FeedbackChannel::Mail);
        assert_eq!(
            parse_feedback_channel("custom").unwrap(),
            FeedbackChannel::Custom
        );
        assert!(parse_feedback_channel("pigeon").is_err());
    }

    #[test]
    fn test_all_errors_collected() {
        let thresholds = RawThresholds {
            minimum_launch_times: Some(-1),
            minimum_days: Some(-2),
            minimum_launch_times_to_show_again: Some(i64::MAX),
            minimum_days_to_show_again: Some(14),
            rating_threshold: Some(6.0),
        };

        let errors = validate_thresholds(&thresholds);
        assert_eq!(errors.len(), 4);
        assert!(matches!(
            &errors[0],
            ValidationError::NegativeThreshold { field, value: -1 }
                if field == "minimum_launch_times"
        ));
        assert!(matches!(
            &errors[1],
            ValidationError::NegativeThreshold { field, value: -2 } if field == "minimum_days"
        ));
        assert!(matches!(
            &errors[2],
            ValidationError::ThresholdTooLarge { .. }
        ));
        assert!(matches!(
            &errors[3],
            ValidationError::InvalidRatingThreshold { .. }
        ));
    }

    #[test]
    fn test_zero_thresholds_are_valid() {
        let thresholds = RawThresholds {
            minimum_launch_times: Some(0),
            minimum_days: Some(0),
            minimum_launch_times_to_show_again: Some(0),
            minimum_days_to_show_again: Some(0),
            rating_threshold: Some(0.0),
        };
        assert!(validate_thresholds(&thresholds).is_empty());
    }

    #[test]
    fn test_empty_package_id() {
        let response = RawResponse {
            feedback_channel: None,
            package_id: Some("  ".into()),
        };
        let errors = validate_response(&response);
        assert!(matches!(errors[..], [ValidationError::EmptyPackageId]));
    }
}
