//! Events exchanged with the presentation layer
//!
//! The presentation layer reports what the user did as a [`ResponseEvent`]
//! and receives back the [`NextAction`] it has to carry out, if any.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{FeedbackChannel, StarRating};

/// What the user did with a shown prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseEvent {
    /// Confirmed a star rating
    Rate { stars: StarRating },
    /// "Rate later"
    RemindLater,
    /// "Never ask again"
    Never,
    /// Feedback form was actually sent
    FeedbackSubmitted,
    /// Dialog cancelled, or the feedback flow abandoned
    Dismissed,
}

impl fmt::Display for ResponseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseEvent::Rate { stars } => write!(f, "rate({})", stars),
            ResponseEvent::RemindLater => f.write_str("remind_later"),
            ResponseEvent::Never => f.write_str("never"),
            ResponseEvent::FeedbackSubmitted => f.write_str("feedback_submitted"),
            ResponseEvent::Dismissed => f.write_str("dismissed"),
        }
    }
}

/// What the presentation layer must do next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NextAction {
    /// Send the user to the store listing
    OpenStoreFlow {
        /// Listing URL, when a package identifier is configured
        listing_url: Option<String>,
    },
    /// Collect feedback through the given channel
    OpenFeedbackFlow { channel: FeedbackChannel },
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAction::OpenStoreFlow {
                listing_url: Some(url),
            } => write!(f, "open_store_flow {}", url),
            NextAction::OpenStoreFlow { listing_url: None } => f.write_str("open_store_flow"),
            NextAction::OpenFeedbackFlow {
                channel: FeedbackChannel::Mail,
            } => f.write_str("open_feedback_flow mail"),
            NextAction::OpenFeedbackFlow {
                channel: FeedbackChannel::Custom,
            } => f.write_str("open_feedback_flow custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_event_serializes_stars_as_number() {
        let event = ResponseEvent::Rate {
            stars: StarRating::from_stars(4.5).unwrap(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"rate","stars":4.5}"#);

        let parsed: ResponseEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn rate_event_rejects_off_scale_stars() {
        let result = serde_json::from_str::<ResponseEvent>(r#"{"type":"rate","stars":7}"#);
        assert!(result.is_err());
    }

    #[test]
    fn next_action_display() {
        let action = NextAction::OpenStoreFlow {
            listing_url: Some(crate::store_listing_url("com.example.app")),
        };
        assert_eq!(
            action.to_string(),
            "open_store_flow https://play.google.com/store/apps/details?id=com.example.app"
        );
    }
}
