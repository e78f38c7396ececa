//! Shared types for the apprate API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The user's recorded response to the prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserDecision {
    /// No response recorded yet
    #[default]
    Undecided,
    /// "Rate later": re-armed after more launches and days
    RemindLater,
    /// "Never ask again"
    DeclinedPermanently,
    /// Routed to the store with a rating at or above the threshold
    Rated,
    /// Feedback was actually submitted
    FeedbackGiven,
}

impl UserDecision {
    /// Terminal decisions are never left except through a reset.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UserDecision::DeclinedPermanently | UserDecision::Rated | UserDecision::FeedbackGiven
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserDecision::Undecided => "undecided",
            UserDecision::RemindLater => "remind_later",
            UserDecision::DeclinedPermanently => "declined_permanently",
            UserDecision::Rated => "rated",
            UserDecision::FeedbackGiven => "feedback_given",
        }
    }
}

impl fmt::Display for UserDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user decision '{0}'")]
pub struct UnknownDecision(pub String);

impl FromStr for UserDecision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "undecided" => Ok(UserDecision::Undecided),
            "remind_later" => Ok(UserDecision::RemindLater),
            "declined_permanently" => Ok(UserDecision::DeclinedPermanently),
            "rated" => Ok(UserDecision::Rated),
            "feedback_given" => Ok(UserDecision::FeedbackGiven),
            other => Err(UnknownDecision(other.to_string())),
        }
    }
}

/// A value on the 0.0 - 5.0 star scale, in half-star steps.
///
/// Stored as a count of half stars so ordering is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StarRating(u8);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StarRatingError {
    #[error("{0} is outside the 0-5 star scale")]
    OutOfRange(f64),

    #[error("{0} is not a whole or half star")]
    NotHalfStep(f64),

    #[error("'{0}' is not a number")]
    NotANumber(String),
}

impl StarRating {
    pub const MAX_HALF_STARS: u8 = 10;
    pub const MIN: StarRating = StarRating(0);
    pub const MAX: StarRating = StarRating(Self::MAX_HALF_STARS);

    /// Build from a count of half stars (0..=10).
    pub fn from_half_stars(half_stars: u8) -> Option<Self> {
        (half_stars <= Self::MAX_HALF_STARS).then_some(Self(half_stars))
    }

    /// Build from a star value such as `4.0` or `3.5`.
    pub fn from_stars(stars: f64) -> Result<Self, StarRatingError> {
        if !stars.is_finite() || !(0.0..=5.0).contains(&stars) {
            return Err(StarRatingError::OutOfRange(stars));
        }
        let doubled = stars * 2.0;
        if doubled.fract() != 0.0 {
            return Err(StarRatingError::NotHalfStep(stars));
        }
        Ok(Self(doubled as u8))
    }

    pub fn half_stars(&self) -> u8 {
        self.0
    }

    pub fn stars(&self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for StarRating {
    type Error = StarRatingError;

    fn try_from(stars: f64) -> Result<Self, Self::Error> {
        Self::from_stars(stars)
    }
}

impl From<StarRating> for f64 {
    fn from(rating: StarRating) -> Self {
        rating.stars()
    }
}

impl FromStr for StarRating {
    type Err = StarRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stars: f64 = s
            .trim()
            .parse()
            .map_err(|_| StarRatingError::NotANumber(s.to_string()))?;
        Self::from_stars(stars)
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.stars())
    }
}

/// Where below-threshold ratings are sent to leave feedback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackChannel {
    /// Compose a feedback mail
    #[default]
    Mail,
    /// Hand off to an application-provided feedback form
    Custom,
}

/// Structured reason codes for why the prompt is not shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SkipReason {
    /// The user already made a terminal decision
    TerminalDecision { decision: UserDecision },
    /// Too few launches (since first launch, or since the last prompt)
    NotEnoughLaunches { launches: u64, required: u64 },
    /// Too few whole days (since first launch, or since the deferral)
    NotEnoughDays { days: u64, required: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TerminalDecision { decision } => {
                write!(f, "terminal decision: {}", decision)
            }
            SkipReason::NotEnoughLaunches { launches, required } => {
                write!(f, "{} of {} launches", launches, required)
            }
            SkipReason::NotEnoughDays { days, required } => {
                write!(f, "{} of {} days", days, required)
            }
        }
    }
}

/// Outcome of evaluating the prompt conditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PromptDecision {
    Show,
    Skip { reasons: Vec<SkipReason> },
}

impl PromptDecision {
    pub fn is_show(&self) -> bool {
        matches!(self, PromptDecision::Show)
    }

    pub fn reasons(&self) -> &[SkipReason] {
        match self {
            PromptDecision::Show => &[],
            PromptDecision::Skip { reasons } => reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_decisions() {
        assert!(!UserDecision::Undecided.is_terminal());
        assert!(!UserDecision::RemindLater.is_terminal());
        assert!(UserDecision::DeclinedPermanently.is_terminal());
        assert!(UserDecision::Rated.is_terminal());
        assert!(UserDecision::FeedbackGiven.is_terminal());
    }

    #[test]
    fn decision_text_form_parses_back() {
        for decision in [
            UserDecision::Undecided,
            UserDecision::RemindLater,
            UserDecision::DeclinedPermanently,
            UserDecision::Rated,
            UserDecision::FeedbackGiven,
        ] {
            assert_eq!(decision.as_str().parse::<UserDecision>().unwrap(), decision);
        }
        assert!("maybe".parse::<UserDecision>().is_err());
    }

    #[test]
    fn star_rating_half_steps() {
        assert_eq!(StarRating::from_stars(4.0).unwrap().half_stars(), 8);
        assert_eq!(StarRating::from_stars(3.5).unwrap().half_stars(), 7);
        assert_eq!(StarRating::from_stars(0.0).unwrap().half_stars(), 0);
        assert_eq!(StarRating::from_stars(5.0).unwrap().half_stars(), 10);

        assert!(matches!(
            StarRating::from_stars(5.5),
            Err(StarRatingError::OutOfRange(_))
        ));
        assert!(matches!(
            StarRating::from_stars(-1.0),
            Err(StarRatingError::OutOfRange(_))
        ));
        assert!(matches!(
            StarRating::from_stars(3.3),
            Err(StarRatingError::NotHalfStep(_))
        ));
        assert!(StarRating::from_half_stars(11).is_none());
    }

    #[test]
    fn star_rating_ordering() {
        let three = StarRating::from_stars(3.0).unwrap();
        let three_half = StarRating::from_stars(3.5).unwrap();
        let four = StarRating::from_stars(4.0).unwrap();
        assert!(three < three_half);
        assert!(three_half < four);
    }

    #[test]
    fn star_rating_parse_and_display() {
        let rating: StarRating = "4.5".parse().unwrap();
        assert_eq!(rating.to_string(), "4.5");
        assert!(matches!(
            "four".parse::<StarRating>(),
            Err(StarRatingError::NotANumber(_))
        ));
    }

    #[test]
    fn skip_reason_serialization() {
        let reason = SkipReason::NotEnoughLaunches {
            launches: 2,
            required: 3,
        };

        let json = serde_json::to_string(&reason).unwrap();
        assert!(json.contains("not_enough_launches"));
    }
}
