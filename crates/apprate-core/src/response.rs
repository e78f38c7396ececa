//! Response flow: routes the user's answer and persists the resulting decision

use apprate_api::{NextAction, ResponseEvent, StarRating, UserDecision};
use apprate_config::{ResponsePolicy, ThresholdConfig};
use apprate_store::CounterStore;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of handling one response event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    /// What the presentation layer must do next; `None` means dismiss silently
    pub next_action: Option<NextAction>,
    /// Decision written to the store, if any
    pub recorded: Option<UserDecision>,
}

impl ResponseOutcome {
    fn none() -> Self {
        Self {
            next_action: None,
            recorded: None,
        }
    }
}

/// Routes star ratings and records user decisions
pub struct ResponseFlowController {
    store: Arc<dyn CounterStore>,
    routing: ResponsePolicy,
}

impl ResponseFlowController {
    pub fn new(store: Arc<dyn CounterStore>, routing: ResponsePolicy) -> Self {
        Self { store, routing }
    }

    /// Route a rating: at or above the threshold goes to the store, below to feedback.
    pub fn decide_next_action(&self, stars: StarRating, config: &ThresholdConfig) -> NextAction {
        if stars >= config.rating_threshold() {
            NextAction::OpenStoreFlow {
                listing_url: self.routing.listing_url(),
            }
        } else {
            NextAction::OpenFeedbackFlow {
                channel: self.routing.feedback_channel,
            }
        }
    }

    /// Handle a response event and persist the decision it implies.
    ///
    /// Opening the feedback flow is not terminal; only `FeedbackSubmitted` is.
    /// Once a terminal decision is stored it is never overwritten here.
    pub fn respond(
        &self,
        event: ResponseEvent,
        config: &ThresholdConfig,
        now: DateTime<Local>,
    ) -> ResponseOutcome {
        let next_action = match event {
            ResponseEvent::Rate { stars } => Some(self.decide_next_action(stars, config)),
            _ => None,
        };

        let decision = match (&event, &next_action) {
            (ResponseEvent::Rate { .. }, Some(NextAction::OpenStoreFlow { .. })) => {
                Some(UserDecision::Rated)
            }
            (ResponseEvent::RemindLater, _) => Some(UserDecision::RemindLater),
            (ResponseEvent::Never, _) => Some(UserDecision::DeclinedPermanently),
            (ResponseEvent::FeedbackSubmitted, _) => Some(UserDecision::FeedbackGiven),
            _ => None,
        };

        let Some(decision) = decision else {
            debug!(event = %event, "Response leaves state unchanged");
            return ResponseOutcome {
                next_action,
                ..ResponseOutcome::none()
            };
        };

        let recorded = self.record(&event, decision, now).then_some(decision);

        ResponseOutcome {
            next_action,
            recorded,
        }
    }

    /// Best effort: a failed write is logged and the caller carries on.
    /// Returns whether the decision was written.
    fn record(
        &self,
        event: &ResponseEvent,
        decision: UserDecision,
        now: DateTime<Local>,
    ) -> bool {
        match self.store.record_decision(decision, now) {
            Ok(write) if !write.written => {
                info!(
                    event = %event,
                    current = %write.state.user_decision,
                    "Terminal decision already recorded, not overwriting"
                );
                false
            }
            Ok(_) => {
                if decision.is_terminal() {
                    info!(decision = %decision, "Terminal decision recorded");
                } else {
                    info!(decision = %decision, "Decision recorded");
                }
                true
            }
            Err(e) => {
                warn!(
                    error = %e,
                    decision = %decision,
                    "Failed to persist decision; it will not survive a restart"
                );
                false
            }
        }
    }
}
