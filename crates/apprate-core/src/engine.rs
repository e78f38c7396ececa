//! Rating engine facade

use apprate_api::{NextAction, PromptDecision, ResponseEvent};
use apprate_config::Policy;
use apprate_store::{CounterState, CounterStore, StoreResult};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{ConditionsChecker, ConditionsMode, EngineEvent, ResponseFlowController};

/// Snapshot for support tooling
#[derive(Debug, Clone)]
pub struct EngineStatus {
    pub state: CounterState,
    /// What conditions say right now, without counting a launch
    pub decision: PromptDecision,
}

/// The rating engine: the only entry point the presentation layer uses
pub struct RatingEngine {
    policy: Policy,
    store: Arc<dyn CounterStore>,
    checker: ConditionsChecker,
    responses: ResponseFlowController,
    events: Vec<EngineEvent>,
}

impl RatingEngine {
    /// Create an engine that enforces all conditions
    pub fn new(policy: Policy, store: Arc<dyn CounterStore>) -> Self {
        Self::with_mode(policy, store, ConditionsMode::Enforced)
    }

    /// Create an engine for development builds that skips launch and day thresholds.
    /// Terminal decisions are still honoured.
    pub fn with_debug_bypass(policy: Policy, store: Arc<dyn CounterStore>) -> Self {
        Self::with_mode(policy, store, ConditionsMode::DebugBypass)
    }

    fn with_mode(policy: Policy, store: Arc<dyn CounterStore>, mode: ConditionsMode) -> Self {
        info!(
            minimum_launch_times = policy.thresholds.minimum_launch_times(),
            minimum_days = policy.thresholds.minimum_days(),
            rating_threshold = %policy.thresholds.rating_threshold(),
            mode = ?mode,
            "Rating engine initialized"
        );

        let responses = ResponseFlowController::new(store.clone(), policy.response.clone());

        Self {
            policy,
            store,
            checker: ConditionsChecker::new(mode),
            responses,
            events: Vec::new(),
        }
    }

    /// Record one application start and decide whether to show the prompt.
    ///
    /// Call exactly once per qualifying start. A `true` result is recorded as a
    /// shown prompt before returning.
    pub fn on_launch(&mut self, now: DateTime<Local>) -> bool {
        let Some(state) = self.count_launch(now) else {
            return false;
        };

        match self.checker.evaluate(&state, &self.policy.thresholds, now) {
            PromptDecision::Show => {
                info!(launch_count = state.launch_count, "Show rating prompt: conditions met");
                if let Err(e) = self.store.record_prompt_shown(now) {
                    warn!(error = %e, "Failed to record shown prompt");
                }
                self.events.push(EngineEvent::PromptShown {
                    launch_count: state.launch_count,
                });
                true
            }
            PromptDecision::Skip { reasons } => {
                info!(
                    launch_count = state.launch_count,
                    reasons = ?reasons,
                    "Don't show rating prompt: conditions not met"
                );
                self.events.push(EngineEvent::PromptSkipped { reasons });
                false
            }
        }
    }

    /// Counts the launch. Falls back to an in-memory count if the write fails,
    /// and gives up (no prompt) if the state cannot be read at all.
    fn count_launch(&mut self, now: DateTime<Local>) -> Option<CounterState> {
        let (state, durable) = match self.store.record_launch(now) {
            Ok(state) => (state, true),
            Err(e) => {
                warn!(error = %e, "Failed to record launch; counting it for this run only");
                match self.store.read() {
                    Ok(mut state) => {
                        state.apply_launch(now);
                        (state, false)
                    }
                    Err(e) => {
                        warn!(error = %e, "Counter state unreadable; not prompting");
                        return None;
                    }
                }
            }
        };

        self.events.push(EngineEvent::LaunchRecorded {
            launch_count: state.launch_count,
            durable,
        });
        Some(state)
    }

    /// Record the user's response and return what the presentation layer must do next.
    /// `None` means dismiss silently.
    pub fn on_response(
        &mut self,
        event: ResponseEvent,
        now: DateTime<Local>,
    ) -> Option<NextAction> {
        let outcome = self.responses.respond(event, &self.policy.thresholds, now);

        if let Some(decision) = outcome.recorded {
            self.events.push(EngineEvent::DecisionRecorded { decision });
        }
        if let Some(action) = &outcome.next_action {
            self.events.push(EngineEvent::ActionRequested {
                action: action.clone(),
            });
        }

        outcome.next_action
    }

    /// Current state and what the conditions say, without mutating anything
    pub fn status(&self, now: DateTime<Local>) -> StoreResult<EngineStatus> {
        let state = self.store.read()?;
        let decision = self.checker.evaluate(&state, &self.policy.thresholds, now);
        Ok(EngineStatus { state, decision })
    }

    /// Clear all counters and decisions, including terminal ones.
    /// For tests and support tooling.
    pub fn reset(&mut self) {
        warn!("Rating state was reset; terminal decisions are cleared");
        if let Err(e) = self.store.reset() {
            warn!(error = %e, "Failed to reset counter state");
            return;
        }
        self.events.push(EngineEvent::StateReset);
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}
