//! Prompt conditions

use apprate_api::{PromptDecision, SkipReason};
use apprate_config::ThresholdConfig;
use apprate_store::CounterState;
use apprate_util::elapsed_days;
use chrono::{DateTime, Local};
use tracing::warn;

/// Whether launch/day conditions are enforced.
///
/// The terminal-decision gate is enforced in both modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConditionsMode {
    #[default]
    Enforced,
    /// Development builds only: skip launch and day thresholds
    DebugBypass,
}

/// Pure predicate over counter state and thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionsChecker {
    mode: ConditionsMode,
}

impl ConditionsChecker {
    pub fn new(mode: ConditionsMode) -> Self {
        if mode == ConditionsMode::DebugBypass {
            warn!("Debug bypass enabled for prompt conditions. Don't use this for production.");
        }
        Self { mode }
    }

    /// Shorthand for `evaluate(..).is_show()`
    pub fn should_prompt(
        &self,
        state: &CounterState,
        config: &ThresholdConfig,
        now: DateTime<Local>,
    ) -> bool {
        self.evaluate(state, config, now).is_show()
    }

    /// Evaluate whether to prompt, with reasons when not
    pub fn evaluate(
        &self,
        state: &CounterState,
        config: &ThresholdConfig,
        now: DateTime<Local>,
    ) -> PromptDecision {
        if state.user_decision.is_terminal() {
            return PromptDecision::Skip {
                reasons: vec![SkipReason::TerminalDecision {
                    decision: state.user_decision,
                }],
            };
        }

        let reasons = if state.was_prompted() {
            show_again_shortfalls(state, config, now)
        } else {
            first_prompt_shortfalls(state, config, now)
        };

        if reasons.is_empty() {
            return PromptDecision::Show;
        }

        if self.mode == ConditionsMode::DebugBypass {
            warn!(
                bypassed = ?reasons,
                "Debug bypass: showing prompt although conditions are not met"
            );
            return PromptDecision::Show;
        }

        PromptDecision::Skip { reasons }
    }
}

/// First prompt: launches and days since first launch
fn first_prompt_shortfalls(
    state: &CounterState,
    config: &ThresholdConfig,
    now: DateTime<Local>,
) -> Vec<SkipReason> {
    let days = state
        .first_launch_at
        .map(|first| elapsed_days(first, now))
        .unwrap_or(0);

    shortfalls(
        state.launch_count,
        config.minimum_launch_times(),
        days,
        config.minimum_days(),
    )
}

/// Repeat prompt: launches since the last prompt, days since the deferral
fn show_again_shortfalls(
    state: &CounterState,
    config: &ThresholdConfig,
    now: DateTime<Local>,
) -> Vec<SkipReason> {
    let launches = state
        .launch_count
        .saturating_sub(state.launch_count_at_last_prompt.unwrap_or(0));

    // A prompt dismissed without "rate later" has no decline stamp; count from the prompt itself.
    let days = state
        .last_decline_at
        .or(state.last_prompt_at)
        .map(|since| elapsed_days(since, now))
        .unwrap_or(0);

    shortfalls(
        launches,
        config.minimum_launch_times_to_show_again(),
        days,
        config.minimum_days_to_show_again(),
    )
}

fn shortfalls(
    launches: u64,
    required_launches: u32,
    days: u64,
    required_days: u32,
) -> Vec<SkipReason> {
    let mut reasons = Vec::new();

    if launches < u64::from(required_launches) {
        reasons.push(SkipReason::NotEnoughLaunches {
            launches,
            required: u64::from(required_launches),
        });
    }

    if days < u64::from(required_days) {
        reasons.push(SkipReason::NotEnoughDays {
            days,
            required: u64::from(required_days),
        });
    }

    reasons
}
