//! Store trait definitions

use apprate_api::UserDecision;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::StoreResult;

/// Counter store for one installation.
///
/// Every method is atomic on its own: implementations hold one lock (or run
/// one statement) per call, so concurrent callers never lose a launch or a
/// timestamp. Nothing orders separate calls.
pub trait CounterStore: Send + Sync {
    /// Read the current state. Missing values come back as defaults.
    fn read(&self) -> StoreResult<CounterState>;

    /// Count one launch, stamping the first launch if none is recorded.
    /// Not deduplicated: two calls count two launches.
    fn record_launch(&self, now: DateTime<Local>) -> StoreResult<CounterState>;

    /// Stamp a shown prompt together with the launch count it was shown at.
    fn record_prompt_shown(&self, now: DateTime<Local>) -> StoreResult<CounterState>;

    /// Overwrite the user decision unless a terminal one is already stored.
    /// The check and the write happen under the same lock or statement.
    /// `RemindLater` also stamps the decline time.
    fn record_decision(
        &self,
        decision: UserDecision,
        at: DateTime<Local>,
    ) -> StoreResult<DecisionWrite>;

    /// Clear everything back to defaults. Idempotent.
    fn reset(&self) -> StoreResult<()>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Result of [`CounterStore::record_decision`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionWrite {
    /// State after the call
    pub state: CounterState,
    /// False when a terminal decision was already stored and kept
    pub written: bool,
}

/// Persisted usage signals and the user's response, one per installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Recorded launches
    pub launch_count: u64,

    /// Set on the first recorded launch, never rewritten
    pub first_launch_at: Option<DateTime<Local>>,

    /// Last time a prompt was actually shown
    pub last_prompt_at: Option<DateTime<Local>>,

    /// `launch_count` at the moment of the last shown prompt
    pub launch_count_at_last_prompt: Option<u64>,

    /// The user's response so far
    pub user_decision: UserDecision,

    /// Last time the user chose "rate later"
    pub last_decline_at: Option<DateTime<Local>>,
}

impl CounterState {
    pub fn apply_launch(&mut self, now: DateTime<Local>) {
        self.launch_count = self.launch_count.saturating_add(1);
        if self.first_launch_at.is_none() {
            self.first_launch_at = Some(now);
        }
    }

    pub fn apply_prompt_shown(&mut self, now: DateTime<Local>) {
        self.last_prompt_at = Some(now);
        self.launch_count_at_last_prompt = Some(self.launch_count);
    }

    /// Returns false, changing nothing, if the stored decision is terminal.
    pub fn apply_decision(&mut self, decision: UserDecision, at: DateTime<Local>) -> bool {
        if self.user_decision.is_terminal() {
            return false;
        }
        self.user_decision = decision;
        if decision == UserDecision::RemindLater {
            self.last_decline_at = Some(at);
        }
        true
    }

    /// Whether a prompt has ever been shown for this installation
    pub fn was_prompted(&self) -> bool {
        self.last_prompt_at.is_some()
    }
}
