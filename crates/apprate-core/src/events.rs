//! Core events emitted by the engine

use apprate_api::{NextAction, SkipReason, UserDecision};

/// Events emitted by the rating engine. Observational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A launch was counted (in memory only if `durable` is false)
    LaunchRecorded { launch_count: u64, durable: bool },

    /// The prompt was shown at this launch count
    PromptShown { launch_count: u64 },

    /// Conditions were not met
    PromptSkipped { reasons: Vec<SkipReason> },

    /// A user decision was written
    DecisionRecorded { decision: UserDecision },

    /// The presentation layer was told to do something
    ActionRequested { action: NextAction },

    /// All counters and decisions were cleared
    StateReset,
}
