//! In-memory store

use apprate_api::UserDecision;
use chrono::{DateTime, Local};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{CounterState, CounterStore, DecisionWrite, StoreError, StoreResult};

/// Non-durable store. Used in tests and when the database cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<CounterState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state
    pub fn with_state(state: CounterState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> StoreResult<MutexGuard<'_, CounterState>> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl CounterStore for MemoryStore {
    fn read(&self) -> StoreResult<CounterState> {
        Ok(self.state()?.clone())
    }

    fn record_launch(&self, now: DateTime<Local>) -> StoreResult<CounterState> {
        let mut state = self.state()?;
        state.apply_launch(now);
        Ok(state.clone())
    }

    fn record_prompt_shown(&self, now: DateTime<Local>) -> StoreResult<CounterState> {
        let mut state = self.state()?;
        state.apply_prompt_shown(now);
        Ok(state.clone())
    }

    fn record_decision(
        &self,
        decision: UserDecision,
        at: DateTime<Local>,
    ) -> StoreResult<DecisionWrite> {
        let mut state = self.state()?;
        let written = state.apply_decision(decision, at);
        Ok(DecisionWrite {
            state: state.clone(),
            written,
        })
    }

    fn reset(&self) -> StoreResult<()> {
        *self.state()? = CounterState::default();
        debug!("In-memory counter state cleared");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.state.lock().is_ok()
    }
}
