//! SQLite-based store implementation

use apprate_api::UserDecision;
use apprate_util::parse_rfc3339_local;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{CounterState, CounterStore, DecisionWrite, StoreError, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Counter state (single row per installation)
            CREATE TABLE IF NOT EXISTS counter_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                launch_count INTEGER NOT NULL DEFAULT 0,
                first_launch_at TEXT,
                last_prompt_at TEXT,
                launch_count_at_last_prompt INTEGER,
                user_decision TEXT NOT NULL DEFAULT 'undecided',
                last_decline_at TEXT
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

struct CounterRow {
    launch_count: i64,
    first_launch_at: Option<String>,
    last_prompt_at: Option<String>,
    launch_count_at_last_prompt: Option<i64>,
    user_decision: String,
    last_decline_at: Option<String>,
}

fn read_state(conn: &Connection) -> StoreResult<CounterState> {
    let row = conn
        .query_row(
            r#"
            SELECT launch_count, first_launch_at, last_prompt_at,
                   launch_count_at_last_prompt, user_decision, last_decline_at
            FROM counter_state WHERE id = 1
            "#,
            [],
            |row| {
                Ok(CounterRow {
                    launch_count: row.get(0)?,
                    first_launch_at: row.get(1)?,
                    last_prompt_at: row.get(2)?,
                    launch_count_at_last_prompt: row.get(3)?,
                    user_decision: row.get(4)?,
                    last_decline_at: row.get(5)?,
                })
            },
        )
        .optional()?;

    let Some(row) = row else {
        return Ok(CounterState::default());
    };

    Ok(CounterState {
        launch_count: to_count(row.launch_count),
        first_launch_at: parse_timestamp("first_launch_at", row.first_launch_at),
        last_prompt_at: parse_timestamp("last_prompt_at", row.last_prompt_at),
        launch_count_at_last_prompt: row.launch_count_at_last_prompt.map(to_count),
        user_decision: row.user_decision.parse()?,
        last_decline_at: parse_timestamp("last_decline_at", row.last_decline_at),
    })
}

/// Clear a `first_launch_at` that cannot be parsed, so the next launch can stamp it
fn clear_unreadable_first_launch(conn: &Connection) -> StoreResult<()> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT first_launch_at FROM counter_state WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()?
        .flatten();

    let Some(value) = stored else {
        return Ok(());
    };
    if parse_rfc3339_local(&value).is_none() {
        warn!(value = %value, "Replacing unreadable first launch timestamp");
        conn.execute("UPDATE counter_state SET first_launch_at = NULL WHERE id = 1", [])?;
    }
    Ok(())
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn parse_timestamp(column: &str, value: Option<String>) -> Option<DateTime<Local>> {
    let value = value?;
    let parsed = parse_rfc3339_local(&value);
    if parsed.is_none() {
        warn!(column, value = %value, "Unreadable timestamp, treating as absent");
    }
    parsed
}

impl CounterStore for SqliteStore {
    fn read(&self) -> StoreResult<CounterState> {
        let conn = self.conn()?;
        read_state(&conn)
    }

    fn record_launch(&self, now: DateTime<Local>) -> StoreResult<CounterState> {
        let conn = self.conn()?;
        clear_unreadable_first_launch(&conn)?;

        conn.execute(
            r#"
            INSERT INTO counter_state (id, launch_count, first_launch_at)
            VALUES (1, 1, ?)
            ON CONFLICT(id)
            DO UPDATE SET
                launch_count = launch_count + 1,
                first_launch_at = COALESCE(first_launch_at, excluded.first_launch_at)
            "#,
            [now.to_rfc3339()],
        )?;

        let state = read_state(&conn)?;
        debug!(launch_count = state.launch_count, "Launch recorded");
        Ok(state)
    }

    fn record_prompt_shown(&self, now: DateTime<Local>) -> StoreResult<CounterState> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO counter_state (id, last_prompt_at, launch_count_at_last_prompt)
            VALUES (1, ?, 0)
            ON CONFLICT(id)
            DO UPDATE SET
                last_prompt_at = excluded.last_prompt_at,
                launch_count_at_last_prompt = launch_count
            "#,
            [now.to_rfc3339()],
        )?;

        let state = read_state(&conn)?;
        debug!(launch_count = state.launch_count, "Prompt shown recorded");
        Ok(state)
    }

    fn record_decision(
        &self,
        decision: UserDecision,
        at: DateTime<Local>,
    ) -> StoreResult<DecisionWrite> {
        let conn = self.conn()?;
        let decline_at = (decision == UserDecision::RemindLater).then(|| at.to_rfc3339());

        // Terminal decisions are only cleared by reset
        let changed = conn.execute(
            r#"
            INSERT INTO counter_state (id, user_decision, last_decline_at)
            VALUES (1, ?, ?)
            ON CONFLICT(id)
            DO UPDATE SET
                user_decision = excluded.user_decision,
                last_decline_at = COALESCE(excluded.last_decline_at, last_decline_at)
            WHERE user_decision NOT IN ('declined_permanently', 'rated', 'feedback_given')
            "#,
            params![decision.as_str(), decline_at],
        )?;

        let written = changed > 0;
        debug!(decision = %decision, written, "Decision write");
        Ok(DecisionWrite {
            state: read_state(&conn)?,
            written,
        })
    }

    fn reset(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM counter_state", [])?;
        debug!("Counter state cleared");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.is_healthy());
    }

    #[test]
    fn test_fresh_store_reads_defaults() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.read().unwrap(), CounterState::default());
    }

    #[test]
    fn test_launch_counting() {
        let store = SqliteStore::in_memory().unwrap();

        for i in 1..=5 {
            let state = store.record_launch(t0() + Duration::days(i)).unwrap();
            assert_eq!(state.launch_count, i as u64);
        }

        let state = store.read().unwrap();
        assert_eq!(state.launch_count, 5);
        // Stamped by the first launch only
        assert_eq!(state.first_launch_at, Some(t0() + Duration::days(1)));
    }

    #[test]
    fn test_prompt_shown_captures_launch_count() {
        let store = SqliteStore::in_memory().unwrap();
        store.record_launch(t0()).unwrap();
        store.record_launch(t0()).unwrap();
        store.record_launch(t0()).unwrap();

        let shown_at = t0() + Duration::hours(2);
        let state = store.record_prompt_shown(shown_at).unwrap();
        assert_eq!(state.last_prompt_at, Some(shown_at));
        assert_eq!(state.launch_count_at_last_prompt, Some(3));

        // Later launches do not move the captured count
        store.record_launch(t0()).unwrap();
        let state = store.read().unwrap();
        assert_eq!(state.launch_count, 4);
        assert_eq!(state.launch_count_at_last_prompt, Some(3));
    }

    #[test]
    fn test_decisions() {
        let store = SqliteStore::in_memory().unwrap();
        store.record_launch(t0()).unwrap();

        let later = t0() + Duration::days(1);
        let write = store
            .record_decision(UserDecision::RemindLater, later)
            .unwrap();
        assert!(write.written);
        assert_eq!(write.state.user_decision, UserDecision::RemindLater);
        assert_eq!(write.state.last_decline_at, Some(later));

        // Non-deferral decisions keep the previous decline stamp
        let state = store
            .record_decision(UserDecision::Rated, later + Duration::days(1))
            .unwrap()
            .state;
        assert_eq!(state.user_decision, UserDecision::Rated);
        assert_eq!(state.last_decline_at, Some(later));
        assert_eq!(state.launch_count, 1);
    }

    #[test]
    fn test_decision_before_any_launch() {
        let store = SqliteStore::in_memory().unwrap();
        let write = store
            .record_decision(UserDecision::DeclinedPermanently, t0())
            .unwrap();
        assert!(write.written);
        assert_eq!(write.state.user_decision, UserDecision::DeclinedPermanently);
        assert_eq!(write.state.launch_count, 0);
        assert!(write.state.first_launch_at.is_none());
    }

    #[test]
    fn test_terminal_decision_is_not_overwritten() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .record_decision(UserDecision::DeclinedPermanently, t0())
            .unwrap();

        let write = store
            .record_decision(UserDecision::RemindLater, t0() + Duration::days(1))
            .unwrap();
        assert!(!write.written);
        assert_eq!(write.state.user_decision, UserDecision::DeclinedPermanently);
        assert!(write.state.last_decline_at.is_none());

        store.reset().unwrap();
        let write = store
            .record_decision(UserDecision::RemindLater, t0())
            .unwrap();
        assert!(write.written);
    }

    #[test]
    fn test_concurrent_decisions_keep_terminal() {
        let store = std::sync::Arc::new(SqliteStore::in_memory().unwrap());

        let handles: Vec<_> = [UserDecision::RemindLater, UserDecision::DeclinedPermanently]
            .into_iter()
            .cycle()
            .take(6)
            .map(|decision| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        store.record_decision(decision, t0()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            store.read().unwrap().user_decision,
            UserDecision::DeclinedPermanently
        );
    }

    #[test]
    fn test_unreadable_first_launch_is_restamped() {
        let store = SqliteStore::in_memory().unwrap();
        store.record_launch(t0()).unwrap();
        store
            .conn()
            .unwrap()
            .execute("UPDATE counter_state SET first_launch_at = 'garbage'", [])
            .unwrap();
        assert!(store.read().unwrap().first_launch_at.is_none());

        let later = t0() + Duration::days(2);
        let state = store.record_launch(later).unwrap();
        assert_eq!(state.launch_count, 2);
        assert_eq!(state.first_launch_at, Some(later));

        // A readable stamp is kept from then on
        let state = store.record_launch(later + Duration::days(1)).unwrap();
        assert_eq!(state.first_launch_at, Some(later));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.record_launch(t0()).unwrap();
        store.record_prompt_shown(t0()).unwrap();
        store
            .record_decision(UserDecision::DeclinedPermanently, t0())
            .unwrap();

        store.reset().unwrap();
        let once = store.read().unwrap();
        store.reset().unwrap();
        let twice = store.read().unwrap();

        assert_eq!(once, CounterState::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_corrupt_decision_is_an_error() {
        let store = SqliteStore::in_memory().unwrap();
        store.record_launch(t0()).unwrap();
        store
            .conn()
            .unwrap()
            .execute("UPDATE counter_state SET user_decision = 'maybe'", [])
            .unwrap();

        assert!(matches!(store.read(), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apprate.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.record_launch(t0()).unwrap();
            store.record_launch(t0()).unwrap();
            store
                .record_decision(UserDecision::RemindLater, t0())
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let state = store.read().unwrap();
        assert_eq!(state.launch_count, 2);
        assert_eq!(state.user_decision, UserDecision::RemindLater);
        assert_eq!(state.first_launch_at, Some(t0()));
    }
}
