//! SQLite persistence for task tracking.
//!
//! Every hook invocation is its own short-lived process, so the store opens a
//! fresh connection per operation and leans on SQLite's write serialization
//! (WAL + busy_timeout) for cross-process safety. `seq` is assigned inside
//! the INSERT itself, so two concurrent opens for one session cannot receive
//! the same value.

use chrono::{DateTime, Utc};
use fs_err as fs;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, TransactionBehavior};
use std::path::PathBuf;

use crate::error::{PulseError, Result};

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

/// Row data returned when a task is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedTask {
    pub id: i64,
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}

/// Row data returned when a task is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedTask {
    pub seq: i64,
    pub duration_seconds: i64,
}

impl Store {
    pub fn new(path: PathBuf) -> Result<Self> {
        let store = Self { path };
        store.init_schema()?;
        Ok(store)
    }

    /// Inserts an open task for the session, assigning the next per-session
    /// seq (1 for the session's first task).
    pub fn open_task(&self, session_id: &str, prompt: &str, cwd: &str) -> Result<OpenedTask> {
        self.with_connection(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO tasks (session_id, created_at, prompt, cwd, seq) \
                 VALUES (?1, ?2, ?3, ?4, \
                    (SELECT COALESCE(MAX(seq), 0) + 1 FROM tasks WHERE session_id = ?1))",
                params![session_id, created_at.to_rfc3339(), prompt, cwd],
            )
            .map_err(|err| PulseError::storage("Failed to insert task", err))?;

            let id = conn.last_insert_rowid();
            let seq = conn
                .query_row("SELECT seq FROM tasks WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .map_err(|err| PulseError::storage("Failed to read assigned seq", err))?;

            Ok(OpenedTask {
                id,
                seq,
                created_at,
            })
        })
    }

    /// Closes the most recently opened task for the session, if any.
    ///
    /// Most-recent-first on purpose: with several tasks open, earlier ones
    /// stay open until later stop events reach them in the same order.
    /// Returns `Ok(None)` when the session has no open task.
    pub fn close_latest_open_task(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ClosedTask>> {
        self.with_connection(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|err| PulseError::storage("Failed to start close transaction", err))?;

            let row: Option<(i64, String, i64)> = tx
                .query_row(
                    "SELECT id, created_at, seq FROM tasks \
                     WHERE session_id = ?1 AND completed_at IS NULL \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT 1",
                    params![session_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()
                .map_err(|err| PulseError::storage("Failed to query open task", err))?;

            let (id, created_at_raw, seq) = match row {
                Some(row) => row,
                None => return Ok(None),
            };

            let created_at = match parse_rfc3339(&created_at_raw) {
                Some(value) => value,
                None => {
                    tracing::warn!(task_id = id, raw = %created_at_raw, "Unparseable created_at");
                    now
                }
            };
            let duration_seconds = now.signed_duration_since(created_at).num_seconds().max(0);

            // completed_at IS NULL keeps the close write-once.
            let updated = tx
                .execute(
                    "UPDATE tasks SET completed_at = ?1, duration_seconds = ?2 \
                     WHERE id = ?3 AND completed_at IS NULL",
                    params![now.to_rfc3339(), duration_seconds, id],
                )
                .map_err(|err| PulseError::storage("Failed to close task", err))?;

            if updated == 0 {
                return Ok(None);
            }

            tx.commit()
                .map_err(|err| PulseError::storage("Failed to commit close", err))?;

            Ok(Some(ClosedTask {
                seq,
                duration_seconds,
            }))
        })
    }

    pub fn task_count(&self, session_id: &str) -> Result<i64> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .map_err(|err| PulseError::storage("Failed to count tasks", err))
        })
    }

    pub fn open_task_count(&self, session_id: &str) -> Result<i64> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE session_id = ?1 AND completed_at IS NULL",
                params![session_id],
                |row| row.get(0),
            )
            .map_err(|err| PulseError::storage("Failed to count open tasks", err))
        })
    }

    fn init_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(
                "BEGIN;
                 CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    session_id TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    prompt TEXT NOT NULL DEFAULT '',
                    cwd TEXT NOT NULL DEFAULT '',
                    seq INTEGER NOT NULL,
                    completed_at TEXT,
                    duration_seconds INTEGER
                 );
                 CREATE INDEX IF NOT EXISTS idx_tasks_session_open
                    ON tasks (session_id, completed_at);
                 COMMIT;",
            )
            .map_err(|err| PulseError::storage("Failed to initialize schema", err))
        })
    }

    fn with_connection<T>(&self, op: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.open()?;
        op(&mut conn)
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| PulseError::io("Failed to create data dir", err))?;
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|err| PulseError::storage("Failed to open sqlite db", err))?;

        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|err| PulseError::storage("Failed to set busy_timeout", err))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|err| PulseError::storage("Failed to enable WAL", err))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|err| PulseError::storage("Failed to set synchronous", err))?;

        Ok(conn)
    }
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::thread;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let store = Store::new(temp_dir.path().join("tasks.db")).expect("store init");
        (temp_dir, store)
    }

    #[test]
    fn opens_assign_contiguous_seq_per_session() {
        let (_dir, store) = temp_store();

        for expected in 1..=3 {
            let opened = store
                .open_task("session-a", "prompt", "/repo")
                .expect("open task");
            assert_eq!(opened.seq, expected);
        }

        let other = store
            .open_task("session-b", "prompt", "/repo")
            .expect("open task");
        assert_eq!(other.seq, 1);
        assert_eq!(store.task_count("session-a").expect("count"), 3);
        assert_eq!(store.task_count("session-b").expect("count"), 1);
    }

    #[test]
    fn concurrent_opens_never_collide_on_seq() {
        let (_dir, store) = temp_store();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..5)
                        .map(|_| {
                            store
                                .open_task("session-race", "prompt", "/repo")
                                .expect("open task")
                                .seq
                        })
                        .collect::<Vec<i64>>()
                })
            })
            .collect();

        let mut seqs: Vec<i64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("join thread"))
            .collect();
        seqs.sort_unstable();

        assert_eq!(seqs, (1..=20).collect::<Vec<i64>>());
    }

    #[test]
    fn close_without_open_task_returns_none_and_mutates_nothing() {
        let (_dir, store) = temp_store();

        let closed = store
            .close_latest_open_task("session-a", Utc::now())
            .expect("close");
        assert!(closed.is_none());
        assert_eq!(store.task_count("session-a").expect("count"), 0);
    }

    #[test]
    fn close_picks_most_recent_open_task() {
        let (_dir, store) = temp_store();

        let first = store
            .open_task("session-a", "first", "/repo")
            .expect("open first");
        let second = store
            .open_task("session-a", "second", "/repo")
            .expect("open second");
        assert!(second.id > first.id);

        let closed = store
            .close_latest_open_task("session-a", Utc::now())
            .expect("close")
            .expect("task closed");
        assert_eq!(closed.seq, second.seq);
        assert_eq!(store.open_task_count("session-a").expect("count"), 1);

        let closed = store
            .close_latest_open_task("session-a", Utc::now())
            .expect("close")
            .expect("task closed");
        assert_eq!(closed.seq, first.seq);

        let closed = store
            .close_latest_open_task("session-a", Utc::now())
            .expect("close");
        assert!(closed.is_none());
    }

    #[test]
    fn duration_is_floored_whole_seconds() {
        let (_dir, store) = temp_store();

        let opened = store
            .open_task("session-a", "prompt", "/repo")
            .expect("open task");

        let closed = store
            .close_latest_open_task(
                "session-a",
                opened.created_at + Duration::milliseconds(65_900),
            )
            .expect("close")
            .expect("task closed");
        assert_eq!(closed.duration_seconds, 65);
    }

    #[test]
    fn reinit_preserves_existing_tasks_and_seq() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let db_path = temp_dir.path().join("tasks.db");

        {
            let store = Store::new(db_path.clone()).expect("store init");
            store.open_task("session-a", "one", "/repo").expect("open");
            store.open_task("session-a", "two", "/repo").expect("open");
        }

        let store = Store::new(db_path).expect("store reinit");
        assert_eq!(store.task_count("session-a").expect("count"), 2);

        let opened = store
            .open_task("session-a", "three", "/repo")
            .expect("open");
        assert_eq!(opened.seq, 3);
    }

    #[test]
    fn closed_task_stays_closed() {
        let (_dir, store) = temp_store();

        let opened = store
            .open_task("session-a", "prompt", "/repo")
            .expect("open task");
        let first_close = store
            .close_latest_open_task("session-a", opened.created_at + Duration::seconds(5))
            .expect("close")
            .expect("task closed");
        assert_eq!(first_close.duration_seconds, 5);

        // No open task remains, so a later stop for the session is a no-op.
        let second_close = store
            .close_latest_open_task("session-a", opened.created_at + Duration::seconds(60))
            .expect("close");
        assert!(second_close.is_none());
        assert_eq!(store.open_task_count("session-a").expect("count"), 0);
    }
}
