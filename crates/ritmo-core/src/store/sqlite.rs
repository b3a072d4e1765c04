//! SQLite-backed participant registry and activity ledger.
//!
//! Two tables, no foreign-key enforcement: `participants` is keyed by id and
//! upserted; `activities` is append-only.

use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::{data_dir, ActivityLedger, ParticipantRegistry};
use crate::error::StoreError;
use crate::model::{ActivityEvent, ActivityKind, Category, Participant};

/// SQLite store at `~/.config/ritmo/ritmo.db`.
///
/// The connection is shared behind a mutex; all operations are short
/// statements, so contention stays per-statement rather than per-flow.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database, creating the file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?
            .join("ritmo.db");
        let conn = Connection::open(&path)
            .map_err(|source| StoreError::OpenFailed { path, source })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS participants (
                id            TEXT PRIMARY KEY,
                category      TEXT NOT NULL,
                registered_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activities (
                participant_id TEXT NOT NULL,
                kind           INTEGER NOT NULL,
                value          TEXT NOT NULL,
                timestamp      INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activities_participant_ts
                ON activities(participant_id, timestamp);",
        )
        .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl ParticipantRegistry for SqliteStore {
    async fn upsert(&self, participant: &Participant) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO participants (id, category, registered_at)
             VALUES (?1, ?2, ?3)",
            params![
                participant.id,
                participant.category.tag(),
                participant.registered_at,
            ],
        )?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Participant>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, category, registered_at FROM participants")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (id, category, registered_at) = row?;
            let category = Category::from_tag(&category).ok_or_else(|| {
                StoreError::QueryFailed(format!("unknown participant category '{category}'"))
            })?;
            result.push(Participant {
                id,
                category,
                registered_at,
            });
        }
        Ok(result)
    }
}

#[async_trait]
impl ActivityLedger for SqliteStore {
    async fn append(&self, event: &ActivityEvent) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO activities (participant_id, kind, value, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.participant_id,
                event.kind.as_i64(),
                event.value,
                event.timestamp,
            ],
        )?;
        Ok(())
    }

    async fn query(
        &self,
        participant_id: &str,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<Vec<ActivityEvent>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT participant_id, kind, value, timestamp FROM activities
             WHERE participant_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3",
        )?;
        let rows = stmt.query_map(params![participant_id, from_ts, to_ts], |row| {
            Ok(ActivityEvent {
                participant_id: row.get(0)?,
                kind: ActivityKind::from_i64(row.get(1)?),
                value: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_query_respects_inclusive_bounds() {
        let store = SqliteStore::open_memory().unwrap();
        for ts in [100, 200, 300] {
            store
                .append(&ActivityEvent::affirmative("7", ActivityKind::Morning, ts))
                .await
                .unwrap();
        }

        let hits = store.query("7", 100, 200).await.unwrap();
        assert_eq!(hits.len(), 2);
        let all = store.query("7", 0, 1000).await.unwrap();
        assert_eq!(all.len(), 3);
        let none = store.query("8", 0, 1000).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn upsert_overwrites_same_id() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .upsert(&Participant {
                id: "7".into(),
                category: Category::GroupA,
                registered_at: 100,
            })
            .await
            .unwrap();
        store
            .upsert(&Participant {
                id: "7".into(),
                category: Category::GroupB,
                registered_at: 200,
            })
            .await
            .unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category, Category::GroupB);
        assert_eq!(all[0].registered_at, 200);
    }

    #[tokio::test]
    async fn unknown_stored_kind_reads_back_as_unknown() {
        let store = SqliteStore::open_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO activities (participant_id, kind, value, timestamp)
                 VALUES ('7', 42, '1', 100)",
                [],
            )
            .unwrap();
        }

        let events = store.query("7", 0, 1000).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ActivityKind::Unknown);
    }

    #[tokio::test]
    async fn on_disk_store_persists_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ritmo.db");
        {
            let conn = Connection::open(&path).unwrap();
            let store = SqliteStore {
                conn: Mutex::new(conn),
            };
            store.migrate().unwrap();
            store
                .append(&ActivityEvent::affirmative("7", ActivityKind::Weekly, 500))
                .await
                .unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        let store = SqliteStore {
            conn: Mutex::new(conn),
        };
        store.migrate().unwrap();
        let events = store.query("7", 0, 1000).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ActivityKind::Weekly);
    }
}
