//! Persistence seams: the activity ledger and participant registry traits,
//! plus the SQLite implementation and TOML configuration.

mod config;
pub mod sqlite;

pub use config::{Config, ReportConfig, SurveyConfig};
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{ActivityEvent, Participant};

/// Append-only record of participant activity events.
///
/// Appends are at-most-once: a failure is reported to the caller and never
/// retried by this layer. There is no transaction across multiple appends.
#[async_trait]
pub trait ActivityLedger: Send + Sync {
    async fn append(&self, event: &ActivityEvent) -> Result<(), StoreError>;

    /// Events for one participant with timestamps in `[from_ts, to_ts]`
    /// (inclusive Unix-second bounds).
    async fn query(
        &self,
        participant_id: &str,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<Vec<ActivityEvent>, StoreError>;
}

/// Registry of participants. Upsert replaces any existing record with the
/// same id; participants are never deleted.
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    async fn upsert(&self, participant: &Participant) -> Result<(), StoreError>;

    async fn list_all(&self) -> Result<Vec<Participant>, StoreError>;
}

/// Returns `~/.config/ritmo[-dev]/` based on RITMO_ENV.
///
/// Set RITMO_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RITMO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ritmo-dev")
    } else {
        base_dir.join("ritmo")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
