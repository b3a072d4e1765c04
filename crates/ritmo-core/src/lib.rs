//! # Ritmo Core Library
//!
//! Core business logic for Ritmo, a personal-engagement coach delivered
//! through a chat interface: it prompts registered participants on a daily/
//! weekly/monthly cadence, records yes/no answers to ritual prompts, turns
//! them into a point score, and reports rolling progress. The chat transport
//! itself is a thin layer over this library.
//!
//! ## Architecture
//!
//! - **Survey Flow**: an explicit per-participant state machine over a
//!   per-category plan of ordered yes/no prompts; transitions are pure with
//!   respect to delivery
//! - **Storage**: SQLite-backed activity ledger (append-only) and
//!   participant registry (upsert), plus TOML-based configuration
//! - **Scoring**: weighted sums over inclusive calendar windows and
//!   trailing-zero-trimmed progress series
//! - **Scheduler**: independent wall-clock triggers feeding the coach
//! - **Coach**: the orchestrator wiring all of the above to a `Transport`
//!
//! ## Key Components
//!
//! - [`CoachEngine`]: inbound interface and broadcast fan-out
//! - [`SurveyFlow`]: the prompt state machine
//! - [`ScoreEngine`]: windowed score aggregation
//! - [`SqliteStore`]: ledger + registry persistence
//! - [`Config`]: application configuration management

pub mod coach;
pub mod error;
pub mod flow;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod score;
pub mod store;
pub mod transport;

pub use coach::CoachEngine;
pub use error::{ConfigError, CoreError, Result, StoreError};
pub use flow::{FlowPlan, FlowState, FlowStep, PromptSpec, ReminderSpec, SurveyFlow};
pub use model::{ActivityEvent, ActivityKind, Answer, Category, Participant};
pub use report::ReportSummary;
pub use scheduler::{next_occurrence, Scheduler, TriggerSpec};
pub use score::{trim_trailing_zeros, Granularity, ScoreEngine, ScoreWeights};
pub use store::{ActivityLedger, Config, ParticipantRegistry, ReportConfig, SqliteStore, SurveyConfig};
pub use transport::{ChoiceButton, Transport};
