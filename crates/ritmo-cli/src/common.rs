//! Shared CLI plumbing: the console transport and engine construction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use ritmo_core::{
    Category, ChoiceButton, CoachEngine, Config, Granularity, Result, SqliteStore, Transport,
};

pub type CliError = Box<dyn std::error::Error>;

/// Transport that writes deliveries to stdout. Serves `flow run` and
/// `serve` when no chat transport is wired in.
pub struct ConsoleTransport;

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send_text(&self, participant_id: &str, text: &str) -> Result<()> {
        println!("[{participant_id}] {text}");
        Ok(())
    }

    async fn send_choice_prompt(
        &self,
        participant_id: &str,
        text: &str,
        choices: &[ChoiceButton],
    ) -> Result<()> {
        println!("[{participant_id}] {text}");
        for choice in choices {
            println!("  ({}) {}", choice.callback_id, choice.label);
        }
        Ok(())
    }
}

/// Open the store and assemble a coach engine over the console transport.
pub fn build_engine() -> std::result::Result<Arc<CoachEngine>, CliError> {
    let store = Arc::new(SqliteStore::open()?);
    let config = Config::load()?;
    Ok(Arc::new(CoachEngine::new(
        store.clone(),
        store,
        Arc::new(ConsoleTransport),
        config,
    )))
}

pub fn parse_category(s: &str) -> std::result::Result<Category, CliError> {
    Category::from_tag(s).ok_or_else(|| format!("unknown category: {s} (expected groupA or groupB)").into())
}

pub fn parse_granularity(s: &str) -> std::result::Result<Granularity, CliError> {
    match s {
        "day" => Ok(Granularity::Day),
        "week" => Ok(Granularity::Week),
        "month" => Ok(Granularity::Month),
        other => Err(format!("unknown granularity: {other} (expected day, week or month)").into()),
    }
}

pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}': {e}").into())
}
