use chrono::Local;
use ritmo_core::report::format_sequence;

use crate::common::{build_engine, parse_granularity, CliError};

pub async fn run(participant_id: &str, granularity: &str, items: usize) -> Result<(), CliError> {
    let granularity = parse_granularity(granularity)?;
    let engine = build_engine()?;

    let today = Local::now().date_naive();
    let series = engine
        .scores()
        .progress_series(participant_id, granularity, items, today, &Local)
        .await;
    if series.is_empty() {
        println!("no recorded activity yet");
    } else {
        println!(
            "{}",
            format_sequence("", &series, &engine.config().report.suffix)
        );
    }
    Ok(())
}
