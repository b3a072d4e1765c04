use chrono::Local;
use ritmo_core::score::window;
use ritmo_core::Granularity;

use crate::common::{build_engine, parse_granularity, CliError};

pub async fn run(participant_id: &str, granularity: &str) -> Result<(), CliError> {
    let granularity = parse_granularity(granularity)?;
    let engine = build_engine()?;

    let today = Local::now().date_naive();
    let (from, to) = match granularity {
        Granularity::Day => window::day_window(today, &Local),
        Granularity::Week => window::week_window(today, &Local),
        Granularity::Month => window::month_window(today, &Local),
    };
    let score = engine.scores().score_in_window(participant_id, from, to).await;
    println!("{score}{}", engine.config().report.suffix);
    Ok(())
}
