use chrono::Local;
use clap::Subcommand;
use ritmo_core::report::format_sequence;

use crate::common::{build_engine, parse_granularity, CliError};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Total registered participant count
    Total,
    /// Active participants per window, most recent first
    Active {
        /// Series granularity (day, week, month)
        #[arg(long, default_value = "day")]
        granularity: String,
        /// Number of windows to cover
        #[arg(long, default_value = "10")]
        items: usize,
    },
}

pub async fn run(action: StatsAction) -> Result<(), CliError> {
    let engine = build_engine()?;
    match action {
        StatsAction::Total => {
            println!("{}", engine.total_participants().await?);
        }
        StatsAction::Active { granularity, items } => {
            let granularity = parse_granularity(&granularity)?;
            let today = Local::now().date_naive();
            let series = engine
                .active_participant_series(granularity, items, today, &Local)
                .await;
            if series.is_empty() {
                println!("no active participants yet");
            } else {
                println!("{}", format_sequence("", &series, ""));
            }
        }
    }
    Ok(())
}
