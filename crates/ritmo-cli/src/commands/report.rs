use chrono::Local;

use crate::common::{build_engine, parse_date, CliError};

pub async fn run(participant_id: &str, date: Option<&str>) -> Result<(), CliError> {
    let engine = build_engine()?;
    let today = match date {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };
    println!("{}", engine.build_report(participant_id, today, &Local).await);
    Ok(())
}
