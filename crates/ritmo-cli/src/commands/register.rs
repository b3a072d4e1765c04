use crate::common::{build_engine, parse_category, CliError};

pub async fn run(participant_id: &str, category: &str) -> Result<(), CliError> {
    let category = parse_category(category)?;
    let engine = build_engine()?;
    engine.on_register_participant(participant_id, category).await?;
    println!("registered {participant_id} as {}", category.tag());
    Ok(())
}
