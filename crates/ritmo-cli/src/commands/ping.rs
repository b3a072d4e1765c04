use crate::common::{build_engine, CliError};

pub async fn run() -> Result<(), CliError> {
    let engine = build_engine()?;
    println!("{}", engine.ping());
    Ok(())
}
