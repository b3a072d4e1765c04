use ritmo_core::Scheduler;
use tokio::sync::mpsc;
use tracing::info;

use crate::common::{build_engine, CliError};

pub async fn run() -> Result<(), CliError> {
    let engine = build_engine()?;
    let specs = engine.trigger_specs();
    for spec in &specs {
        info!(trigger = %spec.name, time = %spec.time, "trigger armed");
    }

    let (tx, mut rx) = mpsc::channel(16);
    Scheduler::new(specs).start(tx);

    println!("serving {} triggers, ctrl-c to stop", engine.trigger_specs().len());
    while let Some(trigger_name) = rx.recv().await {
        engine.on_scheduled_tick(&trigger_name).await;
    }
    Ok(())
}
