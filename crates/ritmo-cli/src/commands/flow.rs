use clap::Subcommand;
use ritmo_core::{Answer, FlowState};

use crate::common::{build_engine, parse_category, CliError};

#[derive(Subcommand)]
pub enum FlowAction {
    /// Walk the survey flow interactively, answering on stdin
    Run {
        /// Participant id
        participant_id: String,
        /// Category plan to traverse (defaults to the registered one)
        #[arg(long)]
        category: Option<String>,
    },
    /// Print a category's flow plan as JSON
    Plan {
        /// Participant category (groupA or groupB)
        category: String,
    },
}

pub async fn run(action: FlowAction) -> Result<(), CliError> {
    match action {
        FlowAction::Run {
            participant_id,
            category,
        } => run_flow(&participant_id, category.as_deref()).await,
        FlowAction::Plan { category } => {
            let engine = build_engine()?;
            let plan = engine.config().plan_for(parse_category(&category)?);
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
    }
}

async fn run_flow(participant_id: &str, category: Option<&str>) -> Result<(), CliError> {
    let engine = build_engine()?;
    let category = match category {
        Some(tag) => parse_category(tag)?,
        None => registered_category(&engine, participant_id).await?,
    };
    let plan = engine.config().plan_for(category);

    engine.begin_flow(participant_id, category).await?;
    while let Some(FlowState::Ask { index }) = engine.flow_state(participant_id).await {
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            println!("flow left open, answers so far are recorded");
            return Ok(());
        }
        let Some(answer) = Answer::from_str_loose(&line) else {
            println!("please answer yes or no");
            continue;
        };
        let prompt_id = plan
            .prompts
            .get(index)
            .map(|p| format!("survey:{}", p.kind.tag()))
            .unwrap_or_default();
        engine
            .on_participant_response(participant_id, &prompt_id, answer)
            .await?;
    }
    Ok(())
}

async fn registered_category(
    engine: &ritmo_core::CoachEngine,
    participant_id: &str,
) -> Result<ritmo_core::Category, CliError> {
    engine
        .category_of(participant_id)
        .await?
        .ok_or_else(|| format!("participant {participant_id} is not registered").into())
}
