//! Survey flow: per-category plans and the state machine that traverses them.

mod engine;
mod plan;

pub use engine::{FlowState, FlowStep, SurveyFlow};
pub use plan::{FlowPlan, PromptSpec, ReminderSpec};
