//! Survey flow state machine.
//!
//! One engine traverses a participant through their plan's ordered yes/no
//! prompts. Transitions are pure with respect to delivery: `answer()` reports
//! which tier was answered and what to ask next; it performs no I/O, so the
//! machine is inspectable and testable without side effects.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Ask(0) -> Ask(1) -> ... -> Ask(n-1) -> Completed
//! ```
//!
//! Either answer advances; there is no back transition and no timeout. A
//! participant who never responds stays parked at their current prompt.

use serde::{Deserialize, Serialize};

use super::plan::{FlowPlan, PromptSpec};
use crate::model::{ActivityKind, Answer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowState {
    Idle,
    Ask { index: usize },
    Completed,
}

/// Outcome of one answered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    /// Tier the participant just answered.
    pub answered: ActivityKind,
    pub answer: Answer,
    /// Next prompt to deliver, or `None` when the flow just completed.
    pub next_prompt: Option<PromptSpec>,
}

/// One traversal of a participant through their plan. Transient: lives only
/// while the participant is actively answering.
#[derive(Debug, Clone)]
pub struct SurveyFlow {
    plan: FlowPlan,
    state: FlowState,
}

impl SurveyFlow {
    pub fn new(plan: FlowPlan) -> Self {
        Self {
            plan,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn plan(&self) -> &FlowPlan {
        &self.plan
    }

    pub fn is_completed(&self) -> bool {
        self.state == FlowState::Completed
    }

    pub fn current_prompt(&self) -> Option<&PromptSpec> {
        match self.state {
            FlowState::Ask { index } => self.plan.prompts.get(index),
            _ => None,
        }
    }

    /// Enter the flow. Only valid from `Idle`; an empty plan completes
    /// immediately. Returns the first prompt to deliver.
    pub fn begin(&mut self) -> Option<&PromptSpec> {
        if self.state != FlowState::Idle {
            return None;
        }
        if self.plan.prompts.is_empty() {
            self.state = FlowState::Completed;
            return None;
        }
        self.state = FlowState::Ask { index: 0 };
        self.plan.prompts.first()
    }

    /// Answer the current prompt. Either answer advances deterministically;
    /// the last prompt's answer transitions to `Completed`. Returns `None`
    /// when there is no prompt pending.
    pub fn answer(&mut self, answer: Answer) -> Option<FlowStep> {
        let index = match self.state {
            FlowState::Ask { index } => index,
            _ => return None,
        };
        let answered = self.plan.prompts.get(index)?.kind;

        let next_index = index + 1;
        let next_prompt = self.plan.prompts.get(next_index).cloned();
        self.state = match next_prompt {
            Some(_) => FlowState::Ask { index: next_index },
            None => FlowState::Completed,
        };

        Some(FlowStep {
            answered,
            answer,
            next_prompt,
        })
    }
}
