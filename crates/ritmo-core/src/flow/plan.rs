//! Per-category flow configuration.
//!
//! A plan carries the ordered yes/no prompts for one participant category
//! plus its schedule: reminder times with their nudge text and the survey
//! entry time. One flow engine parameterized by a plan replaces what would
//! otherwise be a duplicated state machine per category.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::{ActivityKind, Category};

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// One yes/no prompt in a plan's ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub kind: ActivityKind,
    pub text: String,
}

/// A scheduled reminder broadcast.
///
/// `texts` with exactly seven entries rotates by weekday (Monday first);
/// anything else rotates modulo its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub name: String,
    pub time: NaiveTime,
    pub texts: Vec<String>,
}

impl ReminderSpec {
    pub fn text_for(&self, weekday: Weekday) -> &str {
        if self.texts.is_empty() {
            return "";
        }
        let index = weekday.num_days_from_monday() as usize % self.texts.len();
        &self.texts[index]
    }
}

/// The full per-category flow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPlan {
    pub category: Category,
    /// Text sent once on registration.
    #[serde(default)]
    pub welcome: String,
    pub prompts: Vec<PromptSpec>,
    pub survey_time: NaiveTime,
    pub reminders: Vec<ReminderSpec>,
}

impl FlowPlan {
    /// Full six-tier sequence with three daily nudges and a late survey.
    pub fn group_a() -> Self {
        let prompt = |kind: ActivityKind, text: &str| PromptSpec {
            kind,
            text: text.to_string(),
        };
        let reminder = |name: &str, time: NaiveTime, text: &str| ReminderSpec {
            name: name.to_string(),
            time,
            texts: vec![text.to_string()],
        };

        Self {
            category: Category::GroupA,
            welcome: "Welcome! I will remind you about your daily, weekly and monthly \
                      rituals, survey you each evening, and track your engagement score \
                      over time."
                .to_string(),
            prompts: vec![
                prompt(
                    ActivityKind::Morning,
                    "Good evening, time to check in.\nDid you complete your morning rituals?",
                ),
                prompt(ActivityKind::Midday, "Did you complete your midday rituals?"),
                prompt(ActivityKind::Evening, "Did you complete your evening rituals?"),
                prompt(ActivityKind::Weekly, "Did you complete your weekly rituals?"),
                prompt(ActivityKind::Monthly, "Did you complete your monthly rituals?"),
                prompt(
                    ActivityKind::Exceptional,
                    "Did you do something truly exceptional today?",
                ),
            ],
            survey_time: hm(22, 0),
            reminders: vec![
                reminder("morning", hm(10, 0), "Morning reminder: time for your morning rituals."),
                reminder("midday", hm(14, 0), "Midday reminder: time for your midday rituals."),
                reminder("evening", hm(19, 0), "Evening reminder: time for your evening rituals."),
            ],
        }
    }

    /// Reduced evening-only sequence with a weekday-themed morning setup.
    pub fn group_b() -> Self {
        Self {
            category: Category::GroupB,
            welcome: "Welcome! I will send you a short setup each morning, check in \
                      every evening, and track how your days are going."
                .to_string(),
            prompts: vec![PromptSpec {
                kind: ActivityKind::Evening,
                text: "Did your day go well?".to_string(),
            }],
            survey_time: hm(18, 0),
            reminders: vec![ReminderSpec {
                name: "setup".to_string(),
                time: hm(8, 0),
                texts: vec![
                    "Monday setup: pick one thing to focus on today.".to_string(),
                    "Tuesday setup: note how you feel this morning.".to_string(),
                    "Wednesday setup: plan one small kindness today.".to_string(),
                    "Thursday setup: revisit what worked yesterday.".to_string(),
                    "Friday setup: set an intention for the weekend.".to_string(),
                    "Saturday setup: take time for yourself today.".to_string(),
                    "Sunday setup: reflect on the week behind you.".to_string(),
                ],
            }],
        }
    }

    /// The built-in plans, one per category.
    pub fn builtin() -> Vec<FlowPlan> {
        vec![Self::group_a(), Self::group_b()]
    }
}
