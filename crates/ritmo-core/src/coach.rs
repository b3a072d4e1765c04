//! Coach engine: the orchestrator behind the inbound interface.
//!
//! Owns the wiring -- registry, ledger, transport, and per-category plans
//! are injected at construction, never reached through globals. Keeps the
//! table of active survey flows, fans broadcasts out one independent unit
//! of work per participant, and assembles the completion report.
//!
//! Failure posture: nothing here is fatal. A failed activity append still
//! advances the flow, a failed delivery is logged and skipped, a registry
//! load failure aborts only that broadcast cycle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::flow::{PromptSpec, SurveyFlow};
use crate::model::{ActivityEvent, Answer, Category, Participant};
use crate::report::{self, ReportSummary};
use crate::scheduler::TriggerSpec;
use crate::score::{window, Granularity, ScoreEngine};
use crate::store::{ActivityLedger, Config, ParticipantRegistry};
use crate::transport::{ChoiceButton, Transport};

const REGISTRATION_PROMPT: &str =
    "Welcome! I coach engagement rituals. To tailor them I need to know your group.";

/// The engagement coach. One instance serves every participant.
pub struct CoachEngine {
    registry: Arc<dyn ParticipantRegistry>,
    ledger: Arc<dyn ActivityLedger>,
    transport: Arc<dyn Transport>,
    config: Config,
    score: ScoreEngine,
    /// Transient per-participant survey flows. A flow lives from survey
    /// entry until its last answer and is never persisted.
    flows: Mutex<HashMap<String, SurveyFlow>>,
}

impl CoachEngine {
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        ledger: Arc<dyn ActivityLedger>,
        transport: Arc<dyn Transport>,
        config: Config,
    ) -> Self {
        let score = ScoreEngine::new(ledger.clone(), config.weights);
        Self {
            registry,
            ledger,
            transport,
            config,
            score,
            flows: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scores(&self) -> &ScoreEngine {
        &self.score
    }

    /// Health check.
    pub fn ping(&self) -> &'static str {
        "pong"
    }

    /// Command summary for the transport's help surface.
    pub fn help_text(&self) -> String {
        [
            "start - choose your group and register",
            "daily - score dynamics by day",
            "weekly - score dynamics by week",
            "monthly - score dynamics by month",
            "report - today's engagement report",
            "ping - health check",
        ]
        .join("\n")
    }

    /// Wall-clock triggers derived from the configured plans: one survey
    /// entry plus one trigger per reminder, per category.
    pub fn trigger_specs(&self) -> Vec<TriggerSpec> {
        let mut specs = Vec::new();
        for plan in &self.config.plans {
            let category = plan.category.tag();
            specs.push(TriggerSpec::daily(
                format!("{category}:survey"),
                plan.survey_time,
            ));
            for reminder in &plan.reminders {
                specs.push(TriggerSpec::daily(
                    format!("{category}:reminder:{}", reminder.name),
                    reminder.time,
                ));
            }
        }
        specs
    }

    // ── Inbound interface ────────────────────────────────────────────

    /// The `start` interaction: ask the participant to pick a category.
    pub async fn on_start(&self, participant_id: &str) -> Result<()> {
        let choices = vec![
            ChoiceButton::new("Group A", "register:groupA"),
            ChoiceButton::new("Group B", "register:groupB"),
        ];
        self.transport
            .send_choice_prompt(participant_id, REGISTRATION_PROMPT, &choices)
            .await
    }

    /// Register (or re-register) a participant. Upsert semantics: the same
    /// id with a new category overwrites, never duplicates.
    pub async fn on_register_participant(
        &self,
        participant_id: &str,
        category: Category,
    ) -> Result<()> {
        let participant = Participant {
            id: participant_id.to_string(),
            category,
            registered_at: Utc::now().timestamp(),
        };
        self.registry.upsert(&participant).await?;
        info!(participant_id, category = category.tag(), "participant registered");

        let welcome = self.config.plan_for(category).welcome;
        if !welcome.is_empty() {
            if let Err(e) = self.transport.send_text(participant_id, &welcome).await {
                warn!(participant_id, error = %e, "welcome delivery failed");
            }
        }
        Ok(())
    }

    /// Dispatch a scheduler firing. Trigger names are
    /// `<category>:survey` or `<category>:reminder:<name>`.
    pub async fn on_scheduled_tick(self: &Arc<Self>, trigger_name: &str) {
        let mut parts = trigger_name.splitn(3, ':');
        let (category, kind) = match (parts.next(), parts.next()) {
            (Some(category), Some(kind)) => (category, kind),
            _ => {
                warn!(trigger_name, "malformed trigger name");
                return;
            }
        };
        let Some(category) = Category::from_tag(category) else {
            warn!(trigger_name, "trigger for unknown category");
            return;
        };

        match kind {
            "survey" => {
                let started = self.broadcast_survey(category).await;
                info!(category = category.tag(), started, "survey broadcast done");
            }
            "reminder" => {
                let Some(name) = parts.next() else {
                    warn!(trigger_name, "reminder trigger without a name");
                    return;
                };
                let plan = self.config.plan_for(category);
                let Some(reminder) = plan.reminders.iter().find(|r| r.name == name) else {
                    warn!(trigger_name, "trigger for unknown reminder");
                    return;
                };
                let text = reminder
                    .text_for(Local::now().date_naive().weekday())
                    .to_string();
                let delivered = self.broadcast_text(category, &text).await;
                info!(category = category.tag(), delivered, "reminder broadcast done");
            }
            _ => warn!(trigger_name, "unknown trigger kind"),
        }
    }

    /// A participant answered the prompt identified by `prompt_id`.
    ///
    /// Either answer advances the flow; only an affirmative one records an
    /// event (unless negative recording is configured). Concurrent
    /// duplicate answers are not deduplicated -- both may record.
    pub async fn on_participant_response(
        &self,
        participant_id: &str,
        prompt_id: &str,
        answer: Answer,
    ) -> Result<()> {
        let step = {
            let mut flows = self.flows.lock().await;
            let Some(flow) = flows.get_mut(participant_id) else {
                debug!(participant_id, prompt_id, "response without an active flow, ignoring");
                return Ok(());
            };
            let step = flow.answer(answer);
            if flow.is_completed() {
                flows.remove(participant_id);
            }
            step
        };
        let Some(step) = step else {
            return Ok(());
        };

        let expected_prompt = format!("survey:{}", step.answered.tag());
        if prompt_id != expected_prompt {
            debug!(participant_id, prompt_id, expected_prompt, "stale prompt id on response");
        }

        let now = Utc::now().timestamp();
        let event = match answer {
            Answer::Yes => Some(ActivityEvent::affirmative(participant_id, step.answered, now)),
            Answer::No if self.config.survey.record_negative_answers => {
                Some(ActivityEvent::negative(participant_id, step.answered, now))
            }
            Answer::No => None,
        };
        if let Some(event) = event {
            // Fire-and-forget relative to flow progression: the score just
            // undercounts if this write is lost.
            if let Err(e) = self.ledger.append(&event).await {
                warn!(participant_id, error = %e, "activity append failed, advancing anyway");
            }
        }

        match step.next_prompt {
            Some(prompt) => self.send_prompt(participant_id, &prompt).await,
            None => {
                let today = Local::now().date_naive();
                let message = self.build_report(participant_id, today, &Local).await;
                self.transport.send_text(participant_id, &message).await
            }
        }
    }

    // ── Survey flow ──────────────────────────────────────────────────

    /// Enter the survey flow for one participant and deliver the first
    /// prompt. Replaces any flow left parked from a previous cycle.
    pub async fn begin_flow(&self, participant_id: &str, category: Category) -> Result<()> {
        let mut flow = SurveyFlow::new(self.config.plan_for(category));
        let first = flow.begin().cloned();
        match first {
            Some(prompt) => {
                self.flows
                    .lock()
                    .await
                    .insert(participant_id.to_string(), flow);
                self.send_prompt(participant_id, &prompt).await
            }
            None => Ok(()),
        }
    }

    /// State of a participant's active flow, if any.
    pub async fn flow_state(&self, participant_id: &str) -> Option<crate::flow::FlowState> {
        self.flows
            .lock()
            .await
            .get(participant_id)
            .map(|flow| flow.state())
    }

    async fn send_prompt(&self, participant_id: &str, prompt: &PromptSpec) -> Result<()> {
        let tag = prompt.kind.tag();
        let choices = vec![
            ChoiceButton::new("Yes", format!("survey:{tag}:yes")),
            ChoiceButton::new("No", format!("survey:{tag}:no")),
        ];
        self.transport
            .send_choice_prompt(participant_id, &prompt.text, &choices)
            .await
    }

    // ── Broadcasts ───────────────────────────────────────────────────

    async fn participants_of(&self, category: Category) -> Vec<Participant> {
        match self.registry.list_all().await {
            Ok(participants) => participants
                .into_iter()
                .filter(|p| p.category == category)
                .collect(),
            Err(e) => {
                warn!(error = %e, "registry load failed, aborting broadcast cycle");
                Vec::new()
            }
        }
    }

    /// Send `text` to every participant of `category`. One delivery failure
    /// never aborts the rest. Returns the number delivered.
    pub async fn broadcast_text(self: &Arc<Self>, category: Category, text: &str) -> usize {
        let participants = self.participants_of(category).await;
        let mut join = JoinSet::new();
        for participant in participants {
            let engine = Arc::clone(self);
            let text = text.to_string();
            join.spawn(async move {
                let result = engine.transport.send_text(&participant.id, &text).await;
                (participant.id, result)
            });
        }
        self.drain_broadcast(&mut join, "text broadcast").await
    }

    /// Start the survey flow for every participant of `category`. Returns
    /// the number of flows whose first prompt was delivered.
    pub async fn broadcast_survey(self: &Arc<Self>, category: Category) -> usize {
        let participants = self.participants_of(category).await;
        let mut join = JoinSet::new();
        for participant in participants {
            let engine = Arc::clone(self);
            join.spawn(async move {
                let result = engine.begin_flow(&participant.id, participant.category).await;
                (participant.id, result)
            });
        }
        self.drain_broadcast(&mut join, "survey broadcast").await
    }

    async fn drain_broadcast(
        &self,
        join: &mut JoinSet<(String, Result<()>)>,
        what: &str,
    ) -> usize {
        let mut delivered = 0;
        while let Some(outcome) = join.join_next().await {
            match outcome {
                Ok((_, Ok(()))) => delivered += 1,
                Ok((participant_id, Err(e))) => {
                    warn!(participant_id, error = %e, "{what} failed for participant");
                }
                Err(e) => warn!(error = %e, "{what} task panicked"),
            }
        }
        delivered
    }

    // ── Reporting ────────────────────────────────────────────────────

    /// Assemble the completion report for `today`: the day's score and
    /// daily series, a weekly summary on Sundays, a monthly summary on the
    /// last day of the month.
    pub async fn build_report<Tz>(&self, participant_id: &str, today: NaiveDate, tz: &Tz) -> String
    where
        Tz: TimeZone + Sync,
    {
        let report_config = &self.config.report;

        let (from, to) = window::day_window(today, tz);
        let daily = ReportSummary {
            score: self.score.score_in_window(participant_id, from, to).await,
            series: self
                .score
                .progress_series(participant_id, Granularity::Day, report_config.daily_items, today, tz)
                .await,
        };

        let weekly = if report::weekly_summary_due(today) {
            let (from, to) = window::week_window(today, tz);
            Some(ReportSummary {
                score: self.score.score_in_window(participant_id, from, to).await,
                series: self
                    .score
                    .progress_series(participant_id, Granularity::Week, report_config.weekly_items, today, tz)
                    .await,
            })
        } else {
            None
        };

        let monthly = if report::monthly_summary_due(today) {
            let (from, to) = window::month_window(today, tz);
            Some(ReportSummary {
                score: self.score.score_in_window(participant_id, from, to).await,
                series: self
                    .score
                    .progress_series(participant_id, Granularity::Month, report_config.monthly_items, today, tz)
                    .await,
            })
        } else {
            None
        };

        report::render_report(today, &daily, weekly.as_ref(), monthly.as_ref(), report_config)
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub async fn total_participants(&self) -> Result<usize> {
        Ok(self.registry.list_all().await?.len())
    }

    /// Registered category of a participant, if any.
    pub async fn category_of(&self, participant_id: &str) -> Result<Option<Category>> {
        Ok(self
            .registry
            .list_all()
            .await?
            .into_iter()
            .find(|p| p.id == participant_id)
            .map(|p| p.category))
    }

    /// Count of participants with at least one event per window, most
    /// recent first, trimmed like a progress series.
    pub async fn active_participant_series<Tz>(
        &self,
        granularity: Granularity,
        item_count: usize,
        today: NaiveDate,
        tz: &Tz,
    ) -> Vec<i64>
    where
        Tz: TimeZone + Sync,
    {
        self.score
            .active_participant_series(self.registry.as_ref(), granularity, item_count, today, tz)
            .await
    }
}
