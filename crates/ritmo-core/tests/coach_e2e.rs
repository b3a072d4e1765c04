//! End-to-end tests driving the coach engine against the in-memory store
//! and a recording transport.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use tokio::sync::Mutex;

use ritmo_core::{
    ActivityEvent, ActivityKind, ActivityLedger, Answer, Category, ChoiceButton, CoachEngine,
    Config, CoreError, Result, SqliteStore, Transport,
};

/// Records every delivery; refuses them for the configured participants.
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    fail_for: HashSet<String>,
}

impl RecordingTransport {
    fn failing_for(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_for: ids.iter().map(|id| id.to_string()).collect(),
        })
    }

    async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    fn refuse(&self, participant_id: &str) -> Result<()> {
        Err(CoreError::Transport {
            participant: participant_id.to_string(),
            message: "delivery refused".to_string(),
        })
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, participant_id: &str, text: &str) -> Result<()> {
        if self.fail_for.contains(participant_id) {
            return self.refuse(participant_id);
        }
        self.sent
            .lock()
            .await
            .push((participant_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_choice_prompt(
        &self,
        participant_id: &str,
        text: &str,
        choices: &[ChoiceButton],
    ) -> Result<()> {
        let mut entry = text.to_string();
        for choice in choices {
            entry.push_str(&format!(" [{}]", choice.callback_id));
        }
        self.send_text(participant_id, &entry).await
    }
}

fn harness(config: Config) -> (Arc<SqliteStore>, Arc<RecordingTransport>, Arc<CoachEngine>) {
    harness_failing(config, &[])
}

fn harness_failing(
    config: Config,
    fail_for: &[&str],
) -> (Arc<SqliteStore>, Arc<RecordingTransport>, Arc<CoachEngine>) {
    let store = Arc::new(SqliteStore::open_memory().unwrap());
    let transport = RecordingTransport::failing_for(fail_for);
    let engine = Arc::new(CoachEngine::new(
        store.clone(),
        store.clone(),
        transport.clone(),
        config,
    ));
    (store, transport, engine)
}

async fn answer_all(engine: &CoachEngine, participant_id: &str, answers: &[Answer]) {
    let tags = ["morning", "midday", "evening", "weekly", "monthly", "exceptional"];
    for (tag, answer) in tags.iter().zip(answers) {
        engine
            .on_participant_response(participant_id, &format!("survey:{tag}"), *answer)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn six_yes_answers_record_six_events_and_send_a_report() {
    let (store, transport, engine) = harness(Config::default());
    engine.begin_flow("100", Category::GroupA).await.unwrap();

    answer_all(&engine, "100", &[Answer::Yes; 6]).await;

    let events = store.query("100", 0, i64::MAX).await.unwrap();
    assert_eq!(events.len(), 6);
    assert!(events.iter().all(ActivityEvent::is_affirmative));
    assert!(engine.flow_state("100").await.is_none());

    let sent = transport.sent().await;
    let report = &sent.last().unwrap().1;
    assert!(report.starts_with("Today's score:"));
}

#[tokio::test]
async fn only_affirmative_answers_append_events() {
    let (store, _transport, engine) = harness(Config::default());
    engine.begin_flow("100", Category::GroupA).await.unwrap();

    answer_all(
        &engine,
        "100",
        &[
            Answer::Yes,
            Answer::No,
            Answer::No,
            Answer::Yes,
            Answer::No,
            Answer::No,
        ],
    )
    .await;

    let events = store.query("100", 0, i64::MAX).await.unwrap();
    assert_eq!(events.len(), 2);
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&ActivityKind::Morning));
    assert!(kinds.contains(&ActivityKind::Weekly));
}

#[tokio::test]
async fn all_no_answers_record_nothing_by_default() {
    let (store, transport, engine) = harness(Config::default());
    engine.begin_flow("100", Category::GroupA).await.unwrap();

    answer_all(&engine, "100", &[Answer::No; 6]).await;

    assert!(store.query("100", 0, i64::MAX).await.unwrap().is_empty());
    // The flow still completed and reported.
    assert!(transport.sent().await.last().unwrap().1.starts_with("Today's score:"));
}

#[tokio::test]
async fn negative_recording_writes_zero_valued_events_when_configured() {
    let mut config = Config::default();
    config.survey.record_negative_answers = true;
    let (store, _transport, engine) = harness(config);
    engine.begin_flow("100", Category::GroupA).await.unwrap();

    answer_all(&engine, "100", &[Answer::No; 6]).await;

    let events = store.query("100", 0, i64::MAX).await.unwrap();
    assert_eq!(events.len(), 6);
    assert!(events.iter().all(|e| e.value == "0"));
}

#[tokio::test]
async fn response_without_an_active_flow_is_ignored() {
    let (store, transport, engine) = harness(Config::default());
    engine
        .on_participant_response("100", "survey:morning", Answer::Yes)
        .await
        .unwrap();
    assert!(store.query("100", 0, i64::MAX).await.unwrap().is_empty());
    assert!(transport.sent().await.is_empty());
}

#[tokio::test]
async fn reduced_plan_completes_after_one_answer() {
    let (store, transport, engine) = harness(Config::default());
    engine.begin_flow("200", Category::GroupB).await.unwrap();

    engine
        .on_participant_response("200", "survey:evening", Answer::Yes)
        .await
        .unwrap();

    assert_eq!(store.query("200", 0, i64::MAX).await.unwrap().len(), 1);
    assert!(engine.flow_state("200").await.is_none());
    assert!(transport.sent().await.last().unwrap().1.starts_with("Today's score:"));
}

#[tokio::test]
async fn start_dialogue_offers_both_categories() {
    let (_store, transport, engine) = harness(Config::default());
    engine.on_start("100").await.unwrap();

    let sent = transport.sent().await;
    let (to, prompt) = &sent[0];
    assert_eq!(to, "100");
    assert!(prompt.contains("[register:groupA]"));
    assert!(prompt.contains("[register:groupB]"));
    assert_eq!(engine.total_participants().await.unwrap(), 0);
}

#[tokio::test]
async fn re_registration_upserts_instead_of_duplicating() {
    let (_store, _transport, engine) = harness(Config::default());
    engine
        .on_register_participant("100", Category::GroupA)
        .await
        .unwrap();
    engine
        .on_register_participant("100", Category::GroupB)
        .await
        .unwrap();

    assert_eq!(engine.total_participants().await.unwrap(), 1);
}

#[tokio::test]
async fn broadcast_survives_one_failing_participant() {
    let (_store, transport, engine) = harness_failing(Config::default(), &["2"]);
    for id in ["1", "2", "3"] {
        engine
            .on_register_participant(id, Category::GroupA)
            .await
            .unwrap();
    }

    let delivered = engine.broadcast_text(Category::GroupA, "nudge").await;
    assert_eq!(delivered, 2);

    let recipients: HashSet<_> = transport
        .sent()
        .await
        .iter()
        .filter(|(_, text)| text == "nudge")
        .map(|(id, _)| id.clone())
        .collect();
    assert_eq!(recipients, HashSet::from(["1".to_string(), "3".to_string()]));
}

#[tokio::test]
async fn broadcast_only_reaches_the_target_category() {
    let (_store, transport, engine) = harness(Config::default());
    engine
        .on_register_participant("1", Category::GroupA)
        .await
        .unwrap();
    engine
        .on_register_participant("2", Category::GroupB)
        .await
        .unwrap();

    engine.on_scheduled_tick("groupA:reminder:morning").await;

    let sent = transport.sent().await;
    assert!(sent
        .iter()
        .any(|(id, text)| id == "1" && text.contains("Morning reminder")));
    assert!(!sent
        .iter()
        .any(|(id, text)| id == "2" && text.contains("Morning reminder")));
}

#[tokio::test]
async fn survey_tick_starts_a_flow_per_participant() {
    let (_store, transport, engine) = harness(Config::default());
    for id in ["1", "2"] {
        engine
            .on_register_participant(id, Category::GroupA)
            .await
            .unwrap();
    }

    engine.on_scheduled_tick("groupA:survey").await;

    for id in ["1", "2"] {
        assert!(engine.flow_state(id).await.is_some());
        let got_first_prompt = transport
            .sent()
            .await
            .iter()
            .any(|(to, text)| to == id && text.contains("morning rituals?"));
        assert!(got_first_prompt);
    }
}

#[tokio::test]
async fn malformed_tick_is_ignored() {
    let (_store, transport, engine) = harness(Config::default());
    engine
        .on_register_participant("1", Category::GroupA)
        .await
        .unwrap();
    engine.on_scheduled_tick("bogus").await;
    engine.on_scheduled_tick("groupC:survey").await;
    engine.on_scheduled_tick("groupA:reminder:nonexistent").await;

    // Only the registration welcome went out.
    assert_eq!(transport.sent().await.len(), 1);
}

#[tokio::test]
async fn report_surfaces_weekly_and_monthly_sections_only_when_due() {
    let (store, _transport, engine) = harness(Config::default());
    let ts = Utc
        .with_ymd_and_hms(2024, 3, 30, 12, 0, 0)
        .unwrap()
        .timestamp();
    store
        .append(&ActivityEvent::affirmative("100", ActivityKind::Weekly, ts))
        .await
        .unwrap();

    // 2024-03-31 is both a Sunday and the last day of the month.
    let sunday = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let report = engine.build_report("100", sunday, &Utc).await;
    assert!(report.contains("This week's score: 5"));
    assert!(report.contains("This month's score: 5"));

    let saturday = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
    let report = engine.build_report("100", saturday, &Utc).await;
    assert!(report.contains("Today's score: 5"));
    assert!(!report.contains("This week's score"));
    assert!(!report.contains("This month's score"));
}

#[tokio::test]
async fn report_includes_footer_and_rotating_link() {
    let mut config = Config::default();
    config.report.footer_lines = vec!["Keep at it.".to_string()];
    config.report.links = vec!["https://example.com/a".to_string()];
    let (_store, _transport, engine) = harness(config);

    let today = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap();
    let report = engine.build_report("100", today, &Utc).await;
    assert!(report.contains("Keep at it."));
    assert!(report.contains("Link of the day: https://example.com/a"));
}

#[tokio::test]
async fn trigger_specs_cover_every_plan_survey_and_reminder() {
    let (_store, _transport, engine) = harness(Config::default());
    let names: HashSet<_> = engine
        .trigger_specs()
        .iter()
        .map(|spec| spec.name.clone())
        .collect();
    assert!(names.contains("groupA:survey"));
    assert!(names.contains("groupA:reminder:morning"));
    assert!(names.contains("groupA:reminder:midday"));
    assert!(names.contains("groupA:reminder:evening"));
    assert!(names.contains("groupB:survey"));
    assert!(names.contains("groupB:reminder:setup"));
}

#[tokio::test]
async fn ping_round_trip() {
    let (_store, _transport, engine) = harness(Config::default());
    assert_eq!(engine.ping(), "pong");
    assert!(engine.help_text().contains("ping - health check"));
}
