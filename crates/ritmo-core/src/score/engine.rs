//! Windowed score aggregation and progress series.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::series::trim_trailing_zeros;
use super::weights::ScoreWeights;
use super::window;
use crate::store::{ActivityLedger, ParticipantRegistry};

/// Unit of a progress series: one entry per day, 7-day week, or calendar
/// month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// Computes weighted scores over ledger windows.
///
/// A storage-read failure degrades to an empty result set -- a score of 0
/// for that window -- rather than propagating to the participant.
pub struct ScoreEngine {
    ledger: Arc<dyn ActivityLedger>,
    weights: ScoreWeights,
}

impl ScoreEngine {
    pub fn new(ledger: Arc<dyn ActivityLedger>, weights: ScoreWeights) -> Self {
        Self { ledger, weights }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Total engagement score in `[from_ts, to_ts]`: the sum of tier weights
    /// over affirmative events. Unknown kinds weigh 0 and so never count.
    pub async fn score_in_window(&self, participant_id: &str, from_ts: i64, to_ts: i64) -> i64 {
        let events = match self.ledger.query(participant_id, from_ts, to_ts).await {
            Ok(events) => events,
            Err(e) => {
                warn!(participant_id, error = %e, "ledger read failed, scoring window as 0");
                return 0;
            }
        };

        events
            .iter()
            .filter(|event| event.is_affirmative())
            .map(|event| self.weights.weight_for(event.kind))
            .sum()
    }

    fn window_at<Tz: TimeZone>(
        granularity: Granularity,
        today: NaiveDate,
        back: u32,
        tz: &Tz,
    ) -> (i64, i64) {
        match granularity {
            Granularity::Day => window::day_window(window::offset_days(today, back), tz),
            Granularity::Week => window::week_window(window::offset_days(today, 7 * back), tz),
            Granularity::Month => window::month_window(window::offset_months(today, back), tz),
        }
    }

    /// Score series, most recent first, one entry per granularity unit going
    /// back from `today`, trailing-zero trimmed.
    pub async fn progress_series<Tz>(
        &self,
        participant_id: &str,
        granularity: Granularity,
        item_count: usize,
        today: NaiveDate,
        tz: &Tz,
    ) -> Vec<i64>
    where
        Tz: TimeZone + Sync,
    {
        let mut result = Vec::with_capacity(item_count);
        for back in 0..item_count {
            let (from_ts, to_ts) = Self::window_at(granularity, today, back as u32, tz);
            result.push(self.score_in_window(participant_id, from_ts, to_ts).await);
        }
        trim_trailing_zeros(&result)
    }

    /// Active-participant series: for each window going back from `today`,
    /// the count of participants with at least one ledger event in it.
    ///
    /// Participants whose id fails the transport's numeric parse are
    /// skipped; a registry load failure aborts this computation only and
    /// yields an empty series.
    pub async fn active_participant_series<Tz>(
        &self,
        registry: &dyn ParticipantRegistry,
        granularity: Granularity,
        item_count: usize,
        today: NaiveDate,
        tz: &Tz,
    ) -> Vec<i64>
    where
        Tz: TimeZone + Sync,
    {
        let participants = match registry.list_all().await {
            Ok(participants) => participants,
            Err(e) => {
                warn!(error = %e, "registry load failed, skipping active-participant series");
                return Vec::new();
            }
        };

        let mut result = Vec::with_capacity(item_count);
        for back in 0..item_count {
            let (from_ts, to_ts) = Self::window_at(granularity, today, back as u32, tz);

            let mut active = 0;
            for participant in &participants {
                if participant.id.parse::<i64>().is_err() {
                    continue;
                }
                let events = match self.ledger.query(&participant.id, from_ts, to_ts).await {
                    Ok(events) => events,
                    Err(e) => {
                        warn!(participant_id = %participant.id, error = %e, "ledger read failed during active count");
                        continue;
                    }
                };
                if !events.is_empty() {
                    active += 1;
                }
            }
            result.push(active);
        }
        trim_trailing_zeros(&result)
    }
}
