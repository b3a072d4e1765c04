//! Point weights per ritual tier.

use serde::{Deserialize, Serialize};

use crate::model::ActivityKind;

/// Tier point values. The three daily tiers share one weight; `Unknown`
/// never scores. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_daily")]
    pub daily: i64,
    #[serde(default = "default_weekly")]
    pub weekly: i64,
    #[serde(default = "default_monthly")]
    pub monthly: i64,
    #[serde(default = "default_exceptional")]
    pub exceptional: i64,
}

fn default_daily() -> i64 {
    1
}
fn default_weekly() -> i64 {
    5
}
fn default_monthly() -> i64 {
    15
}
fn default_exceptional() -> i64 {
    50
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            daily: default_daily(),
            weekly: default_weekly(),
            monthly: default_monthly(),
            exceptional: default_exceptional(),
        }
    }
}

impl ScoreWeights {
    pub fn weight_for(&self, kind: ActivityKind) -> i64 {
        match kind {
            ActivityKind::Morning | ActivityKind::Midday | ActivityKind::Evening => self.daily,
            ActivityKind::Weekly => self.weekly,
            ActivityKind::Monthly => self.monthly,
            ActivityKind::Exceptional => self.exceptional,
            ActivityKind::Unknown => 0,
        }
    }
}
