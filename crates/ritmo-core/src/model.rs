//! Domain model: participants, activity events, and answers.
//!
//! Activity kinds carry a stable integer tag for storage; anything
//! unrecognized on read maps to `Unknown` and never scores.

use serde::{Deserialize, Serialize};

/// Marker stored in an event's `value` field for an affirmative answer.
pub const AFFIRMATIVE: &str = "1";

/// Marker stored for a negative answer, when negative answers are recorded
/// at all (see `SurveyConfig::record_negative_answers`).
pub const NEGATIVE: &str = "0";

/// Participant category. Decides which flow plan and schedule apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    GroupA,
    GroupB,
}

impl Category {
    pub fn tag(&self) -> &'static str {
        match self {
            Category::GroupA => "groupA",
            Category::GroupB => "groupB",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "groupA" => Some(Category::GroupA),
            "groupB" => Some(Category::GroupB),
            _ => None,
        }
    }
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub category: Category,
    /// Unix timestamp, set once at registration.
    pub registered_at: i64,
}

/// Ritual tier an activity event belongs to.
///
/// The integer tags are the storage representation and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Unknown,
    Morning,
    Midday,
    Evening,
    Weekly,
    Monthly,
    Exceptional,
}

impl ActivityKind {
    pub fn as_i64(&self) -> i64 {
        match self {
            ActivityKind::Unknown => 0,
            ActivityKind::Morning => 1,
            ActivityKind::Midday => 2,
            ActivityKind::Evening => 3,
            ActivityKind::Weekly => 4,
            ActivityKind::Monthly => 5,
            ActivityKind::Exceptional => 6,
        }
    }

    /// Maps a stored tag back to a kind. Anything unrecognized becomes
    /// `Unknown`, which is excluded from every weighted sum.
    pub fn from_i64(raw: i64) -> Self {
        match raw {
            1 => ActivityKind::Morning,
            2 => ActivityKind::Midday,
            3 => ActivityKind::Evening,
            4 => ActivityKind::Weekly,
            5 => ActivityKind::Monthly,
            6 => ActivityKind::Exceptional,
            _ => ActivityKind::Unknown,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ActivityKind::Unknown => "unknown",
            ActivityKind::Morning => "morning",
            ActivityKind::Midday => "midday",
            ActivityKind::Evening => "evening",
            ActivityKind::Weekly => "weekly",
            ActivityKind::Monthly => "monthly",
            ActivityKind::Exceptional => "exceptional",
        }
    }
}

/// One recorded answer. Immutable once written; the ledger only appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub participant_id: String,
    pub kind: ActivityKind,
    /// String-encoded boolean-like payload; only `"1"` counts toward score.
    pub value: String,
    /// Unix timestamp of when the event was recorded.
    pub timestamp: i64,
}

impl ActivityEvent {
    pub fn affirmative(participant_id: impl Into<String>, kind: ActivityKind, timestamp: i64) -> Self {
        Self {
            participant_id: participant_id.into(),
            kind,
            value: AFFIRMATIVE.to_string(),
            timestamp,
        }
    }

    pub fn negative(participant_id: impl Into<String>, kind: ActivityKind, timestamp: i64) -> Self {
        Self {
            participant_id: participant_id.into(),
            kind,
            value: NEGATIVE.to_string(),
            timestamp,
        }
    }

    pub fn is_affirmative(&self) -> bool {
        self.value == AFFIRMATIVE
    }
}

/// A yes/no response to a ritual prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn from_str_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(Answer::Yes),
            "no" | "n" => Some(Answer::No),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_storage_tags_round_trip() {
        for kind in [
            ActivityKind::Morning,
            ActivityKind::Midday,
            ActivityKind::Evening,
            ActivityKind::Weekly,
            ActivityKind::Monthly,
            ActivityKind::Exceptional,
        ] {
            assert_eq!(ActivityKind::from_i64(kind.as_i64()), kind);
        }
    }

    #[test]
    fn unrecognized_kind_maps_to_unknown() {
        assert_eq!(ActivityKind::from_i64(0), ActivityKind::Unknown);
        assert_eq!(ActivityKind::from_i64(99), ActivityKind::Unknown);
        assert_eq!(ActivityKind::from_i64(-7), ActivityKind::Unknown);
    }

    #[test]
    fn category_tags_round_trip() {
        assert_eq!(Category::from_tag("groupA"), Some(Category::GroupA));
        assert_eq!(Category::from_tag("groupB"), Some(Category::GroupB));
        assert_eq!(Category::from_tag("groupC"), None);
    }

    #[test]
    fn only_affirmative_marker_counts() {
        let yes = ActivityEvent::affirmative("42", ActivityKind::Morning, 1000);
        let no = ActivityEvent::negative("42", ActivityKind::Morning, 1000);
        assert!(yes.is_affirmative());
        assert!(!no.is_affirmative());
    }

    #[test]
    fn answer_parses_loosely() {
        assert_eq!(Answer::from_str_loose("YES"), Some(Answer::Yes));
        assert_eq!(Answer::from_str_loose(" n "), Some(Answer::No));
        assert_eq!(Answer::from_str_loose("maybe"), None);
    }
}
