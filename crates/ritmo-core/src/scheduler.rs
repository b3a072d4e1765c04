//! Wall-clock trigger scheduling.
//!
//! Each named trigger fires at a configured time of day on matching days of
//! week. Triggers run independently, fire-and-forget; a firing missed while
//! the process is down is not replayed. Next-occurrence computation is a
//! pure function of (spec, now) so it is testable with fixed instants.

use chrono::{DateTime, Datelike, Days, Local, LocalResult, NaiveTime, TimeZone, Weekday};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A named wall-clock trigger. An empty `weekdays` list means every day.
#[derive(Debug, Clone)]
pub struct TriggerSpec {
    pub name: String,
    pub time: NaiveTime,
    pub weekdays: Vec<Weekday>,
}

impl TriggerSpec {
    pub fn daily(name: impl Into<String>, time: NaiveTime) -> Self {
        Self {
            name: name.into(),
            time,
            weekdays: Vec::new(),
        }
    }

    fn matches(&self, weekday: Weekday) -> bool {
        self.weekdays.is_empty() || self.weekdays.contains(&weekday)
    }
}

fn resolve_local<Tz: TimeZone>(naive: chrono::NaiveDateTime, tz: &Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

/// First instant strictly after `now` at which `spec` fires.
pub fn next_occurrence<Tz: TimeZone>(spec: &TriggerSpec, now: &DateTime<Tz>) -> DateTime<Tz> {
    let mut date = now.date_naive();
    // The weekday filter repeats within 7 days; 8 covers today's time
    // already having passed.
    for _ in 0..8 {
        let candidate = resolve_local(date.and_time(spec.time), &now.timezone());
        if candidate > *now && spec.matches(date.weekday()) {
            return candidate;
        }
        date = date.checked_add_days(Days::new(1)).unwrap_or(date);
    }
    resolve_local(date.and_time(spec.time), &now.timezone())
}

/// Runs one sleep loop per trigger, sending the trigger name on `tx` at each
/// firing. Loops exit when the receiving side is dropped.
pub struct Scheduler {
    specs: Vec<TriggerSpec>,
}

impl Scheduler {
    pub fn new(specs: Vec<TriggerSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[TriggerSpec] {
        &self.specs
    }

    pub fn start(self, tx: mpsc::Sender<String>) {
        for spec in self.specs {
            let tx = tx.clone();
            tokio::spawn(async move {
                loop {
                    let now = Local::now();
                    let next = next_occurrence(&spec, &now);
                    let wait = match (next.clone() - now).to_std() {
                        Ok(wait) => wait,
                        Err(e) => {
                            warn!(trigger = %spec.name, error = %e, "trigger wait underflowed, stopping");
                            break;
                        }
                    };
                    tokio::time::sleep(wait).await;
                    info!(trigger = %spec.name, "scheduled trigger fired");
                    if tx.send(spec.name.clone()).await.is_err() {
                        break;
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn fires_later_today_when_time_is_still_ahead() {
        let spec = TriggerSpec::daily("survey", hm(22, 0));
        let next = next_occurrence(&spec, &at(2024, 3, 27, 9, 0));
        assert_eq!(next, at(2024, 3, 27, 22, 0));
    }

    #[test]
    fn rolls_to_tomorrow_when_time_has_passed() {
        let spec = TriggerSpec::daily("reminder", hm(8, 0));
        let next = next_occurrence(&spec, &at(2024, 3, 27, 9, 0));
        assert_eq!(next, at(2024, 3, 28, 8, 0));
    }

    #[test]
    fn exact_trigger_instant_rolls_forward() {
        let spec = TriggerSpec::daily("reminder", hm(9, 0));
        let next = next_occurrence(&spec, &at(2024, 3, 27, 9, 0));
        assert_eq!(next, at(2024, 3, 28, 9, 0));
    }

    #[test]
    fn weekday_filter_skips_to_matching_day() {
        // 2024-03-27 is a Wednesday; the next Sunday is the 31st.
        let spec = TriggerSpec {
            name: "weekly".into(),
            time: hm(10, 0),
            weekdays: vec![Weekday::Sun],
        };
        let next = next_occurrence(&spec, &at(2024, 3, 27, 9, 0));
        assert_eq!(next, at(2024, 3, 31, 10, 0));
    }

    #[test]
    fn matching_weekday_but_passed_time_finds_next_week() {
        let spec = TriggerSpec {
            name: "weekly".into(),
            time: hm(8, 0),
            weekdays: vec![Weekday::Wed],
        };
        let next = next_occurrence(&spec, &at(2024, 3, 27, 9, 0));
        assert_eq!(next, at(2024, 4, 3, 8, 0));
    }
}
