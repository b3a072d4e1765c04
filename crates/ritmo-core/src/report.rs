//! Report formatting. Pure functions, no I/O.
//!
//! Renders a score and one or more progress series into the textual segments
//! delivered on flow completion: the current-window score, the daily series,
//! weekly/monthly summaries gated by calendar position, configured footer
//! lines, and the rotating link of the day.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::score::window::is_last_day_of_month;
use crate::store::ReportConfig;

/// A score plus its progress series, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub score: i64,
    pub series: Vec<i64>,
}

/// `prefix` + `v1 - v2 - ... - vn` + `suffix`.
pub fn format_sequence(prefix: &str, items: &[i64], suffix: &str) -> String {
    let joined = items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" - ");
    format!("{prefix}{joined}{suffix}")
}

/// The weekly summary is only surfaced on Sundays.
pub fn weekly_summary_due(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// The monthly summary is only surfaced on the last calendar day of the
/// month.
pub fn monthly_summary_due(date: NaiveDate) -> bool {
    is_last_day_of_month(date)
}

/// Content link for `date`, rotated by day of year. Deterministic, no RNG.
pub fn link_of_the_day(links: &[String], date: NaiveDate) -> Option<&str> {
    if links.is_empty() {
        return None;
    }
    let index = (date.ordinal0() as usize) % links.len();
    Some(&links[index])
}

/// Assemble the completion report. Gating is the caller's job: `weekly` and
/// `monthly` are rendered whenever present.
pub fn render_report(
    today: NaiveDate,
    daily: &ReportSummary,
    weekly: Option<&ReportSummary>,
    monthly: Option<&ReportSummary>,
    config: &ReportConfig,
) -> String {
    let suffix = &config.suffix;
    let mut message = format!("Today's score: {}{suffix}", daily.score);
    message.push('\n');
    message.push_str(&format_sequence(
        "Daily progress (most recent first): ",
        &daily.series,
        suffix,
    ));

    if let Some(weekly) = weekly {
        message.push_str(&format!("\n\nThis week's score: {}{suffix}\n", weekly.score));
        message.push_str(&format_sequence(
            "Weekly progress (most recent first): ",
            &weekly.series,
            suffix,
        ));
    }

    if let Some(monthly) = monthly {
        message.push_str(&format!(
            "\n\nThis month's score: {}{suffix}\n",
            monthly.score
        ));
        message.push_str(&format_sequence(
            "Monthly progress (most recent first): ",
            &monthly.series,
            suffix,
        ));
    }

    for line in &config.footer_lines {
        message.push_str("\n\n");
        message.push_str(line);
    }

    if let Some(link) = link_of_the_day(&config.links, today) {
        message.push_str(&format!("\n\nLink of the day: {link}"));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sequence_joins_with_separator_and_suffix() {
        assert_eq!(
            format_sequence("Daily: ", &[3, 0, 0, 5], " pts"),
            "Daily: 3 - 0 - 0 - 5 pts"
        );
        assert_eq!(format_sequence("Daily: ", &[7], " pts"), "Daily: 7 pts");
    }

    #[test]
    fn weekly_summary_gates_on_sunday() {
        assert!(weekly_summary_due(date(2024, 3, 31)));
        assert!(!weekly_summary_due(date(2024, 3, 30)));
    }

    #[test]
    fn monthly_summary_gates_on_last_day_of_month() {
        assert!(monthly_summary_due(date(2024, 3, 31)));
        assert!(!monthly_summary_due(date(2024, 3, 30)));
    }

    #[test]
    fn link_rotates_by_day_of_year() {
        let links = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        // Jan 1 has ordinal0 == 0.
        assert_eq!(link_of_the_day(&links, date(2024, 1, 1)), Some("a"));
        assert_eq!(link_of_the_day(&links, date(2024, 1, 2)), Some("b"));
        assert_eq!(link_of_the_day(&links, date(2024, 1, 4)), Some("a"));
        assert_eq!(link_of_the_day(&[], date(2024, 1, 1)), None);
    }

    #[test]
    fn report_without_summaries_has_only_daily_lines() {
        let report = render_report(
            date(2024, 3, 27),
            &ReportSummary {
                score: 3,
                series: vec![3, 0, 0, 5],
            },
            None,
            None,
            &ReportConfig::default(),
        );
        assert_eq!(
            report,
            "Today's score: 3 pts\nDaily progress (most recent first): 3 - 0 - 0 - 5 pts"
        );
    }

    #[test]
    fn report_renders_optional_sections_in_order() {
        let config = ReportConfig {
            footer_lines: vec!["Keep going.".to_string()],
            links: vec!["https://example.com/1".to_string()],
            ..ReportConfig::default()
        };
        let report = render_report(
            date(2024, 3, 31),
            &ReportSummary {
                score: 3,
                series: vec![3],
            },
            Some(&ReportSummary {
                score: 12,
                series: vec![12, 7],
            }),
            Some(&ReportSummary {
                score: 40,
                series: vec![40],
            }),
            &config,
        );

        let weekly_at = report.find("This week's score: 12 pts").unwrap();
        let monthly_at = report.find("This month's score: 40 pts").unwrap();
        let footer_at = report.find("Keep going.").unwrap();
        let link_at = report.find("Link of the day: https://example.com/1").unwrap();
        assert!(weekly_at < monthly_at);
        assert!(monthly_at < footer_at);
        assert!(footer_at < link_at);
        assert!(report.contains("Weekly progress (most recent first): 12 - 7 pts"));
    }
}
