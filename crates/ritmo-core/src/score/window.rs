//! Calendar window math for score aggregation.
//!
//! Windows are inclusive `[from, to]` Unix-second ranges computed in the
//! caller's time zone: a day runs midnight to next-midnight-minus-one-second,
//! a week runs Monday 00:00:00 through Sunday 23:59:59, a month runs from the
//! first of the month to the last second before the next first.

use chrono::{DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Weekday};

/// Local midnight of `date`. A DST-skipped midnight resolves to the earliest
/// valid instant; an ambiguous one to its first occurrence.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

/// `[start of day, end of day]` in Unix seconds.
pub fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (i64, i64) {
    let start = start_of_day(date, tz).timestamp();
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    let end = start_of_day(next, tz).timestamp() - 1;
    (start, end)
}

/// `[Monday 00:00:00, Sunday 23:59:59]` of the week containing `date`.
pub fn week_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (i64, i64) {
    let monday = date.week(Weekday::Mon).first_day();
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
    (start_of_day(monday, tz).timestamp(), day_window(sunday, tz).1)
}

/// `[first of month 00:00:00, last of month 23:59:59]`.
pub fn month_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (i64, i64) {
    let first = date.with_day(1).unwrap_or(date);
    let next_first = first.checked_add_months(Months::new(1)).unwrap_or(first);
    (
        start_of_day(first, tz).timestamp(),
        start_of_day(next_first, tz).timestamp() - 1,
    )
}

/// Whether `date` is the last calendar day of its month. Gates the monthly
/// summary in reports.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    match date.checked_add_days(Days::new(1)) {
        Some(next) => next.month() != date.month(),
        None => true,
    }
}

/// `date` shifted `back` days into the past.
pub fn offset_days(date: NaiveDate, back: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(back as u64)).unwrap_or(date)
}

/// `date` shifted `back` calendar months into the past, clamping the day of
/// month when the target month is shorter.
pub fn offset_months(date: NaiveDate, back: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(back)).unwrap_or(date)
}
