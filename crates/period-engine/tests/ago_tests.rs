//! Tests for relative-time phrases.
//!
//! The reference point is Sunday 2026-03-15 12:00 UTC throughout.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use period_engine::ago::AgoUnit;
use period_engine::{
    Calendar, DateAgoFormat, EnglishLocalizer, PeriodError, TableLocalizer, TimeAgo,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

fn date(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn english(date: DateTime<Utc>, format: DateAgoFormat) -> String {
    TimeAgo::new(Calendar::utc(), &EnglishLocalizer)
        .time_ago(date, now(), format)
        .unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Under 24 hours
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hours_minutes_seconds() {
    assert_eq!(english(now() - Duration::hours(3), DateAgoFormat::Long), "3 hours ago");
    assert_eq!(
        english(now() - Duration::minutes(45), DateAgoFormat::Long),
        "45 minutes ago"
    );
    assert_eq!(
        english(now() - Duration::seconds(30), DateAgoFormat::Long),
        "30 seconds ago"
    );
    assert_eq!(
        english(now() - Duration::minutes(23 * 60 + 59), DateAgoFormat::Long),
        "23 hours ago"
    );
}

#[test]
fn single_time_units_use_named_phrases() {
    assert_eq!(english(now() - Duration::hours(1), DateAgoFormat::Long), "An hour ago");
    assert_eq!(english(now() - Duration::minutes(1), DateAgoFormat::Long), "A minute ago");
    assert_eq!(english(now() - Duration::seconds(1), DateAgoFormat::Long), "A second ago");
}

#[test]
fn numeric_times_flag_controls_time_units() {
    let ago = TimeAgo::new(Calendar::utc(), &EnglishLocalizer);
    let hour_ago = now() - Duration::hours(1);

    assert_eq!(ago.time_ago_numeric(hour_ago, now(), false, true).unwrap(), "1 hour ago");
    assert_eq!(ago.time_ago_numeric(hour_ago, now(), true, true).unwrap(), "1 hour ago");
    assert_eq!(ago.time_ago_numeric(hour_ago, now(), true, false).unwrap(), "An hour ago");
}

#[test]
fn short_format() {
    assert_eq!(english(now() - Duration::hours(3), DateAgoFormat::Short), "3h");
    assert_eq!(english(now() - Duration::minutes(1), DateAgoFormat::Short), "1m");
    assert_eq!(english(now(), DateAgoFormat::Short), "0s");
    assert_eq!(english(date(2025, 12, 15, 12), DateAgoFormat::Short), "3M");
}

#[test]
fn future_dates_measure_the_same_distance() {
    assert_eq!(english(now() + Duration::hours(3), DateAgoFormat::Long), "3 hours ago");
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar units
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn yesterday_and_days() {
    assert_eq!(english(date(2026, 3, 14, 10), DateAgoFormat::Long), "Yesterday");
    assert_eq!(
        english(date(2026, 3, 14, 10), DateAgoFormat::LongUsingNumericDates),
        "1 day ago"
    );
    assert_eq!(english(date(2026, 3, 12, 12), DateAgoFormat::Long), "3 days ago");
}

#[test]
fn week_format_names_recent_weekdays() {
    // 2026-03-12 is a Thursday.
    assert_eq!(english(date(2026, 3, 12, 12), DateAgoFormat::Week), "Thu");
    // Eight days back rolls over into weeks.
    assert_eq!(english(date(2026, 3, 7, 12), DateAgoFormat::Week), "Last week");
}

#[test]
fn weeks_months_years() {
    assert_eq!(english(date(2026, 2, 28, 12), DateAgoFormat::Long), "2 weeks ago");
    assert_eq!(english(date(2026, 2, 10, 12), DateAgoFormat::Long), "Last month");
    assert_eq!(english(date(2025, 12, 15, 12), DateAgoFormat::Long), "3 months ago");
    assert_eq!(english(date(2025, 1, 1, 12), DateAgoFormat::Long), "Last year");
    assert_eq!(
        english(date(2025, 1, 1, 12), DateAgoFormat::LongUsingNumericDates),
        "1 year ago"
    );
    assert_eq!(english(date(2023, 3, 15, 12), DateAgoFormat::Long), "3 years ago");
}

#[test]
fn calendar_dates_are_read_in_the_calendar_zone() {
    // 2026-03-13 16:00 UTC is two UTC dates back, but in Tokyo it is
    // 2026-03-14 01:00 against a local "now" of 2026-03-15 21:00.
    let then = date(2026, 3, 13, 16);
    assert_eq!(english(then, DateAgoFormat::Long), "2 days ago");

    let tokyo = Calendar::from_name("Asia/Tokyo").unwrap();
    let ago = TimeAgo::new(tokyo, &EnglishLocalizer);
    assert_eq!(
        ago.time_ago(then, now(), DateAgoFormat::Long).unwrap(),
        "Yesterday"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Localizers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_translation_is_reported() {
    let table = TableLocalizer::new(HashMap::from([(
        "Yesterday".to_string(),
        "Wczoraj".to_string(),
    )]));
    let ago = TimeAgo::new(Calendar::utc(), &table);

    assert_eq!(
        ago.time_ago(date(2026, 3, 14, 10), now(), DateAgoFormat::Long)
            .unwrap(),
        "Wczoraj"
    );

    let err = ago
        .time_ago(now() - Duration::hours(3), now(), DateAgoFormat::Long)
        .unwrap_err();
    assert!(matches!(err, PeriodError::MissingTranslation(ref key) if key == "%d hours ago"));
}

#[test]
fn table_localizer_applies_plural_rule() {
    fn few(value: i64) -> &'static str {
        if (2..=4).contains(&(value % 10)) {
            "_"
        } else {
            ""
        }
    }

    let table = TableLocalizer::from_json(
        r#"{"%d _days ago": "%d dni temu", "%d days ago": "%d dni temu (many)"}"#,
    )
    .unwrap()
    .with_plural_rule(few);
    let ago = TimeAgo::new(Calendar::utc(), &table);

    assert_eq!(
        ago.localized_string(now(), AgoUnit::Days, 3, DateAgoFormat::Long)
            .unwrap(),
        "3 dni temu"
    );
    assert_eq!(
        ago.localized_string(now(), AgoUnit::Days, 6, DateAgoFormat::Long)
            .unwrap(),
        "6 dni temu (many)"
    );
}

#[test]
fn table_localizer_rejects_non_string_values() {
    let err = TableLocalizer::from_json(r#"{"Yesterday": 1}"#).unwrap_err();
    assert!(matches!(err, PeriodError::Json(_)));
}

#[test]
fn english_localizer_knows_only_its_keys() {
    use period_engine::Localizer;
    assert_eq!(EnglishLocalizer.lookup("Yesterday").as_deref(), Some("Yesterday"));
    assert_eq!(EnglishLocalizer.lookup("Vorgestern"), None);
}
