//! Relative-time phrases ("3 hours ago", "Yesterday").
//!
//! Phrases are looked up by their English text through a [`Localizer`]. Count
//! phrases use a `%d` placeholder and may carry a plural suffix chosen by the
//! localizer, e.g. the key `"%d __minutes ago"` for a locale that marks a
//! plural form with `"__"`.
//!
//! Instants less than 24 hours apart are described in hours, minutes or
//! seconds of elapsed time. Anything further apart is described by comparing
//! local calendar dates in years, months, weeks or days.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::calendar::Calendar;
use crate::error::{PeriodError, Result};

/// Output style of a relative-time phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateAgoFormat {
    /// Compact count and unit letter: "3h", "2w".
    Short,
    /// Like `Long`, but 2 to 7 days back is named by weekday.
    Week,
    #[default]
    Long,
    LongUsingNumericDates,
    LongUsingNumericTimes,
    LongUsingNumericDatesAndTimes,
}

impl DateAgoFormat {
    /// Pick the long format matching the two numeric flags.
    pub fn from_flags(numeric_dates: bool, numeric_times: bool) -> Self {
        match (numeric_dates, numeric_times) {
            (true, true) => Self::LongUsingNumericDatesAndTimes,
            (true, false) => Self::LongUsingNumericDates,
            (false, true) => Self::LongUsingNumericTimes,
            (false, false) => Self::Long,
        }
    }

    fn numeric_dates(self) -> bool {
        matches!(
            self,
            Self::LongUsingNumericDates | Self::LongUsingNumericDatesAndTimes
        )
    }

    fn numeric_times(self) -> bool {
        matches!(
            self,
            Self::LongUsingNumericTimes | Self::LongUsingNumericDatesAndTimes
        )
    }
}

/// Unit a relative-time phrase is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgoUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl AgoUnit {
    fn symbol(self) -> &'static str {
        match self {
            Self::Years => "y",
            Self::Months => "M",
            Self::Weeks => "w",
            Self::Days => "d",
            Self::Hours => "h",
            Self::Minutes => "m",
            Self::Seconds => "s",
        }
    }

    fn plural_noun(self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }

    fn one_ago(self) -> &'static str {
        match self {
            Self::Years => "1 year ago",
            Self::Months => "1 month ago",
            Self::Weeks => "1 week ago",
            Self::Days => "1 day ago",
            Self::Hours => "1 hour ago",
            Self::Minutes => "1 minute ago",
            Self::Seconds => "1 second ago",
        }
    }

    fn named(self) -> &'static str {
        match self {
            Self::Years => "Last year",
            Self::Months => "Last month",
            Self::Weeks => "Last week",
            Self::Days => "Yesterday",
            Self::Hours => "An hour ago",
            Self::Minutes => "A minute ago",
            Self::Seconds => "A second ago",
        }
    }

    fn is_date_unit(self) -> bool {
        matches!(self, Self::Years | Self::Months | Self::Weeks | Self::Days)
    }
}

/// Source of localized phrase templates.
pub trait Localizer {
    /// The template for `key`, or `None` if this locale has no such string.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Suffix inserted before the unit in count keys, selected by `value`.
    fn plural_suffix(&self, _value: i64) -> &str {
        ""
    }
}

const ENGLISH_KEYS: &[&str] = &[
    "%dy",
    "%dM",
    "%dw",
    "%dd",
    "%dh",
    "%dm",
    "%ds",
    "%d years ago",
    "%d months ago",
    "%d weeks ago",
    "%d days ago",
    "%d hours ago",
    "%d minutes ago",
    "%d seconds ago",
    "1 year ago",
    "1 month ago",
    "1 week ago",
    "1 day ago",
    "1 hour ago",
    "1 minute ago",
    "1 second ago",
    "Last year",
    "Last month",
    "Last week",
    "Yesterday",
    "An hour ago",
    "A minute ago",
    "A second ago",
    "Mon",
    "Tue",
    "Wed",
    "Thu",
    "Fri",
    "Sat",
    "Sun",
];

/// English phrases: every known key is its own template.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn lookup(&self, key: &str) -> Option<String> {
        ENGLISH_KEYS.contains(&key).then(|| key.to_string())
    }
}

/// Phrase table loaded from a JSON object of key → template.
#[derive(Debug, Clone, Default)]
pub struct TableLocalizer {
    strings: HashMap<String, String>,
    plural_rule: Option<fn(i64) -> &'static str>,
}

impl TableLocalizer {
    pub fn new(strings: HashMap<String, String>) -> Self {
        Self {
            strings,
            plural_rule: None,
        }
    }

    /// Parse a table such as `{"Yesterday": "Wczoraj", "%d days ago": "%d dni temu"}`.
    ///
    /// # Errors
    /// Returns `PeriodError::Json` if the input is not a flat string map.
    pub fn from_json(json: &str) -> Result<Self> {
        let strings: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(strings))
    }

    /// Use `rule` to select the plural suffix for count keys.
    pub fn with_plural_rule(mut self, rule: fn(i64) -> &'static str) -> Self {
        self.plural_rule = Some(rule);
        self
    }
}

impl Localizer for TableLocalizer {
    fn lookup(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn plural_suffix(&self, value: i64) -> &str {
        self.plural_rule.map_or("", |rule| rule(value))
    }
}

/// Formats the distance between two instants as a localized phrase.
pub struct TimeAgo<'a> {
    calendar: Calendar,
    localizer: &'a dyn Localizer,
}

impl<'a> TimeAgo<'a> {
    pub fn new(calendar: Calendar, localizer: &'a dyn Localizer) -> Self {
        Self {
            calendar,
            localizer,
        }
    }

    /// Describe how far `date` is from `now`. The order of the two instants
    /// does not matter.
    ///
    /// # Errors
    /// Returns `PeriodError::MissingTranslation` if the localizer lacks the
    /// phrase.
    pub fn time_ago(
        &self,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
        format: DateAgoFormat,
    ) -> Result<String> {
        let (unit, value) = self.largest_unit(date, now);
        self.localized_string(date, unit, value, format)
    }

    /// [`TimeAgo::time_ago`] with the long format selected by two flags.
    pub fn time_ago_numeric(
        &self,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
        numeric_dates: bool,
        numeric_times: bool,
    ) -> Result<String> {
        self.time_ago(date, now, DateAgoFormat::from_flags(numeric_dates, numeric_times))
    }

    /// The phrase for `value` units back from the reference point.
    ///
    /// `date` is only read for the weekday name in [`DateAgoFormat::Week`].
    pub fn localized_string(
        &self,
        date: DateTime<Utc>,
        unit: AgoUnit,
        value: i64,
        format: DateAgoFormat,
    ) -> Result<String> {
        if format == DateAgoFormat::Short {
            return self.count_phrase(unit, value, true);
        }

        if value >= 2 {
            if format == DateAgoFormat::Week && unit == AgoUnit::Days && value <= 7 {
                let weekday = date
                    .with_timezone(&self.calendar.timezone())
                    .format("%a")
                    .to_string();
                return self.lookup(&weekday);
            }
            return self.count_phrase(unit, value, false);
        }

        let numeric = if unit.is_date_unit() {
            format.numeric_dates()
        } else {
            format.numeric_times()
        };
        if numeric {
            self.lookup(unit.one_ago())
        } else {
            self.lookup(unit.named())
        }
    }

    fn count_phrase(&self, unit: AgoUnit, value: i64, short: bool) -> Result<String> {
        let suffix = self.localizer.plural_suffix(value);
        let key = if short {
            format!("%d{suffix}{}", unit.symbol())
        } else {
            format!("%d {suffix}{} ago", unit.plural_noun())
        };
        let template = self.lookup(&key)?;
        Ok(template.replace("%d", &value.to_string()))
    }

    fn lookup(&self, key: &str) -> Result<String> {
        self.localizer.lookup(key).ok_or_else(|| {
            log::warn!("no localized string for {key:?}");
            PeriodError::MissingTranslation(key.to_string())
        })
    }

    fn largest_unit(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> (AgoUnit, i64) {
        let (earliest, latest) = if date <= now { (date, now) } else { (now, date) };
        let elapsed = latest - earliest;

        if elapsed.num_hours() < 24 {
            return if elapsed.num_hours() >= 1 {
                (AgoUnit::Hours, elapsed.num_hours())
            } else if elapsed.num_minutes() >= 1 {
                (AgoUnit::Minutes, elapsed.num_minutes())
            } else {
                (AgoUnit::Seconds, elapsed.num_seconds())
            };
        }

        let span = DateSpan::between(
            self.calendar.local_date(earliest),
            self.calendar.local_date(latest),
        );
        if span.years >= 1 {
            (AgoUnit::Years, span.years)
        } else if span.months >= 1 {
            (AgoUnit::Months, span.months)
        } else if span.weeks >= 1 {
            (AgoUnit::Weeks, span.weeks)
        } else {
            (AgoUnit::Days, span.days)
        }
    }
}

/// Calendar distance between two dates, decomposed largest unit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateSpan {
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
}

impl DateSpan {
    /// Requires `from <= to`.
    fn between(from: NaiveDate, to: NaiveDate) -> Self {
        let step = |months: i64| {
            u32::try_from(months)
                .ok()
                .and_then(|m| from.checked_add_months(Months::new(m)))
        };

        let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
            - i64::from(from.month());
        while months > 0 && step(months).is_none_or(|anchor| anchor > to) {
            months -= 1;
        }
        let anchor = step(months).unwrap_or(from);
        let days = (to - anchor).num_days();

        Self {
            years: months / 12,
            months: months % 12,
            weeks: days / 7,
            days: days % 7,
        }
    }
}
