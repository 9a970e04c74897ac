//! Calendar context: a timezone in which wall-clock components are read and
//! calendar units are added.
//!
//! All rollover rules come from `chrono`; this module only picks the right
//! primitive for each unit. Year, month, week and day steps move the local
//! wall time, so "one day later" across a DST change keeps the clock time.
//! Hour, minute and second steps are exact elapsed durations.

use std::fmt;

use chrono::{
    DateTime, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};

/// Calendar units accepted by [`Calendar::add`] and [`Calendar::subtract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

/// Timezone-aware calendar used for date-component calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Calendar {
    timezone: Tz,
}

impl Calendar {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Build a calendar from an IANA timezone name (e.g. "Europe/Warsaw").
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidTimezone` if the name is unknown.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| PeriodError::InvalidTimezone(name.to_string()))
    }

    /// The process calendar: the zone named by `TZ`, then the system zone
    /// (e.g. `/etc/localtime`), then UTC.
    pub fn current() -> Self {
        if let Ok(raw) = std::env::var("TZ") {
            match Self::from_name(raw.trim_start_matches(':')) {
                Ok(calendar) => return calendar,
                Err(_) => log::debug!("TZ={raw:?} is not an IANA zone, ignoring it"),
            }
        }
        Self::system().unwrap_or_else(|| {
            log::debug!("no system timezone found, falling back to UTC");
            Self::utc()
        })
    }

    /// The zone configured for the host, if it can be read and is known.
    pub fn system() -> Option<Self> {
        let name = iana_time_zone::get_timezone()
            .map_err(|e| log::debug!("cannot read system timezone: {e}"))
            .ok()?;
        Self::from_name(&name)
            .map_err(|_| log::debug!("system timezone {name:?} is not an IANA zone"))
            .ok()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// The local calendar date of `instant` in this calendar's zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Build an instant from wall-clock components in this calendar's zone.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidDate` for out-of-range components or a
    /// local time skipped by a DST transition.
    pub fn date_with(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<DateTime<Utc>> {
        self.timezone
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                PeriodError::InvalidDate(format!(
                    "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02} in {}",
                    self.timezone.name()
                ))
            })
    }

    /// Add `amount` of `unit` to `instant`. Negative amounts move backwards.
    ///
    /// # Errors
    /// Returns `PeriodError::OutOfRange` if the result is not representable.
    pub fn add(
        &self,
        instant: DateTime<Utc>,
        amount: i64,
        unit: CalendarUnit,
    ) -> Result<DateTime<Utc>> {
        let out_of_range = || PeriodError::OutOfRange(format!("{instant} + {amount} {unit:?}"));

        let exact = |delta: Option<Duration>| {
            delta
                .and_then(|d| instant.checked_add_signed(d))
                .ok_or_else(out_of_range)
        };

        match unit {
            CalendarUnit::Seconds => exact(Duration::try_seconds(amount)),
            CalendarUnit::Minutes => exact(Duration::try_minutes(amount)),
            CalendarUnit::Hours => exact(Duration::try_hours(amount)),
            CalendarUnit::Days | CalendarUnit::Weeks => {
                let days = match unit {
                    CalendarUnit::Weeks => amount.checked_mul(7).ok_or_else(out_of_range)?,
                    _ => amount,
                };
                let local = self.naive_local(instant);
                let magnitude = Days::new(days.unsigned_abs());
                let moved = if days >= 0 {
                    local.checked_add_days(magnitude)
                } else {
                    local.checked_sub_days(magnitude)
                };
                self.resolve_local(moved.ok_or_else(out_of_range)?)
                    .ok_or_else(out_of_range)
            }
            CalendarUnit::Months | CalendarUnit::Years => {
                let months = match unit {
                    CalendarUnit::Years => amount.checked_mul(12).ok_or_else(out_of_range)?,
                    _ => amount,
                };
                let magnitude = u32::try_from(months.unsigned_abs())
                    .map(Months::new)
                    .map_err(|_| out_of_range())?;
                let local = self.naive_local(instant);
                let moved = if months >= 0 {
                    local.checked_add_months(magnitude)
                } else {
                    local.checked_sub_months(magnitude)
                };
                self.resolve_local(moved.ok_or_else(out_of_range)?)
                    .ok_or_else(out_of_range)
            }
        }
    }

    /// Subtract `amount` of `unit` from `instant`.
    pub fn subtract(
        &self,
        instant: DateTime<Utc>,
        amount: i64,
        unit: CalendarUnit,
    ) -> Result<DateTime<Utc>> {
        let negated = amount.checked_neg().ok_or_else(|| {
            PeriodError::OutOfRange(format!("{instant} - {amount} {unit:?}"))
        })?;
        self.add(instant, negated, unit)
    }

    fn naive_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.timezone).naive_local()
    }

    /// Map a wall-clock time back to an instant. Times inside a DST gap are
    /// shifted forward by one hour.
    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let resolved = match self.timezone.from_local_datetime(&local) {
            LocalResult::None => {
                let shifted = local.checked_add_signed(Duration::hours(1))?;
                self.timezone.from_local_datetime(&shifted).earliest()
            }
            other => other.earliest(),
        };
        resolved.map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.timezone.name())
    }
}

impl TryFrom<String> for Calendar {
    type Error = PeriodError;

    fn try_from(name: String) -> Result<Self> {
        Self::from_name(&name)
    }
}

impl From<Calendar> for String {
    fn from(calendar: Calendar) -> Self {
        calendar.timezone.name().to_string()
    }
}

/// Hours elapsed from `earlier` to `later` (negative when reversed).
pub fn hours_from(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    seconds_from(later, earlier) / 3600.0
}

/// Minutes elapsed from `earlier` to `later`.
pub fn minutes_from(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    seconds_from(later, earlier) / 60.0
}

/// Seconds elapsed from `earlier` to `later`, with millisecond precision.
pub fn seconds_from(later: DateTime<Utc>, earlier: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}
