//! A single time period: a closed interval `[start, end]` over UTC instants.
//!
//! Relations between periods are pure predicates. `intersects` treats both
//! periods as closed, so periods that only touch at a boundary intersect;
//! `overlaps_with` requires more than a single shared instant, so touching
//! periods do not overlap.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};

/// Boundary semantics for [`TimePeriod::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Endpoints are excluded.
    Open,
    /// Endpoints are included.
    #[default]
    Closed,
}

/// Fixed point of a period when it is lengthened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodAnchor {
    Start,
    Center,
    End,
}

/// Position of a period relative to another one.
///
/// Read as "`self` is `<relation>` the other period": `After` means `self`
/// begins after the other ends, `Inside` means `self` lies strictly within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodRelation {
    After,
    StartTouching,
    StartInside,
    InsideStartTouching,
    EnclosingStartTouching,
    Enclosing,
    EnclosingEndTouching,
    ExactMatch,
    Inside,
    InsideEndTouching,
    EndInside,
    EndTouching,
    Before,
}

/// A closed time interval. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct TimePeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawPeriod> for TimePeriod {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        TimePeriod::new(raw.start, raw.end)
    }
}

impl TimePeriod {
    /// Create a period from its two endpoints.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidPeriod` if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(PeriodError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// A period beginning at `start` and lasting `duration`.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidPeriod` for a negative duration and
    /// `PeriodError::OutOfRange` if the end is not representable.
    pub fn from_start(start: DateTime<Utc>, duration: Duration) -> Result<Self> {
        let end = start
            .checked_add_signed(duration)
            .ok_or_else(|| PeriodError::OutOfRange(format!("{start} + {duration}")))?;
        Self::new(start, end)
    }

    /// A period ending at `end` that lasted `duration`.
    pub fn from_end(end: DateTime<Utc>, duration: Duration) -> Result<Self> {
        let start = end
            .checked_sub_signed(duration)
            .ok_or_else(|| PeriodError::OutOfRange(format!("{end} - {duration}")))?;
        Self::new(start, end)
    }

    /// A zero-length period at `instant`.
    pub fn moment(instant: DateTime<Utc>) -> Self {
        Self {
            start: instant,
            end: instant,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_in_seconds(&self) -> i64 {
        self.duration().num_seconds()
    }

    pub fn is_moment(&self) -> bool {
        self.start == self.end
    }

    /// True iff `self` lies within `other`, boundaries included.
    pub fn is_inside(&self, other: &TimePeriod) -> bool {
        self.start >= other.start && self.end <= other.end
    }

    /// True iff `other` lies within `self`, boundaries included.
    pub fn contains_period(&self, other: &TimePeriod) -> bool {
        other.is_inside(self)
    }

    /// True iff the two closed intervals share at least one instant.
    pub fn intersects(&self, other: &TimePeriod) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// True iff the periods share more than a single instant.
    ///
    /// Periods touching at one boundary do not overlap, and a zero-length
    /// period overlaps another only when it lies strictly inside it.
    pub fn overlaps_with(&self, other: &TimePeriod) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True iff `instant` falls within the period under `interval` semantics.
    pub fn contains(&self, instant: DateTime<Utc>, interval: Interval) -> bool {
        match interval {
            Interval::Closed => self.start <= instant && instant <= self.end,
            Interval::Open => self.start < instant && instant < self.end,
        }
    }

    /// True iff `self` ends no later than `other` starts.
    pub fn is_before(&self, other: &TimePeriod) -> bool {
        self.end <= other.start
    }

    /// True iff `self` starts no earlier than `other` ends.
    pub fn is_after(&self, other: &TimePeriod) -> bool {
        self.start >= other.end
    }

    /// Distance between two periods that do not intersect.
    ///
    /// Returns `None` when the periods share at least one instant.
    pub fn gap(&self, other: &TimePeriod) -> Option<Duration> {
        if self.intersects(other) {
            None
        } else if self.end < other.start {
            Some(other.start - self.end)
        } else {
            Some(self.start - other.end)
        }
    }

    /// Classify `self` against `other`.
    pub fn relation_to(&self, other: &TimePeriod) -> PeriodRelation {
        let (s1, e1) = (self.start, self.end);
        let (s2, e2) = (other.start, other.end);

        if e2 < s1 {
            PeriodRelation::After
        } else if e2 == s1 {
            PeriodRelation::StartTouching
        } else if s2 < s1 && e2 < e1 {
            PeriodRelation::StartInside
        } else if s2 == s1 && e2 > e1 {
            PeriodRelation::InsideStartTouching
        } else if s2 == s1 && e2 < e1 {
            PeriodRelation::EnclosingStartTouching
        } else if s2 > s1 && e2 < e1 {
            PeriodRelation::Enclosing
        } else if s2 > s1 && e2 == e1 {
            PeriodRelation::EnclosingEndTouching
        } else if s2 == s1 && e2 == e1 {
            PeriodRelation::ExactMatch
        } else if s2 < s1 && e2 > e1 {
            PeriodRelation::Inside
        } else if s2 < s1 && e2 == e1 {
            PeriodRelation::InsideEndTouching
        } else if s2 < e1 && e2 > e1 {
            PeriodRelation::EndInside
        } else if s2 == e1 && e2 > e1 {
            PeriodRelation::EndTouching
        } else {
            PeriodRelation::Before
        }
    }

    /// The same period moved by `offset`.
    pub fn shifted(&self, offset: Duration) -> Result<Self> {
        let start = self
            .start
            .checked_add_signed(offset)
            .ok_or_else(|| PeriodError::OutOfRange(format!("{} + {offset}", self.start)))?;
        Self::from_start(start, self.duration())
    }

    /// The period grown by `amount`, keeping `anchor` fixed.
    ///
    /// A negative `amount` shrinks the period.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidPeriod` when shrinking past zero length.
    pub fn lengthened(&self, amount: Duration, anchor: PeriodAnchor) -> Result<Self> {
        let overflow = || PeriodError::OutOfRange(format!("{self} lengthened by {amount}"));
        let (start, end) = match anchor {
            PeriodAnchor::Start => (
                self.start,
                self.end.checked_add_signed(amount).ok_or_else(overflow)?,
            ),
            PeriodAnchor::Center => {
                let half = amount / 2;
                (
                    self.start.checked_sub_signed(half).ok_or_else(overflow)?,
                    self.end.checked_add_signed(half).ok_or_else(overflow)?,
                )
            }
            PeriodAnchor::End => (
                self.start.checked_sub_signed(amount).ok_or_else(overflow)?,
                self.end,
            ),
        };
        Self::new(start, end)
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
