//! Shared behavior of types that aggregate time periods under derived bounds.

use chrono::{DateTime, Duration, Utc};

/// A group of periods summarized by its earliest start and latest end.
pub trait TimePeriodGroup {
    /// Earliest start across the group, `None` when empty.
    fn start(&self) -> Option<DateTime<Utc>>;

    /// Latest end across the group, `None` when empty.
    fn end(&self) -> Option<DateTime<Utc>>;

    /// Number of periods in the group.
    fn count(&self) -> usize;

    /// Span between the group's bounds, `None` when empty.
    fn duration(&self) -> Option<Duration> {
        Some(self.end()? - self.start()?)
    }

    /// Cheap equality pre-check: same number of periods and same bounds.
    fn has_same_characteristics_as<G: TimePeriodGroup + ?Sized>(&self, other: &G) -> bool {
        self.count() == other.count() && self.start() == other.start() && self.end() == other.end()
    }
}
