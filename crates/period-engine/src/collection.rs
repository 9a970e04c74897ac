//! An ordered, mutable bag of time periods with derived bounds.
//!
//! The collection keeps insertion order until explicitly sorted and allows
//! duplicate periods. Its bounds (earliest start, latest end) are recomputed
//! after every structural mutation and are never set directly.
//!
//! Relation queries never touch the receiver: each one builds and returns a
//! new collection holding copies of the matching periods, in their original
//! relative order, under the same calendar.

use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::error::{PeriodError, Result};
use crate::group::TimePeriodGroup;
use crate::period::{Interval, TimePeriod};

/// Relation between a collection element and a reference period, used to
/// select elements in [`TimePeriodCollection::periods_with_relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The element lies within the reference period.
    Inside,
    /// The element shares at least one instant with the reference period.
    Intersects,
    /// The element shares more than a single instant with the reference period.
    Overlaps,
}

impl Relation {
    /// Evaluate the relation for `element` against `reference`.
    pub fn holds(self, element: &TimePeriod, reference: &TimePeriod) -> bool {
        match self {
            Relation::Inside => element.is_inside(reference),
            Relation::Intersects => element.intersects(reference),
            Relation::Overlaps => element.overlaps_with(reference),
        }
    }
}

/// A collection of [`TimePeriod`] values.
///
/// Mutation takes `&mut self`, so a single owner mutates at a time. The type
/// does no internal locking: sharing one collection between threads that
/// mutate it requires external synchronization such as a `Mutex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CollectionRepr", into = "CollectionRepr")]
pub struct TimePeriodCollection {
    periods: Vec<TimePeriod>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    calendar: Calendar,
}

#[derive(Serialize, Deserialize)]
struct CollectionRepr {
    #[serde(default)]
    timezone: Calendar,
    periods: Vec<TimePeriod>,
}

impl From<CollectionRepr> for TimePeriodCollection {
    fn from(repr: CollectionRepr) -> Self {
        Self::with_periods(repr.timezone, repr.periods)
    }
}

impl From<TimePeriodCollection> for CollectionRepr {
    fn from(collection: TimePeriodCollection) -> Self {
        Self {
            timezone: collection.calendar,
            periods: collection.periods,
        }
    }
}

impl TimePeriodCollection {
    /// Create an empty collection using `calendar` for date calculations.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            periods: Vec::new(),
            start: None,
            end: None,
            calendar,
        }
    }

    fn with_periods(calendar: Calendar, periods: Vec<TimePeriod>) -> Self {
        let mut collection = Self {
            periods,
            start: None,
            end: None,
            calendar,
        };
        collection.update_bounds();
        collection
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn periods(&self) -> &[TimePeriod] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimePeriod> {
        self.periods.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimePeriod> {
        self.periods.iter()
    }

    /// Earliest start across all periods, `None` when empty.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Latest end across all periods, `None` when empty.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Append `period` to the end of the collection.
    pub fn add(&mut self, period: TimePeriod) {
        self.periods.push(period);
        self.update_bounds();
    }

    /// Insert `period` at `index`, shifting later periods back.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidIndex` if `index > len`; the collection is
    /// left unchanged.
    pub fn insert(&mut self, period: TimePeriod, index: usize) -> Result<()> {
        let len = self.periods.len();
        if index > len {
            log::debug!("insert rejected: index {index} outside 0..={len}");
            return Err(PeriodError::InvalidIndex { index, len });
        }
        self.periods.insert(index, period);
        self.update_bounds();
        Ok(())
    }

    /// Remove and return the period at `index`.
    ///
    /// Returns `None` and leaves the collection unchanged if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Option<TimePeriod> {
        if index >= self.periods.len() {
            log::debug!(
                "remove ignored: index {index} outside 0..{}",
                self.periods.len()
            );
            return None;
        }
        let period = self.periods.remove(index);
        self.update_bounds();
        Some(period)
    }

    // Sorting is stable: periods with equal keys keep their relative order.

    pub fn sort_by_start_ascending(&mut self) {
        self.periods.sort_by_key(|p| p.start());
    }

    pub fn sort_by_start_descending(&mut self) {
        self.periods.sort_by(|a, b| b.start().cmp(&a.start()));
    }

    pub fn sort_by_end_ascending(&mut self) {
        self.periods.sort_by_key(|p| p.end());
    }

    pub fn sort_by_end_descending(&mut self) {
        self.periods.sort_by(|a, b| b.end().cmp(&a.end()));
    }

    pub fn sort_by_duration_ascending(&mut self) {
        self.periods.sort_by_key(|p| p.duration());
    }

    pub fn sort_by_duration_descending(&mut self) {
        self.periods.sort_by(|a, b| b.duration().cmp(&a.duration()));
    }

    /// Periods lying within `period`, boundaries included.
    pub fn periods_inside(&self, period: &TimePeriod) -> Self {
        self.periods_with_relation(period, Relation::Inside)
    }

    /// Periods containing `instant`, boundaries included.
    pub fn periods_intersected_by_date(&self, instant: DateTime<Utc>) -> Self {
        self.collect_matching(|elem| elem.contains(instant, Interval::Closed))
    }

    /// Periods sharing at least one instant with `period`.
    pub fn periods_intersected_by_period(&self, period: &TimePeriod) -> Self {
        self.periods_with_relation(period, Relation::Intersects)
    }

    /// Periods sharing more than a single instant with `period`.
    pub fn periods_overlapped_by_period(&self, period: &TimePeriod) -> Self {
        self.periods_with_relation(period, Relation::Overlaps)
    }

    /// Periods for which `relation` holds against `reference`.
    pub fn periods_with_relation(&self, reference: &TimePeriod, relation: Relation) -> Self {
        self.collect_matching(|elem| relation.holds(elem, reference))
    }

    fn collect_matching<F>(&self, predicate: F) -> Self
    where
        F: Fn(&TimePeriod) -> bool,
    {
        let matched: Vec<TimePeriod> = self
            .periods
            .iter()
            .copied()
            .filter(|p| predicate(p))
            .collect();
        log::trace!("query matched {} of {} periods", matched.len(), self.periods.len());
        Self::with_periods(self.calendar, matched)
    }

    /// Compare two collections.
    ///
    /// Collections with a different length or different bounds are unequal
    /// without inspecting their elements. Otherwise, with `consider_order`
    /// the periods must match index by index; without it, both collections
    /// must hold the same periods with the same multiplicities. This is
    /// stricter than checking that each period occurs somewhere in `other`:
    /// `[a, a, c]` and `[a, b, c]` are unequal.
    pub fn equals(&self, other: &TimePeriodCollection, consider_order: bool) -> bool {
        if !self.has_same_characteristics_as(other) {
            return false;
        }
        if consider_order {
            self.periods == other.periods
        } else {
            self.is_permutation_of(other)
        }
    }

    fn is_permutation_of(&self, other: &TimePeriodCollection) -> bool {
        let mut matched = vec![false; other.periods.len()];
        for period in &self.periods {
            let slot = other
                .periods
                .iter()
                .enumerate()
                .position(|(i, candidate)| !matched[i] && candidate == period);
            match slot {
                Some(i) => matched[i] = true,
                None => return false,
            }
        }
        true
    }

    fn update_bounds(&mut self) {
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for period in &self.periods {
            bounds = Some(match bounds {
                None => (period.start(), period.end()),
                Some((start, end)) => (start.min(period.start()), end.max(period.end())),
            });
        }
        self.start = bounds.map(|(start, _)| start);
        self.end = bounds.map(|(_, end)| end);
        log::trace!(
            "bounds recomputed over {} periods: {:?}..{:?}",
            self.periods.len(),
            self.start,
            self.end
        );
    }
}

impl Default for TimePeriodCollection {
    fn default() -> Self {
        Self::new(Calendar::current())
    }
}

impl TimePeriodGroup for TimePeriodCollection {
    fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    fn count(&self) -> usize {
        self.periods.len()
    }
}

impl PartialEq for TimePeriodCollection {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, false)
    }
}

impl Eq for TimePeriodCollection {}

impl Index<usize> for TimePeriodCollection {
    type Output = TimePeriod;

    fn index(&self, index: usize) -> &TimePeriod {
        &self.periods[index]
    }
}

impl<'a> IntoIterator for &'a TimePeriodCollection {
    type Item = &'a TimePeriod;
    type IntoIter = std::slice::Iter<'a, TimePeriod>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

impl IntoIterator for TimePeriodCollection {
    type Item = TimePeriod;
    type IntoIter = std::vec::IntoIter<TimePeriod>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.into_iter()
    }
}

impl Extend<TimePeriod> for TimePeriodCollection {
    fn extend<I: IntoIterator<Item = TimePeriod>>(&mut self, iter: I) {
        self.periods.extend(iter);
        self.update_bounds();
    }
}

impl FromIterator<TimePeriod> for TimePeriodCollection {
    fn from_iter<I: IntoIterator<Item = TimePeriod>>(iter: I) -> Self {
        Self::with_periods(Calendar::current(), iter.into_iter().collect())
    }
}
