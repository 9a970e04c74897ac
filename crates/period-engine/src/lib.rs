//! # period-engine
//!
//! Time periods, collections of time periods, and relative-time phrases.
//!
//! A [`TimePeriod`] is a closed interval between two UTC instants with
//! relation predicates (inside, intersects, overlaps, contains). A
//! [`TimePeriodCollection`] is an ordered bag of periods with derived bounds,
//! stable sorts, and relation queries that each return a new collection.
//!
//! ## Modules
//!
//! - [`period`] — single interval, relation predicates, Allen-style relations
//! - [`collection`] — ordered bag of periods with bounds, sorts and queries
//! - [`group`] — trait shared by period aggregates
//! - [`calendar`] — timezone context and calendar-unit arithmetic
//! - [`ago`] — "3 hours ago" style phrases via a pluggable localizer
//! - [`error`] — Error types

pub mod ago;
pub mod calendar;
pub mod collection;
pub mod error;
pub mod group;
pub mod period;

pub use ago::{
    AgoUnit, DateAgoFormat, EnglishLocalizer, Localizer, TableLocalizer, TimeAgo,
};
pub use calendar::{Calendar, CalendarUnit};
pub use collection::{Relation, TimePeriodCollection};
pub use error::PeriodError;
pub use group::TimePeriodGroup;
pub use period::{Interval, PeriodAnchor, PeriodRelation, TimePeriod};
