//! Working-hours schedule records and the resolved daily window.
//!
//! Two record kinds feed availability resolution:
//!
//! - [`RecurringRule`]: weekly template, one window per weekday
//! - [`DateOverride`]: per-date exception, either custom hours or a day off
//!
//! Resolution precedence (day-off override > hours override > recurring rule
//! > default window) lives in [`crate::availability::AvailabilityResolver`];
//! this module only guarantees that every persisted window is non-empty.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::MasterId;

/// Construction errors for schedule records.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("working window start {start} is not before end {end}")]
    EmptyWindow { start: NaiveTime, end: NaiveTime },
}

/// One entry of a master's weekly working-hours template.
///
/// At most one rule is meant to be active per (master, weekday); the
/// repository enforces this at write time by replacing any previous rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRule {
    pub master_id: MasterId,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl RecurringRule {
    pub fn new(
        master_id: MasterId,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, ModelError> {
        if start_time >= end_time {
            return Err(ModelError::EmptyWindow {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            master_id,
            weekday,
            start_time,
            end_time,
        })
    }

    pub fn window(&self) -> WorkingWindow {
        WorkingWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// A per-date exception to the weekly template: custom hours or a full day off.
///
/// `start_time`/`end_time` are ignored when `is_day_off` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateOverride {
    pub master_id: MasterId,
    pub date: NaiveDate,
    pub is_day_off: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl DateOverride {
    /// A full day off on `date`.
    pub fn day_off(master_id: MasterId, date: NaiveDate) -> Self {
        Self {
            master_id,
            date,
            is_day_off: true,
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
        }
    }

    /// Custom working hours on `date`.
    pub fn working_hours(
        master_id: MasterId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, ModelError> {
        if start_time >= end_time {
            return Err(ModelError::EmptyWindow {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            master_id,
            date,
            is_day_off: false,
            start_time,
            end_time,
        })
    }

    pub fn window(&self) -> WorkingWindow {
        WorkingWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// The half-open `[start, end)` time range during which a master accepts
/// bookings on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ModelError> {
        if start >= end {
            return Err(ModelError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Result of resolving a master's schedule for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDay {
    /// The master does not work on this date; no slots exist.
    DayOff,
    /// The single effective working window for this date.
    Open(WorkingWindow),
}

impl ResolvedDay {
    pub fn is_day_off(&self) -> bool {
        matches!(self, ResolvedDay::DayOff)
    }

    pub fn window(&self) -> Option<WorkingWindow> {
        match self {
            ResolvedDay::DayOff => None,
            ResolvedDay::Open(w) => Some(*w),
        }
    }
}
