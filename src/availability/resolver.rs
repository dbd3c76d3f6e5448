//! Working-window resolution for one (master, date) pair.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::config::BookingConfig;
use crate::db::repository::FullRepository;
use crate::error::{BookingError, BookingResult};
use crate::models::{MasterId, ResolvedDay, WorkingWindow};

/// Resolves the single effective working window for a calendar date.
///
/// Precedence, evaluated in order, first match returned:
/// 1. A day-off override for the date: day off, regardless of anything else.
/// 2. A custom-hours override for the date: its window.
/// 3. A recurring rule for the date's weekday: its window.
/// 4. Otherwise the configured default window (08:00-22:00 out of the box).
#[derive(Clone)]
pub struct AvailabilityResolver {
    repo: Arc<dyn FullRepository>,
    default_window: WorkingWindow,
}

impl AvailabilityResolver {
    pub fn new(repo: Arc<dyn FullRepository>, config: &BookingConfig) -> Self {
        Self {
            repo,
            default_window: config.default_window(),
        }
    }

    /// Resolve the working window for `date`.
    ///
    /// # Returns
    /// * `Ok(ResolvedDay::DayOff)` - The master does not work on this date
    /// * `Ok(ResolvedDay::Open(window))` - The effective `[start, end)` window
    /// * `Err(BookingError::NotFound)` - Unknown master id
    pub async fn resolve_working_window(
        &self,
        master_id: MasterId,
        date: NaiveDate,
    ) -> BookingResult<ResolvedDay> {
        self.repo
            .get_master(master_id)
            .await
            .map_err(BookingError::from_repository)?;

        let overrides = self
            .repo
            .overrides_for(master_id, date)
            .await
            .map_err(BookingError::from_repository)?;

        // A day-off override wins even if a custom-hours override coexists.
        if overrides.iter().any(|o| o.is_day_off) {
            return Ok(ResolvedDay::DayOff);
        }
        if let Some(custom) = overrides.iter().find(|o| !o.is_day_off) {
            return Ok(ResolvedDay::Open(custom.window()));
        }

        let rules = self
            .repo
            .rules_for(master_id, date.weekday())
            .await
            .map_err(BookingError::from_repository)?;
        if let Some(rule) = rules.first() {
            return Ok(ResolvedDay::Open(rule.window()));
        }

        Ok(ResolvedDay::Open(self.default_window))
    }
}
