//! Candidate slot enumeration within a resolved working window.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use super::overlap::conflicts_with;
use super::resolver::AvailabilityResolver;
use crate::config::BookingConfig;
use crate::db::repository::FullRepository;
use crate::error::{BookingError, BookingResult};
use crate::models::{MasterId, ResolvedDay, ServiceId};

/// Enumerates valid appointment start times for one (master, date) pair.
///
/// The sequence is deterministic and pure given a fixed snapshot of stored
/// state: identical state yields an identical sequence on every call. It is
/// not restartable against live state; a new call re-reads appointments.
#[derive(Clone)]
pub struct SlotGenerator {
    repo: Arc<dyn FullRepository>,
    resolver: AvailabilityResolver,
    step_minutes: i64,
}

impl SlotGenerator {
    pub fn new(repo: Arc<dyn FullRepository>, config: &BookingConfig) -> Self {
        Self {
            resolver: AvailabilityResolver::new(Arc::clone(&repo), config),
            repo,
            step_minutes: config.slot_step_minutes,
        }
    }

    /// Generate candidate start times for a service of
    /// `service_duration_minutes`, walking the working window in steps of
    /// `step_minutes`.
    ///
    /// A candidate is emitted iff it fits inside the window
    /// (`candidate + duration <= window.end`), lies in the future, and does
    /// not overlap any non-cancelled appointment on that date. A day off or a
    /// fully booked day yields an empty vec, not an error.
    ///
    /// # Errors
    /// * `BookingError::InvalidDuration` - non-positive duration or step
    /// * `BookingError::NotFound` - unknown master id
    pub async fn generate_slots(
        &self,
        master_id: MasterId,
        date: NaiveDate,
        service_duration_minutes: i64,
        step_minutes: i64,
    ) -> BookingResult<Vec<DateTime<Utc>>> {
        if service_duration_minutes <= 0 {
            return Err(BookingError::InvalidDuration(format!(
                "service duration must be positive, got {}",
                service_duration_minutes
            )));
        }
        if step_minutes <= 0 {
            return Err(BookingError::InvalidDuration(format!(
                "step must be positive, got {}",
                step_minutes
            )));
        }

        let window = match self
            .resolver
            .resolve_working_window(master_id, date)
            .await?
        {
            ResolvedDay::DayOff => return Ok(Vec::new()),
            ResolvedDay::Open(window) => window,
        };

        // One fresh read per call; the walk below sees a fixed snapshot.
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);
        let appointments = self
            .repo
            .appointments_in(master_id, day_start, day_end)
            .await
            .map_err(BookingError::from_repository)?;

        let now = Utc::now();
        let duration = Duration::minutes(service_duration_minutes);
        let step = Duration::minutes(step_minutes);
        let window_start = date.and_time(window.start).and_utc();
        let window_end = date.and_time(window.end).and_utc();

        let mut slots = Vec::new();
        let mut candidate = window_start;
        while candidate + duration <= window_end {
            if candidate > now && !conflicts_with(&appointments, candidate, candidate + duration, None)
            {
                slots.push(candidate);
            }
            candidate = candidate + step;
        }
        Ok(slots)
    }

    /// Generate slots sized by a catalog service, using the configured step.
    ///
    /// Inactive services are treated as absent from the catalog.
    pub async fn generate_slots_for_service(
        &self,
        master_id: MasterId,
        date: NaiveDate,
        service_id: ServiceId,
    ) -> BookingResult<Vec<DateTime<Utc>>> {
        let service = self
            .repo
            .get_service(service_id)
            .await
            .map_err(BookingError::from_repository)?;
        if !service.is_active {
            return Err(BookingError::NotFound(format!(
                "service {} is no longer offered",
                service_id
            )));
        }
        self.generate_slots(master_id, date, service.duration_minutes, self.step_minutes)
            .await
    }
}
