//! Interval-intersection test: the single source of truth for "is this time
//! free".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{Appointment, AppointmentId, MasterId};

/// Half-open interval intersection: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && a_end > b_start`. An appointment ending
/// exactly when another starts does not overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Whether `[start, end)` collides with any appointment in the set.
///
/// Cancelled appointments never block; `exclude` lets a booking skip itself
/// when re-validating an edit.
pub fn conflicts_with(
    appointments: &[Appointment],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<AppointmentId>,
) -> bool {
    appointments
        .iter()
        .filter(|a| a.status.blocks_schedule())
        .filter(|a| exclude != Some(a.id))
        .any(|a| intervals_overlap(a.start_time, a.end_time, start, end))
}

/// Repository-backed overlap check, always reading current store state.
#[derive(Clone)]
pub struct OverlapGuard {
    repo: Arc<dyn FullRepository>,
}

impl OverlapGuard {
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self { repo }
    }

    /// Check `[start, end)` against the master's current appointment set.
    ///
    /// This is the soft counterpart of the store's atomic
    /// `insert_appointment_if_free`: callers use it to fail fast, never as a
    /// substitute for the atomic check-and-insert.
    pub async fn has_overlap(
        &self,
        master_id: MasterId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<AppointmentId>,
    ) -> RepositoryResult<bool> {
        let appointments = self.repo.appointments_in(master_id, start, end).await?;
        let overlapping = conflicts_with(&appointments, start, end, exclude);
        if overlapping {
            warn!(%master_id, %start, %end, "overlap detected for requested time range");
        }
        Ok(overlapping)
    }
}
