//! Booking confirmation engine and the dialog state machine.
//!
//! [`BookingEngine::confirm`] is the only way appointments come into
//! existence. It validates the request, re-checks the time range against the
//! current store state, and then relies on the store's atomic
//! `insert_appointment_if_free` so that the overlap check and the insert form
//! one unit; a slot taken between generation and confirmation surfaces as
//! [`BookingError::Conflict`], never as a double booking.

pub mod state;

pub use state::{transition, BookingEvent, BookingState, Effect};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::availability::OverlapGuard;
use crate::config::BookingConfig;
use crate::db::repository::FullRepository;
use crate::error::{BookingError, BookingResult};
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, ClientId, MasterId, NewAppointment,
    NewNotification, NotificationKind, ServiceId,
};
use crate::notifications::NotificationDispatcher;

/// A confirm request assembled by the dialog layer.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub master_id: MasterId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client_phone: Option<String>,
}

/// Who triggered a cancellation. Only affects how the notification is
/// rendered downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelledBy {
    Master,
    Client,
}

/// Creates, cancels and completes appointments.
#[derive(Clone)]
pub struct BookingEngine {
    repo: Arc<dyn FullRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    guard: OverlapGuard,
    config: BookingConfig,
}

impl BookingEngine {
    pub fn new(
        repo: Arc<dyn FullRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: BookingConfig,
    ) -> Self {
        Self {
            guard: OverlapGuard::new(Arc::clone(&repo)),
            repo,
            dispatcher,
            config,
        }
    }

    /// Confirm a booking.
    ///
    /// On success the appointment is persisted with status `Confirmed`, a
    /// confirmation is dispatched immediately (fire-and-forget) and a
    /// reminder is queued at `start - reminder_hours` (the master's own lead,
    /// or the configured default) if that instant is still in the future.
    ///
    /// # Errors
    /// * `BookingError::Validation` - bad timing input; restart slot selection
    /// * `BookingError::NotFound` - unknown master
    /// * `BookingError::Conflict` - the slot was taken in the meantime
    /// * `BookingError::Persistence` - the store write failed; no partial
    ///   appointment is left behind
    pub async fn confirm(&self, request: BookingRequest) -> BookingResult<Appointment> {
        self.validate(&request)?;

        let master = self
            .repo
            .get_master(request.master_id)
            .await
            .map_err(BookingError::from_repository)?;

        // Fast-fail pre-check against current state. The atomic
        // check-and-insert below remains the authority.
        if self
            .guard
            .has_overlap(request.master_id, request.start_time, request.end_time, None)
            .await
            .map_err(BookingError::from_repository)?
        {
            return Err(BookingError::Conflict {
                start: request.start_time,
                end: request.end_time,
            });
        }

        let appointment = self
            .repo
            .insert_appointment_if_free(NewAppointment {
                master_id: request.master_id,
                client_id: request.client_id,
                service_id: request.service_id,
                start_time: request.start_time,
                end_time: request.end_time,
                client_phone: request.client_phone,
            })
            .await
            .map_err(BookingError::from_repository)?;

        info!(
            appointment_id = %appointment.id,
            master_id = %appointment.master_id,
            client_id = %appointment.client_id,
            start = %appointment.start_time,
            "booking confirmed"
        );

        if let Err(err) = self
            .dispatcher
            .deliver(&appointment, NotificationKind::Confirmation)
            .await
        {
            error!(
                appointment_id = %appointment.id,
                error = %err,
                "failed to deliver confirmation"
            );
        }

        let reminder_hours = master
            .reminder_hours
            .unwrap_or(self.config.default_reminder_hours);
        let reminder_at = appointment.start_time - Duration::hours(reminder_hours);
        if reminder_at > Utc::now() {
            // A queue failure after a successful booking is logged, not
            // surfaced: the appointment stands either way.
            if let Err(err) = self
                .repo
                .enqueue_notification(NewNotification {
                    appointment_id: appointment.id,
                    kind: NotificationKind::Reminder,
                    scheduled_for: reminder_at,
                })
                .await
            {
                error!(
                    appointment_id = %appointment.id,
                    error = %err,
                    "failed to queue reminder"
                );
            }
        }

        Ok(appointment)
    }

    /// Cancel an appointment. The freed time range becomes bookable again
    /// immediately.
    pub async fn cancel(
        &self,
        id: AppointmentId,
        cancelled_by: CancelledBy,
    ) -> BookingResult<Appointment> {
        let appointment = self
            .repo
            .update_appointment_status(id, AppointmentStatus::Cancelled)
            .await
            .map_err(BookingError::from_repository)?;

        info!(
            appointment_id = %appointment.id,
            master_id = %appointment.master_id,
            cancelled_by = ?cancelled_by,
            "appointment cancelled"
        );

        if let Err(err) = self
            .dispatcher
            .deliver(&appointment, NotificationKind::Cancellation)
            .await
        {
            error!(
                appointment_id = %appointment.id,
                error = %err,
                "failed to deliver cancellation notice"
            );
        }

        Ok(appointment)
    }

    /// Mark an appointment as completed. It keeps blocking its time range.
    pub async fn complete(&self, id: AppointmentId) -> BookingResult<Appointment> {
        let appointment = self
            .repo
            .update_appointment_status(id, AppointmentStatus::Completed)
            .await
            .map_err(BookingError::from_repository)?;
        info!(appointment_id = %appointment.id, "appointment completed");
        Ok(appointment)
    }

    fn validate(&self, request: &BookingRequest) -> BookingResult<()> {
        if request.end_time <= request.start_time {
            return Err(BookingError::Validation(
                "end time must be after start time".to_string(),
            ));
        }

        let now = Utc::now();
        if request.start_time <= now {
            warn!(master_id = %request.master_id, start = %request.start_time, "booking rejected: start in the past");
            return Err(BookingError::Validation(
                "cannot book a time in the past".to_string(),
            ));
        }
        if request.start_time > now + Duration::days(self.config.max_advance_days) {
            return Err(BookingError::Validation(format!(
                "cannot book more than {} days in advance",
                self.config.max_advance_days
            )));
        }
        if request.end_time - request.start_time
            < Duration::minutes(self.config.min_duration_minutes)
        {
            return Err(BookingError::Validation(format!(
                "minimum appointment duration is {} minutes",
                self.config.min_duration_minutes
            )));
        }
        Ok(())
    }
}
