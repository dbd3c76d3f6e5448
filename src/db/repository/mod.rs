//! Repository trait definitions.
//!
//! These traits are the store boundary of the booking core. Implementations
//! must be `Send + Sync`; every operation reads or writes current state (no
//! caching of appointment sets across calls, see the concurrency notes on
//! [`AppointmentRepository::insert_appointment_if_free`]).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc, Weekday};

use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, DateOverride, Master, MasterId,
    NewAppointment, NewNotification, Notification, NotificationId, RecurringRule, Service,
    ServiceId,
};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository for masters, services and schedule settings.
///
/// Rules and overrides are written by the master's settings surface and only
/// read by the booking flow. Writes are upserts: at most one active rule per
/// (master, weekday) and one override per (master, date) can exist, which
/// replaces the unconstrained-duplicates behavior of earlier schemas.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Check if the store is healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch a master by id.
    ///
    /// # Returns
    /// * `Ok(Master)` - The master record
    /// * `Err(RepositoryError::NotFound)` - If no such master exists
    async fn get_master(&self, master_id: MasterId) -> RepositoryResult<Master>;

    /// Fetch a service from a master's catalog.
    async fn get_service(&self, service_id: ServiceId) -> RepositoryResult<Service>;

    /// List the active services of a master, ordered by id.
    async fn services_for(&self, master_id: MasterId) -> RepositoryResult<Vec<Service>>;

    /// Fetch the recurring rules of a master for one weekday.
    async fn rules_for(
        &self,
        master_id: MasterId,
        weekday: Weekday,
    ) -> RepositoryResult<Vec<RecurringRule>>;

    /// Fetch the date overrides of a master for one calendar date.
    async fn overrides_for(
        &self,
        master_id: MasterId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<DateOverride>>;

    /// Insert or replace the recurring rule for (master, weekday).
    async fn set_recurring_rule(&self, rule: RecurringRule) -> RepositoryResult<()>;

    /// Remove the recurring rule for (master, weekday), if any.
    async fn clear_recurring_rule(
        &self,
        master_id: MasterId,
        weekday: Weekday,
    ) -> RepositoryResult<()>;

    /// Insert or replace the date override for (master, date).
    async fn set_date_override(&self, date_override: DateOverride) -> RepositoryResult<()>;

    /// Remove the date override for (master, date), if any.
    async fn clear_date_override(
        &self,
        master_id: MasterId,
        date: NaiveDate,
    ) -> RepositoryResult<()>;
}

/// Repository for appointments.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Fetch a single appointment by id.
    async fn get_appointment(&self, id: AppointmentId) -> RepositoryResult<Appointment>;

    /// Fetch all appointments of a master whose interval intersects
    /// `[from, until)`, regardless of status, ordered by start time.
    async fn appointments_in(
        &self,
        master_id: MasterId,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Appointment>>;

    /// Atomically verify that `[start_time, end_time)` is free of
    /// non-cancelled appointments for the master and insert a new appointment
    /// with status `Confirmed`.
    ///
    /// The check and the insert MUST form one atomic unit against the store;
    /// a bare re-check followed by a separate insert leaves the
    /// generation-to-confirm race open. A lost race surfaces as
    /// `RepositoryError::Conflict` and leaves no partial record behind.
    async fn insert_appointment_if_free(
        &self,
        new: NewAppointment,
    ) -> RepositoryResult<Appointment>;

    /// Update the status of an existing appointment and return the updated
    /// record.
    async fn update_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> RepositoryResult<Appointment>;
}

/// Repository for the notification queue consumed by the reminder sweep.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Queue a notification for later dispatch.
    async fn enqueue_notification(&self, new: NewNotification) -> RepositoryResult<Notification>;

    /// Fetch unsent notifications with `scheduled_for <= now`, ordered by
    /// scheduled time.
    async fn due_notifications(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Notification>>;

    /// Mark a notification as sent at `at`.
    async fn mark_notification_sent(
        &self,
        id: NotificationId,
        at: DateTime<Utc>,
    ) -> RepositoryResult<Notification>;
}

/// Everything the booking engine needs from storage.
pub trait FullRepository:
    ScheduleRepository + AppointmentRepository + NotificationRepository
{
}

impl<T> FullRepository for T where
    T: ScheduleRepository + AppointmentRepository + NotificationRepository
{
}
