//! Appointments and the notification queue entries derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppointmentId, ClientId, MasterId, NotificationId, ServiceId};

/// Lifecycle status of an appointment.
///
/// `Confirmed` is the only status the booking engine persists on creation;
/// `Cancelled`/`Completed` are applied afterwards by master or client action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Whether an appointment with this status still occupies its time range.
    /// Cancelled appointments never block a slot.
    pub fn blocks_schedule(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A booked time range on a master's calendar. Times are UTC and the interval
/// is half-open: `[start_time, end_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub master_id: MasterId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub client_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new appointment.
///
/// The store assigns the id and creation timestamp and persists the record
/// with status `Confirmed`; the overlap check and the insert happen as one
/// atomic operation.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub master_id: MasterId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client_phone: Option<String>,
}

/// What a queued notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Confirmation,
    Reminder,
    Cancellation,
}

/// A queued notification, polled by the background sweep when due.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub appointment_id: AppointmentId,
    pub kind: NotificationKind,
    pub scheduled_for: DateTime<Utc>,
    pub is_sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Insert payload for the notification queue.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub appointment_id: AppointmentId,
    pub kind: NotificationKind,
    pub scheduled_for: DateTime<Utc>,
}
