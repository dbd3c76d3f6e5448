//! Master catalog records: providers and the services they offer.
//!
//! The catalog is read-only to the booking core; services are managed by the
//! master through their settings surface.

use serde::{Deserialize, Serialize};

use super::{MasterId, ServiceId};

/// A service provider who owns a schedule and receives bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Master {
    pub id: MasterId,
    pub display_name: String,
    pub phone: Option<String>,
    /// How many hours before an appointment the reminder is scheduled.
    /// `None` falls back to the configured default
    /// (`BookingConfig::default_reminder_hours`).
    pub reminder_hours: Option<i64>,
}

impl Master {
    pub fn new(id: MasterId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            phone: None,
            reminder_hours: None,
        }
    }

    /// Set an explicit per-master reminder lead time.
    pub fn with_reminder_hours(mut self, hours: i64) -> Self {
        self.reminder_hours = Some(hours);
        self
    }
}

/// A bookable service from a master's catalog.
///
/// Only `duration_minutes` participates in slot generation; the remaining
/// fields exist so callers can render offer lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub master_id: MasterId,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
    pub is_active: bool,
}

impl Service {
    pub fn new(
        id: ServiceId,
        master_id: MasterId,
        name: impl Into<String>,
        price: f64,
        duration_minutes: i64,
    ) -> Self {
        Self {
            id,
            master_id,
            name: name.into(),
            price,
            duration_minutes,
            is_active: true,
        }
    }
}
