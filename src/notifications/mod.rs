//! Notification delivery boundary and the background reminder sweep.
//!
//! Delivery itself (messenger, SMS, email) lives outside this crate behind
//! [`NotificationDispatcher`]. The booking engine dispatches confirmations
//! and cancellation notices inline; reminders go through the notification
//! queue and are picked up by the [`sweeper::ReminderSweeper`] when due.

pub mod sweeper;

pub use sweeper::{ReminderSweeper, SweeperHandle};

use async_trait::async_trait;

use crate::models::{Appointment, NotificationKind};

/// Fire-and-forget delivery of a notification about an appointment.
///
/// Implementations render and transport the message. Errors are logged by
/// the caller and never retried; a failed delivery must not affect booking
/// state.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn deliver(&self, appointment: &Appointment, kind: NotificationKind)
        -> anyhow::Result<()>;
}
