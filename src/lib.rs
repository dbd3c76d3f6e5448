//! # slotbook
//!
//! Availability resolution and overlap-safe booking engine for service
//! providers ("masters").
//!
//! The crate merges a master's recurring weekly working-hours template,
//! per-date overrides (custom hours or day off) and existing bookings into a
//! list of valid appointment start times, and guarantees that no two confirmed
//! appointments for the same master ever occupy overlapping time. Dialog
//! rendering, message formatting, payment capture and delivery transports are
//! external collaborators behind traits.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (masters, services, schedule records, appointments)
//! - [`db`]: Repository traits and the in-memory repository implementation
//! - [`availability`]: Working-window resolution, slot generation, overlap guard
//! - [`booking`]: Booking dialog state machine and the confirmation engine
//! - [`notifications`]: Dispatcher trait and the background reminder sweep
//! - [`config`]: Tunable limits loaded from TOML and environment variables
//!
//! Data flows one way: store -> resolver -> slot generator -> (caller picks a
//! slot) -> booking engine -> overlap guard -> store. The one genuine hazard
//! is the time-of-check-to-time-of-use race between slot generation and
//! confirmation; the store-level [`db::AppointmentRepository::insert_appointment_if_free`]
//! closes it by making the overlap check and the insert a single atomic unit.

pub mod availability;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notifications;

pub use availability::{AvailabilityResolver, OverlapGuard, SlotGenerator};
pub use booking::{BookingEngine, BookingRequest, CancelledBy};
pub use config::{BookingConfig, ConfigError};
pub use db::{
    AppointmentRepository, FullRepository, LocalRepository, NotificationRepository,
    RepositoryError, RepositoryResult, ScheduleRepository,
};
pub use error::{BookingError, BookingResult};
pub use notifications::{NotificationDispatcher, ReminderSweeper, SweeperHandle};
