//! Storage layer for schedule data via the repository pattern.
//!
//! The booking core talks to storage through three traits so different
//! backends can be swapped without touching the engine:
//!
//! - [`ScheduleRepository`]: masters, services, recurring rules, date overrides
//! - [`AppointmentRepository`]: range reads and the atomic check-and-insert
//! - [`NotificationRepository`]: the reminder queue polled by the sweep
//!
//! [`FullRepository`] is the supertrait the engine holds. The crate ships one
//! implementation, [`LocalRepository`], which keeps everything in memory
//! behind a single lock; its `insert_appointment_if_free` holds the write
//! lock across the overlap check and the insert, which is what makes
//! concurrent confirms of the same slot resolve to exactly one winner.

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{
    AppointmentRepository, ErrorContext, FullRepository, NotificationRepository, RepositoryError,
    RepositoryResult, ScheduleRepository,
};
