//! Domain model for the booking engine.
//!
//! Ids are newtyped integers so that a master id can never be passed where a
//! client id is expected. Record shapes follow the persisted schema: recurring
//! rules and date overrides are owned by the master's settings and never
//! mutated by the booking flow; appointments are created exactly once per
//! successful booking and only their `status` field changes afterwards.

pub mod appointment;
pub mod catalog;
pub mod schedule;

pub use appointment::{
    Appointment, AppointmentStatus, NewAppointment, NewNotification, Notification,
    NotificationKind,
};
pub use catalog::{Master, Service};
pub use schedule::{DateOverride, ModelError, RecurringRule, ResolvedDay, WorkingWindow};

/// Defines a newtype id wrapper around an `i64` and generates the derives,
/// `Display`, and conversions the rest of the crate relies on.
macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub i64);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::From<i64> for $name {
            fn from(v: i64) -> Self {
                $name(v)
            }
        }

        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }
    };
}

define_id_type!(MasterId);
define_id_type!(ClientId);
define_id_type!(ServiceId);
define_id_type!(AppointmentId);
define_id_type!(NotificationId);
