//! Availability resolution and slot generation.
//!
//! Three pieces, composed in one direction:
//!
//! - [`resolver::AvailabilityResolver`] merges date overrides, recurring rules
//!   and the default window into the single effective working window (or day
//!   off) for a date.
//! - [`slots::SlotGenerator`] enumerates candidate start times within that
//!   window, excluding candidates that would overlap existing bookings.
//! - [`overlap`] holds the interval-intersection predicate both the generator
//!   (soft check against a snapshot) and the booking path (authoritative
//!   check inside the store) share.

pub mod overlap;
pub mod resolver;
pub mod slots;

pub use overlap::OverlapGuard;
pub use resolver::AvailabilityResolver;
pub use slots::SlotGenerator;
