//! Error taxonomy of the booking core.
//!
//! Day-off and fully-booked days are not errors; they surface as empty slot
//! sequences. Everything here is a `Result` the caller must handle:
//! `Validation`, `Conflict` and `NotFound` are recoverable (correct the input,
//! re-query slots, re-select), `InvalidDuration` is a programming error that
//! should never reach users, and `Persistence` is fatal for the request with
//! no internal retry.

use chrono::{DateTime, Utc};

use crate::db::RepositoryError;
use crate::models::ModelError;

/// Result type for booking core operations.
pub type BookingResult<T> = Result<T, BookingError>;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Bad timing input from the caller; restart slot selection with
    /// corrected input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The slot was taken between generation and confirmation; re-query
    /// slots and pick another time.
    #[error("time slot {start}..{end} was just taken")]
    Conflict {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Unknown master, service or appointment id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-positive duration or step; callers must never pass these.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The store write failed; surfaced unchanged, nothing is retried.
    #[error("persistence failure: {0}")]
    Persistence(#[source] RepositoryError),
}

impl BookingError {
    /// Map a storage error onto the core taxonomy: lookups that missed stay
    /// `NotFound`, a lost insert race becomes `Conflict`, anything else is a
    /// persistence failure.
    pub(crate) fn from_repository(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => BookingError::NotFound(err.to_string()),
            RepositoryError::Conflict { start, end, .. } => BookingError::Conflict { start, end },
            other => BookingError::Persistence(other),
        }
    }
}

impl From<ModelError> for BookingError {
    fn from(err: ModelError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MasterId;
    use chrono::TimeZone;

    #[test]
    fn test_repository_conflict_maps_to_conflict() {
        let start = Utc.with_ymd_and_hms(2030, 1, 7, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2030, 1, 7, 11, 0, 0).unwrap();
        let err = BookingError::from_repository(RepositoryError::conflict(MasterId(1), start, end));
        assert!(matches!(err, BookingError::Conflict { .. }));
    }

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err = BookingError::from_repository(RepositoryError::not_found("master 9"));
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[test]
    fn test_other_repository_errors_are_persistence() {
        let err = BookingError::from_repository(RepositoryError::internal("disk on fire"));
        assert!(matches!(err, BookingError::Persistence(_)));
    }
}
