//! Conversation state for the booking dialog.
//!
//! The dialog is a tagged-variant state machine carried per session, with
//! transitions as a pure function over `(state, event) -> (state, effects)`.
//! The UI layer owns rendering and input collection; it feeds events in and
//! executes the returned effects (present a list, run the booking, notify the
//! user). Terminal states are [`BookingState::Confirmed`] and
//! [`BookingState::Rejected`]; a recoverable failure hands control back to
//! `SelectingTime` so the caller can re-query slots.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AppointmentId, ServiceId};

/// Where one booking conversation currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookingState {
    SelectingService,
    SelectingDate {
        service_id: ServiceId,
    },
    SelectingTime {
        service_id: ServiceId,
        date: NaiveDate,
    },
    AwaitingContact {
        service_id: ServiceId,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    AwaitingConfirmation {
        service_id: ServiceId,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        phone: Option<String>,
    },
    Confirmed {
        appointment_id: AppointmentId,
    },
    Rejected {
        reason: String,
    },
}

/// Caller input and booking outcomes that drive the dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    ServiceChosen(ServiceId),
    DateChosen(NaiveDate),
    TimeChosen {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    ContactProvided(String),
    ContactSkipped,
    ConfirmRequested,
    BookingSucceeded(AppointmentId),
    /// The confirm attempt failed. `recoverable` distinguishes a conflict or
    /// validation reject (pick another time) from a fatal store failure.
    BookingFailed {
        reason: String,
        recoverable: bool,
    },
}

/// Side effects the UI layer must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PresentDates {
        service_id: ServiceId,
    },
    PresentSlots {
        service_id: ServiceId,
        date: NaiveDate,
    },
    RequestContact,
    PresentSummary {
        service_id: ServiceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        phone: Option<String>,
    },
    /// Run `BookingEngine::confirm` with these parameters and feed the result
    /// back as `BookingSucceeded` / `BookingFailed`.
    ExecuteBooking {
        service_id: ServiceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        phone: Option<String>,
    },
    NotifyRejection {
        reason: String,
    },
}

/// Apply one event to the dialog state.
///
/// Unexpected `(state, event)` pairs leave the state unchanged and produce no
/// effects; there is nothing sensible to do with, say, a date arriving while
/// a confirmation is pending.
pub fn transition(state: BookingState, event: BookingEvent) -> (BookingState, Vec<Effect>) {
    use BookingEvent as E;
    use BookingState as S;

    match (state, event) {
        (S::SelectingService, E::ServiceChosen(service_id)) => (
            S::SelectingDate { service_id },
            vec![Effect::PresentDates { service_id }],
        ),

        (S::SelectingDate { service_id }, E::DateChosen(date)) => (
            S::SelectingTime { service_id, date },
            vec![Effect::PresentSlots { service_id, date }],
        ),

        (S::SelectingTime { service_id, date }, E::TimeChosen { start, end }) => (
            S::AwaitingContact {
                service_id,
                date,
                start,
                end,
            },
            vec![Effect::RequestContact],
        ),

        (
            S::AwaitingContact {
                service_id,
                date,
                start,
                end,
            },
            E::ContactProvided(phone),
        ) => (
            S::AwaitingConfirmation {
                service_id,
                date,
                start,
                end,
                phone: Some(phone.clone()),
            },
            vec![Effect::PresentSummary {
                service_id,
                start,
                end,
                phone: Some(phone),
            }],
        ),

        (
            S::AwaitingContact {
                service_id,
                date,
                start,
                end,
            },
            E::ContactSkipped,
        ) => (
            S::AwaitingConfirmation {
                service_id,
                date,
                start,
                end,
                phone: None,
            },
            vec![Effect::PresentSummary {
                service_id,
                start,
                end,
                phone: None,
            }],
        ),

        (
            S::AwaitingConfirmation {
                service_id,
                date,
                start,
                end,
                phone,
            },
            E::ConfirmRequested,
        ) => (
            S::AwaitingConfirmation {
                service_id,
                date,
                start,
                end,
                phone: phone.clone(),
            },
            vec![Effect::ExecuteBooking {
                service_id,
                start,
                end,
                phone,
            }],
        ),

        (S::AwaitingConfirmation { .. }, E::BookingSucceeded(appointment_id)) => {
            (S::Confirmed { appointment_id }, Vec::new())
        }

        (
            S::AwaitingConfirmation {
                service_id, date, ..
            },
            E::BookingFailed {
                reason,
                recoverable: true,
            },
        ) => (
            S::SelectingTime { service_id, date },
            vec![
                Effect::NotifyRejection {
                    reason: reason.clone(),
                },
                Effect::PresentSlots { service_id, date },
            ],
        ),

        (
            S::AwaitingConfirmation { .. },
            E::BookingFailed {
                reason,
                recoverable: false,
            },
        ) => (S::Rejected { reason }, Vec::new()),

        (state, _) => (state, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> ServiceId {
        ServiceId(3)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
    }

    fn slot() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2030, 1, 7, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 1, 7, 11, 0, 0).unwrap(),
        )
    }

    fn awaiting_confirmation() -> BookingState {
        let (start, end) = slot();
        BookingState::AwaitingConfirmation {
            service_id: service(),
            date: date(),
            start,
            end,
            phone: None,
        }
    }

    #[test]
    fn test_happy_path_reaches_confirmed() {
        let (start, end) = slot();

        let (state, effects) = transition(
            BookingState::SelectingService,
            BookingEvent::ServiceChosen(service()),
        );
        assert_eq!(effects, vec![Effect::PresentDates { service_id: service() }]);

        let (state, _) = transition(state, BookingEvent::DateChosen(date()));
        let (state, effects) = transition(state, BookingEvent::TimeChosen { start, end });
        assert_eq!(effects, vec![Effect::RequestContact]);

        let (state, _) = transition(state, BookingEvent::ContactSkipped);
        let (state, effects) = transition(state, BookingEvent::ConfirmRequested);
        assert_eq!(
            effects,
            vec![Effect::ExecuteBooking {
                service_id: service(),
                start,
                end,
                phone: None,
            }]
        );

        let (state, effects) =
            transition(state, BookingEvent::BookingSucceeded(AppointmentId(17)));
        assert_eq!(
            state,
            BookingState::Confirmed {
                appointment_id: AppointmentId(17)
            }
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_recoverable_failure_returns_to_time_selection() {
        let (state, effects) = transition(
            awaiting_confirmation(),
            BookingEvent::BookingFailed {
                reason: "that time was just taken".to_string(),
                recoverable: true,
            },
        );
        assert_eq!(
            state,
            BookingState::SelectingTime {
                service_id: service(),
                date: date(),
            }
        );
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[1], Effect::PresentSlots { .. }));
    }

    #[test]
    fn test_fatal_failure_is_terminal() {
        let (state, effects) = transition(
            awaiting_confirmation(),
            BookingEvent::BookingFailed {
                reason: "store write failed".to_string(),
                recoverable: false,
            },
        );
        assert!(matches!(state, BookingState::Rejected { .. }));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_unexpected_event_is_ignored() {
        let (state, effects) = transition(
            BookingState::SelectingService,
            BookingEvent::DateChosen(date()),
        );
        assert_eq!(state, BookingState::SelectingService);
        assert!(effects.is_empty());
    }

    // Dialog state is persisted per session between messages; it has to
    // survive a JSON round trip.
    #[test]
    fn test_state_survives_json_round_trip() {
        let state = awaiting_confirmation();
        let json = serde_json::to_string(&state).unwrap();
        let restored: BookingState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_contact_provided_is_kept() {
        let (start, end) = slot();
        let state = BookingState::AwaitingContact {
            service_id: service(),
            date: date(),
            start,
            end,
        };
        let (state, _) = transition(
            state,
            BookingEvent::ContactProvided("+7 900 000-00-00".to_string()),
        );
        match state {
            BookingState::AwaitingConfirmation { phone, .. } => {
                assert_eq!(phone.as_deref(), Some("+7 900 000-00-00"));
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
