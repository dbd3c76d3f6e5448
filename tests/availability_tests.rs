//! Availability resolution and slot generation against a seeded store.

mod support;

use std::sync::Arc;

use chrono::Weekday;

use slotbook::models::{AppointmentStatus, ClientId, DateOverride, MasterId, RecurringRule};
use slotbook::{BookingConfig, BookingError, LocalRepository, ScheduleRepository, SlotGenerator};

use support::{at, monday, t};

fn generator(repo: &Arc<LocalRepository>) -> SlotGenerator {
    SlotGenerator::new(Arc::clone(repo) as _, &BookingConfig::default())
}

#[tokio::test]
async fn test_recurring_rule_drives_slot_generation() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(18, 0)).unwrap(),
    )
    .await
    .unwrap();

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();

    // 09:00 through 17:00 inclusive, every 30 minutes.
    assert_eq!(slots.len(), 17);
    assert_eq!(slots[0], at(monday(), 9, 0));
    assert_eq!(*slots.last().unwrap(), at(monday(), 17, 0));
}

#[tokio::test]
async fn test_day_off_override_yields_empty_list() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(18, 0)).unwrap(),
    )
    .await
    .unwrap();
    repo.set_date_override(DateOverride::day_off(master_id, monday()))
        .await
        .unwrap();

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_custom_hours_override_beats_recurring_rule() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(18, 0)).unwrap(),
    )
    .await
    .unwrap();
    repo.set_date_override(
        DateOverride::working_hours(master_id, monday(), t(12, 0), t(15, 0)).unwrap(),
    )
    .await
    .unwrap();

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();

    // 12:00, 12:30, 13:00, 13:30, 14:00.
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0], at(monday(), 12, 0));
    assert_eq!(*slots.last().unwrap(), at(monday(), 14, 0));
}

#[tokio::test]
async fn test_default_window_applies_without_schedule_records() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();

    // Default 08:00-22:00: starts 08:00 through 21:00.
    assert_eq!(slots.len(), 27);
    assert_eq!(slots[0], at(monday(), 8, 0));
    assert_eq!(*slots.last().unwrap(), at(monday(), 21, 0));
}

#[tokio::test]
async fn test_existing_booking_blocks_overlapping_candidates() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    let service_id = repo.add_service(master_id, "Haircut", 1500.0, 60);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(18, 0)).unwrap(),
    )
    .await
    .unwrap();
    repo.add_appointment(
        master_id,
        ClientId(1),
        service_id,
        at(monday(), 10, 0),
        at(monday(), 11, 0),
        AppointmentStatus::Confirmed,
    );

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();

    // 09:30, 10:00 and 10:30 would overlap the booking; a 09:00 start ends
    // exactly where the booking begins and an 11:00 start begins exactly
    // where it ends, so both stay available.
    assert!(slots.contains(&at(monday(), 9, 0)));
    assert!(!slots.contains(&at(monday(), 9, 30)));
    assert!(!slots.contains(&at(monday(), 10, 0)));
    assert!(!slots.contains(&at(monday(), 10, 30)));
    assert!(slots.contains(&at(monday(), 11, 0)));
    assert_eq!(slots.len(), 14);
}

#[tokio::test]
async fn test_cancelled_booking_does_not_block() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    let service_id = repo.add_service(master_id, "Haircut", 1500.0, 60);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(18, 0)).unwrap(),
    )
    .await
    .unwrap();
    repo.add_appointment(
        master_id,
        ClientId(1),
        service_id,
        at(monday(), 10, 0),
        at(monday(), 11, 0),
        AppointmentStatus::Cancelled,
    );

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();
    assert_eq!(slots.len(), 17);
    assert!(slots.contains(&at(monday(), 10, 0)));
}

#[tokio::test]
async fn test_generation_is_deterministic() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    let service_id = repo.add_service(master_id, "Haircut", 1500.0, 60);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(18, 0)).unwrap(),
    )
    .await
    .unwrap();
    repo.add_appointment(
        master_id,
        ClientId(1),
        service_id,
        at(monday(), 12, 0),
        at(monday(), 13, 30),
        AppointmentStatus::Confirmed,
    );

    let generator = generator(&repo);
    let first = generator
        .generate_slots(master_id, monday(), 45, 15)
        .await
        .unwrap();
    let second = generator
        .generate_slots(master_id, monday(), 45, 15)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_window_shorter_than_service_yields_empty_list() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    repo.set_date_override(
        DateOverride::working_hours(master_id, monday(), t(10, 0), t(10, 30)).unwrap(),
    )
    .await
    .unwrap();

    let slots = generator(&repo)
        .generate_slots(master_id, monday(), 60, 30)
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_unknown_master_is_not_found() {
    let repo = Arc::new(LocalRepository::new());
    let result = generator(&repo)
        .generate_slots(MasterId(404), monday(), 60, 30)
        .await;
    assert!(matches!(result, Err(BookingError::NotFound(_))));
}

#[tokio::test]
async fn test_non_positive_duration_and_step_are_rejected() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    let generator = generator(&repo);

    let result = generator.generate_slots(master_id, monday(), 0, 30).await;
    assert!(matches!(result, Err(BookingError::InvalidDuration(_))));

    let result = generator.generate_slots(master_id, monday(), 60, -15).await;
    assert!(matches!(result, Err(BookingError::InvalidDuration(_))));
}

#[tokio::test]
async fn test_slots_for_service_use_catalog_duration() {
    let repo = Arc::new(LocalRepository::new());
    let master_id = repo.add_master("Alice", 24);
    let service_id = repo.add_service(master_id, "Massage", 3000.0, 120);
    repo.set_recurring_rule(
        RecurringRule::new(master_id, Weekday::Mon, t(9, 0), t(12, 0)).unwrap(),
    )
    .await
    .unwrap();

    let slots = generator(&repo)
        .generate_slots_for_service(master_id, monday(), service_id)
        .await
        .unwrap();

    // A 120-minute service in a 09:00-12:00 window: 09:00, 09:30, 10:00.
    assert_eq!(
        slots,
        vec![at(monday(), 9, 0), at(monday(), 9, 30), at(monday(), 10, 0)]
    );
}
