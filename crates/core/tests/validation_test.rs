use bookit_core::errors::BookingError;
use bookit_core::models::{
    event::{CreateEventRequest, NewEvent},
    time_slot::NewTimeSlot,
};
use bookit_core::time::parse_timestamp;
use bookit_core::validation::{
    validate_create_event, validate_new_slot, END_BEFORE_START, MISSING_SLOT_TIMES,
    NO_TIME_SLOTS, ZERO_CAPACITY,
};
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn start() -> DateTime<Utc> {
    parse_timestamp("2026-10-20T10:00:00Z").expect("valid timestamp")
}

fn validation_message(error: BookingError) -> String {
    match error {
        BookingError::Validation(message) => message,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn request(time_slots: Vec<NewTimeSlot>) -> CreateEventRequest {
    CreateEventRequest {
        event: NewEvent {
            title: "Office Hours".to_string(),
            description: "Drop-in questions".to_string(),
            creator_name: "Sam".to_string(),
            creator_email: "sam@example.com".to_string(),
        },
        time_slots,
    }
}

#[test]
fn test_valid_slot() {
    let slot = validate_new_slot(Some(start()), Some(start() + Duration::hours(1)), 3)
        .expect("slot should be valid");

    assert_eq!(slot.start_time, start());
    assert_eq!(slot.max_bookings, 3);
}

#[rstest]
#[case(None, Some(start()))]
#[case(Some(start()), None)]
#[case(None, None)]
fn test_missing_times(
    #[case] start_time: Option<DateTime<Utc>>,
    #[case] end_time: Option<DateTime<Utc>>,
) {
    let error = validate_new_slot(start_time, end_time, 1).unwrap_err();
    assert_eq!(validation_message(error), MISSING_SLOT_TIMES);
}

#[rstest]
#[case(Duration::zero())]
#[case(-Duration::minutes(15))]
fn test_end_must_follow_start(#[case] length: Duration) {
    let error = validate_new_slot(Some(start()), Some(start() + length), 1).unwrap_err();
    assert_eq!(validation_message(error), END_BEFORE_START);
}

#[test]
fn test_zero_capacity_rejected() {
    let error = validate_new_slot(Some(start()), Some(start() + Duration::hours(1)), 0).unwrap_err();
    assert_eq!(validation_message(error), ZERO_CAPACITY);
}

#[test]
fn test_create_event_needs_a_slot() {
    let error = validate_create_event(&request(vec![])).unwrap_err();
    assert_eq!(validation_message(error), NO_TIME_SLOTS);
}

#[test]
fn test_create_event_rechecks_slot_order() {
    let backwards = NewTimeSlot {
        start_time: start(),
        end_time: start() - Duration::hours(1),
        max_bookings: 2,
    };

    let error = validate_create_event(&request(vec![backwards])).unwrap_err();
    assert_eq!(validation_message(error), END_BEFORE_START);
}

#[test]
fn test_create_event_accepts_valid_slots() {
    let slot = NewTimeSlot {
        start_time: start(),
        end_time: start() + Duration::hours(1),
        max_bookings: 2,
    };

    assert!(validate_create_event(&request(vec![slot])).is_ok());
}
