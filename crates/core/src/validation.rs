use chrono::{DateTime, Utc};

use crate::errors::{BookingError, BookingResult};
use crate::models::{event::CreateEventRequest, time_slot::NewTimeSlot};

pub const MISSING_SLOT_TIMES: &str = "Please fill in both start and end times";
pub const END_BEFORE_START: &str = "End time must be after start time";
pub const NO_TIME_SLOTS: &str = "Please add at least one time slot";
pub const ZERO_CAPACITY: &str = "Max bookings must be at least 1";

/// Build a slot from draft input, checking presence and ordering.
pub fn validate_new_slot(
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    max_bookings: u32,
) -> BookingResult<NewTimeSlot> {
    let (Some(start_time), Some(end_time)) = (start_time, end_time) else {
        return Err(BookingError::Validation(MISSING_SLOT_TIMES.to_string()));
    };

    let slot = NewTimeSlot {
        start_time,
        end_time,
        max_bookings,
    };
    check_slot(&slot)?;
    Ok(slot)
}

fn check_slot(slot: &NewTimeSlot) -> BookingResult<()> {
    if slot.start_time >= slot.end_time {
        return Err(BookingError::Validation(END_BEFORE_START.to_string()));
    }
    if slot.max_bookings == 0 {
        return Err(BookingError::Validation(ZERO_CAPACITY.to_string()));
    }
    Ok(())
}

/// Pre-condition for `POST /events/`.
pub fn validate_create_event(request: &CreateEventRequest) -> BookingResult<()> {
    if request.time_slots.is_empty() {
        return Err(BookingError::Validation(NO_TIME_SLOTS.to_string()));
    }
    request.time_slots.iter().try_for_each(check_slot)
}
