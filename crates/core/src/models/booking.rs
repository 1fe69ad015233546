use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::status::{BookingRecency, classify_booking};

/// A reservation as returned by `GET /bookings/user/{email}`.
///
/// The event and slot are embedded by value under the backend's table names
/// (`events`, `time_slots`). Either may be missing when the referenced row
/// has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_id: Uuid,
    pub time_slot_id: Uuid,
    pub attendee_name: String,
    pub attendee_email: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "events", default)]
    pub event: Option<BookedEvent>,
    #[serde(rename = "time_slots", default)]
    pub slot: Option<BookedSlot>,
}

impl Booking {
    /// Recency of the booked slot, or `None` when the slot is missing.
    pub fn recency(&self, now: DateTime<Utc>) -> Option<BookingRecency> {
        self.slot
            .as_ref()
            .map(|slot| classify_booking(slot.start_time, now))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedEvent {
    pub title: String,
    pub creator_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    #[serde(with = "super::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub end_time: DateTime<Utc>,
}

/// Body of `POST /bookings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub attendee_name: String,
    pub attendee_email: String,
    pub time_slot_id: Uuid,
    pub event_id: Uuid,
}

/// Response of `POST /bookings/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub booking: Option<BookingDetails>,
}

impl BookingConfirmation {
    /// Turn a refusal reported in the response body into an error.
    ///
    /// The backend answers `success: false` with a 2xx status when the slot
    /// is gone, full, or already booked by the same attendee.
    ///
    /// # Errors
    ///
    /// * `BookingError::AlreadyBooked` - the attendee already holds this slot
    /// * `BookingError::NotFound` - the slot no longer exists
    /// * `BookingError::Rejected` - any other refusal, e.g. a full slot
    pub fn into_result(self) -> BookingResult<Self> {
        if self.success {
            return Ok(self);
        }

        let lowered = self.message.to_lowercase();
        if lowered.contains("already booked") {
            Err(BookingError::AlreadyBooked(self.message))
        } else if lowered.contains("not found") {
            Err(BookingError::NotFound(self.message))
        } else {
            Err(BookingError::Rejected(self.message))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub id: Uuid,
    pub event_id: Uuid,
    pub time_slot_id: Uuid,
    pub attendee_name: String,
    pub attendee_email: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default, with = "super::timestamp::option")]
    pub slot_start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "super::timestamp::option")]
    pub slot_end_time: Option<DateTime<Utc>>,
}
