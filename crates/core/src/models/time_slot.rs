use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable interval with a capacity, as the backend reports it.
///
/// `start_time < end_time` and `current_bookings <= max_bookings` are kept by
/// the backend and are not re-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(with = "super::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub end_time: DateTime<Utc>,
    pub max_bookings: u32,
    #[serde(default, deserialize_with = "super::null_as_zero")]
    pub current_bookings: u32,
}

/// A slot submitted as part of event creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeSlot {
    #[serde(with = "super::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub end_time: DateTime<Utc>,
    pub max_bookings: u32,
}
