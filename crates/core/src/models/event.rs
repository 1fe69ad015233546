use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::{NewTimeSlot, TimeSlot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub creator_name: String,
    pub creator_email: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "super::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Empty when fetched from the plain `/events/` listing.
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Event {
    pub fn slot(&self, slot_id: Uuid) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.id == slot_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub creator_name: String,
    pub creator_email: String,
}

/// Body of `POST /events/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub event: NewEvent,
    pub time_slots: Vec<NewTimeSlot>,
}
