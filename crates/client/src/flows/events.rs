use bookit_core::{
    errors::BookingError,
    models::{
        booking::{BookingConfirmation, CreateBookingRequest},
        event::{CreateEventRequest, Event, NewEvent},
        time_slot::{NewTimeSlot, TimeSlot},
    },
    status::{occupancy_label, resolve_slot_status, summarize_event, EventSummary, SlotStatus},
    validation::{validate_new_slot, NO_TIME_SLOTS},
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::Alert;
use crate::api::BookingApi;

/// How long a missing event stays on screen before going back to the list.
pub const NOT_FOUND_REDIRECT_DELAY: Duration = Duration::from_secs(2);
/// How long the "created" confirmation shows before the new event opens.
pub const CREATED_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// One entry on the event board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
    pub summary: EventSummary,
}

/// The list of all events with their availability.
#[derive(Debug, Default)]
pub struct EventBoard {
    pub events: Vec<Event>,
    pub error: Option<String>,
    pub alert: Option<Alert>,
}

impl EventBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<A: BookingApi + ?Sized>(&mut self, api: &A) {
        self.error = None;

        match api.list_events_with_slots().await {
            Ok(events) => {
                info!(count = events.len(), "Loaded events");
                self.events = events;
            }
            Err(e) => {
                error!("Error fetching events: {}", e);
                self.error = Some(e.message());
                self.alert = Some(Alert::error("Failed to load events. Please try again."));
            }
        }
    }

    pub fn cards(&self, now: DateTime<Utc>) -> Vec<EventCard> {
        self.events
            .iter()
            .map(|event| EventCard {
                id: event.id,
                title: event.title.clone(),
                description: event.description.clone(),
                creator_name: event.creator_name.clone(),
                created_at: event.created_at,
                summary: summarize_event(event, now),
            })
            .collect()
    }
}

/// Attendee details and slot choice for a pending booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub attendee_name: String,
    pub attendee_email: String,
    pub time_slot_id: Option<Uuid>,
}

/// One slot on the event detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRow {
    pub slot: TimeSlot,
    pub status: SlotStatus,
    pub occupancy: String,
    pub selected: bool,
}

/// A single event, its slots and the booking form.
#[derive(Debug)]
pub struct EventDetail {
    pub event_id: Uuid,
    pub event: Option<Event>,
    pub draft: BookingDraft,
    pub alert: Option<Alert>,
    /// Set when the event can't be loaded; the caller goes back to the
    /// board after [`NOT_FOUND_REDIRECT_DELAY`].
    pub redirect_home: bool,
}

impl EventDetail {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            event: None,
            draft: BookingDraft::default(),
            alert: None,
            redirect_home: false,
        }
    }

    /// Fetch the event. On failure the alert is raised and
    /// [`EventDetail::redirect_home`] is set.
    pub async fn load<A: BookingApi + ?Sized>(&mut self, api: &A) {
        match api.get_event(self.event_id).await {
            Ok(event) => {
                self.event = Some(event);
                self.redirect_home = false;
            }
            Err(e) => {
                error!("Error fetching event {}: {}", self.event_id, e);
                self.alert = Some(Alert::error("Event not found"));
                self.redirect_home = true;
            }
        }
    }

    pub fn slot_rows(&self, now: DateTime<Utc>) -> Vec<SlotRow> {
        let Some(event) = &self.event else {
            return Vec::new();
        };

        event
            .time_slots
            .iter()
            .map(|slot| SlotRow {
                slot: slot.clone(),
                status: resolve_slot_status(slot, now),
                occupancy: occupancy_label(slot),
                selected: self.draft.time_slot_id == Some(slot.id),
            })
            .collect()
    }

    /// Pick the slot to book.
    ///
    /// # Returns
    ///
    /// * `true` if the slot exists and is [`SlotStatus::Available`] at `now`
    /// * `false` otherwise, with an error alert naming the reason; the
    ///   previous selection is kept
    pub fn select_slot(&mut self, slot_id: Uuid, now: DateTime<Utc>) -> bool {
        let status = self
            .event
            .as_ref()
            .and_then(|event| event.slot(slot_id))
            .map(|slot| resolve_slot_status(slot, now));

        match status {
            Some(status) if status.is_bookable() => {
                self.draft.time_slot_id = Some(slot_id);
                true
            }
            Some(status) => {
                self.alert = Some(Alert::error(format!(
                    "This time slot can't be booked ({})",
                    status.label().to_lowercase()
                )));
                false
            }
            None => {
                self.alert = Some(Alert::error("Time slot not found"));
                false
            }
        }
    }

    pub fn set_attendee(&mut self, name: &str, email: &str) {
        self.draft.attendee_name = name.to_string();
        self.draft.attendee_email = email.to_string();
    }

    /// Submit the draft.
    ///
    /// On success the form is reset and the event is fetched again so counts
    /// reflect the new booking. A refusal leaves the draft untouched so the
    /// attendee can pick another slot.
    ///
    /// # Returns
    ///
    /// * `true` if the backend accepted the booking
    /// * `false` if the draft was incomplete, or the backend refused or failed;
    ///   [`EventDetail::alert`] says why
    pub async fn submit<A: BookingApi + ?Sized>(&mut self, api: &A) -> bool {
        let draft = &self.draft;
        let (Some(time_slot_id), false, false) = (
            draft.time_slot_id,
            draft.attendee_name.trim().is_empty(),
            draft.attendee_email.trim().is_empty(),
        ) else {
            self.alert = Some(Alert::error(
                "Please fill in all fields and select a time slot",
            ));
            return false;
        };

        let request = CreateBookingRequest {
            attendee_name: draft.attendee_name.trim().to_string(),
            attendee_email: draft.attendee_email.trim().to_string(),
            time_slot_id,
            event_id: self.event_id,
        };

        let result = api
            .create_booking(&request)
            .await
            .and_then(BookingConfirmation::into_result);

        match result {
            Ok(confirmation) => {
                info!(slot = %time_slot_id, "Booking created: {}", confirmation.message);
                self.alert = Some(Alert::success("Booking successful!"));
                self.draft = BookingDraft::default();
                self.load(api).await;
                true
            }
            Err(BookingError::AlreadyBooked(msg)) => {
                warn!(slot = %time_slot_id, "Booking refused: {}", msg);
                self.alert = Some(Alert::error("You have already booked this time slot."));
                false
            }
            Err(e) => {
                error!("Booking error: {}", e);
                self.alert = Some(Alert::error(format!("Booking failed: {}", e.message())));
                false
            }
        }
    }
}

/// The create-event form.
#[derive(Debug, Default)]
pub struct EventDraft {
    pub event: NewEvent,
    pub time_slots: Vec<NewTimeSlot>,
    pub alert: Option<Alert>,
    /// The created event, once the backend accepted it.
    pub created: Option<Event>,
}

impl EventDraft {
    pub fn new(event: NewEvent) -> Self {
        Self {
            event,
            ..Self::default()
        }
    }

    /// Validate and append a slot.
    ///
    /// # Returns
    ///
    /// * `true` if the slot was added
    /// * `false` if validation failed; the alert carries the validation message
    pub fn add_slot(
        &mut self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        max_bookings: u32,
    ) -> bool {
        match validate_new_slot(start_time, end_time, max_bookings) {
            Ok(slot) => {
                self.time_slots.push(slot);
                self.alert = Some(Alert::success("Time slot added successfully!"));
                true
            }
            Err(e) => {
                self.alert = Some(Alert::error(e.message()));
                false
            }
        }
    }

    pub fn remove_slot(&mut self, index: usize) -> Option<NewTimeSlot> {
        if index >= self.time_slots.len() {
            return None;
        }
        self.alert = Some(Alert::success("Time slot removed"));
        Some(self.time_slots.remove(index))
    }

    /// Send the event and its slots. Nothing is sent without at least one slot.
    ///
    /// On success [`EventDraft::created`] holds the stored event; callers open
    /// it after [`CREATED_REDIRECT_DELAY`].
    pub async fn submit<A: BookingApi + ?Sized>(&mut self, api: &A) -> bool {
        if self.time_slots.is_empty() {
            self.alert = Some(Alert::error(NO_TIME_SLOTS));
            return false;
        }

        let request = CreateEventRequest {
            event: self.event.clone(),
            time_slots: self.time_slots.clone(),
        };

        match api.create_event(&request).await {
            Ok(event) => {
                info!(id = %event.id, "Event created");
                self.alert = Some(Alert::success("Event created successfully!"));
                self.created = Some(event);
                true
            }
            Err(e) => {
                error!("Error creating event: {}", e);
                self.alert = Some(Alert::error(format!(
                    "Error creating event: {}",
                    e.message()
                )));
                false
            }
        }
    }
}
