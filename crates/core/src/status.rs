//! # Availability and Recency
//!
//! Derived state computed from slot snapshots: per-slot status, per-booking
//! recency and per-event availability. Everything here is pure and takes
//! `now` explicitly, so the same snapshot and the same `now` always give the
//! same answer.
//!
//! ## Precedence
//!
//! Slot status and event availability are both resolved in priority order,
//! first match wins:
//!
//! | slot                          | event                         |
//! |-------------------------------|-------------------------------|
//! | `Past` (ended before `now`)   | `Available` (any slot open)   |
//! | `Available` (spare capacity)  | `Full` (future slots, none open) |
//! | `Full`                        | `Unavailable` (all slots past)|
//!
//! A slot that ended is `Past` even when it is also full, or reports more
//! bookings than its capacity.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::{event::Event, time_slot::TimeSlot};

/// Bookings starting within this many hours are `Upcoming`.
pub const UPCOMING_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotStatus {
    Past,
    Available { remaining: u32 },
    Full,
}

impl SlotStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SlotStatus::Past => "Past",
            SlotStatus::Available { .. } => "Available",
            SlotStatus::Full => "Full",
        }
    }

    /// Remaining capacity. Only defined for available slots.
    pub fn remaining(&self) -> Option<u32> {
        match self {
            SlotStatus::Available { remaining } => Some(*remaining),
            _ => None,
        }
    }

    pub fn is_bookable(&self) -> bool {
        matches!(self, SlotStatus::Available { .. })
    }

    pub fn is_past(&self) -> bool {
        matches!(self, SlotStatus::Past)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a slot as past, available or full at `now`.
///
/// # Returns
///
/// * `SlotStatus::Past` - the slot ended strictly before `now`
/// * `SlotStatus::Available` - spare capacity, with the number of spots left
/// * `SlotStatus::Full` - no capacity, including counts above the maximum
///
/// # Example
///
/// ```
/// use bookit_core::models::time_slot::TimeSlot;
/// use bookit_core::status::{resolve_slot_status, SlotStatus};
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
///
/// let now = Utc::now();
/// let slot = TimeSlot {
///     id: Uuid::new_v4(),
///     event_id: None,
///     start_time: now + Duration::hours(1),
///     end_time: now + Duration::hours(2),
///     max_bookings: 2,
///     current_bookings: 1,
/// };
/// assert_eq!(resolve_slot_status(&slot, now), SlotStatus::Available { remaining: 1 });
/// ```
pub fn resolve_slot_status(slot: &TimeSlot, now: DateTime<Utc>) -> SlotStatus {
    if slot.end_time < now {
        return SlotStatus::Past;
    }

    if slot.current_bookings < slot.max_bookings {
        SlotStatus::Available {
            remaining: slot.max_bookings - slot.current_bookings,
        }
    } else {
        SlotStatus::Full
    }
}

/// `"1 of 2 spots booked"`.
pub fn occupancy_label(slot: &TimeSlot) -> String {
    format!(
        "{} of {} spots booked",
        slot.current_bookings, slot.max_bookings
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingRecency {
    Past,
    Upcoming,
    Future,
}

impl BookingRecency {
    pub fn label(&self) -> &'static str {
        match self {
            BookingRecency::Past => "Past",
            BookingRecency::Upcoming => "Upcoming",
            BookingRecency::Future => "Future",
        }
    }
}

impl fmt::Display for BookingRecency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a booking by its slot's start time.
///
/// A booking is past once its slot has started, unlike [`resolve_slot_status`]
/// which waits for the slot to end. Starting exactly
/// [`UPCOMING_WINDOW_HOURS`] from `now` is `Future`.
pub fn classify_booking(slot_start: DateTime<Utc>, now: DateTime<Utc>) -> BookingRecency {
    if slot_start < now {
        BookingRecency::Past
    } else if slot_start - now < Duration::hours(UPCOMING_WINDOW_HOURS) {
        BookingRecency::Upcoming
    } else {
        BookingRecency::Future
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAvailability {
    Available,
    Full,
    Unavailable,
}

impl EventAvailability {
    pub fn label(&self) -> &'static str {
        match self {
            EventAvailability::Available => "Available",
            EventAvailability::Full => "Full",
            EventAvailability::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for EventAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    /// Slots that have not ended.
    pub future_slot_count: usize,
    /// Future slots with spare capacity.
    pub available_slot_count: usize,
    pub total_slot_count: usize,
    pub availability: EventAvailability,
    pub is_fully_booked: bool,
}

/// Count future and open slots and derive the event's availability.
///
/// Past slots count toward `total_slot_count` only. An empty slot list is
/// `Unavailable`.
pub fn summarize_slots(slots: &[TimeSlot], now: DateTime<Utc>) -> EventSummary {
    let mut future_slot_count = 0;
    let mut available_slot_count = 0;

    for status in slots.iter().map(|slot| resolve_slot_status(slot, now)) {
        if status.is_past() {
            continue;
        }
        future_slot_count += 1;
        if status.is_bookable() {
            available_slot_count += 1;
        }
    }

    let availability = if available_slot_count > 0 {
        EventAvailability::Available
    } else if future_slot_count > 0 {
        EventAvailability::Full
    } else {
        EventAvailability::Unavailable
    };

    EventSummary {
        future_slot_count,
        available_slot_count,
        total_slot_count: slots.len(),
        availability,
        is_fully_booked: availability == EventAvailability::Full,
    }
}

pub fn summarize_event(event: &Event, now: DateTime<Utc>) -> EventSummary {
    summarize_slots(&event.time_slots, now)
}
