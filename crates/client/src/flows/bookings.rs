use bookit_core::{
    models::booking::{BookedEvent, BookedSlot, Booking},
    status::BookingRecency,
};
use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::Alert;
use crate::api::BookingApi;

/// A booking with everything needed to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEntry {
    pub booking: Booking,
    pub event: BookedEvent,
    pub slot: BookedSlot,
    pub recency: BookingRecency,
}

/// "My bookings": search by attendee email.
#[derive(Debug, Default)]
pub struct BookingsLookup {
    pub email: String,
    /// `None` until a search succeeds.
    pub bookings: Option<Vec<Booking>>,
    pub error: Option<String>,
    pub alert: Option<Alert>,
}

impl BookingsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search. Results of any earlier search are dropped first.
    pub async fn search<A: BookingApi + ?Sized>(&mut self, api: &A, email: &str) {
        if email.trim().is_empty() {
            self.alert = Some(Alert::error("Please enter an email address"));
            return;
        }

        self.email = email.trim().to_string();
        self.error = None;
        self.bookings = None;
        self.alert = None;

        match api.bookings_for_email(&self.email).await {
            Ok(bookings) => {
                info!(count = bookings.len(), "Fetched bookings");
                if bookings.is_empty() {
                    self.alert = Some(Alert::info("No bookings found for this email address"));
                }
                self.bookings = Some(bookings);
            }
            Err(e) => {
                error!("Error fetching bookings: {}", e);
                self.error = Some(e.message());
                self.alert = Some(Alert::error("Failed to fetch bookings. Please try again."));
            }
        }
    }

    /// Clear results and errors so a new search can start.
    pub fn reset(&mut self) {
        self.bookings = None;
        self.error = None;
    }

    /// Bookings with their recency. Bookings whose event or slot is missing
    /// are left out.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<BookingEntry> {
        self.bookings
            .iter()
            .flatten()
            .filter_map(|booking| {
                let event = booking.event.clone()?;
                let slot = booking.slot.clone()?;
                let recency = booking.recency(now)?;
                Some(BookingEntry {
                    booking: booking.clone(),
                    event,
                    slot,
                    recency,
                })
            })
            .collect()
    }
}
