//! Terminal commands: argument parsing, execution against the backend and
//! plain-text rendering of each screen.

use bookit_core::{
    models::event::NewEvent,
    status::SlotStatus,
    time::{format_date_utc, format_time_utc, parse_in_timezone, timezone_abbreviation},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eyre::{eyre, Result};
use uuid::Uuid;

use crate::api::BookingApi;
use crate::flows::{
    bookings::{BookingEntry, BookingsLookup},
    events::{
        EventBoard, EventCard, EventDetail, EventDraft, SlotRow, CREATED_REDIRECT_DELAY,
        NOT_FOUND_REDIRECT_DELAY,
    },
    Alert, AlertKind,
};

pub const USAGE: &str = "\
Usage: bookit <command> [args]

Commands:
  health                                   Check that the backend is up
  events                                   List events and their availability
  event <event-id>                         Show an event and its time slots
  book <event-id> <slot-id> <name> <email> Book a time slot
  bookings <email>                         List bookings made with an email
  cancel <booking-id> <email>              Cancel a booking
  create <title> <description> <creator-name> <creator-email> <start>/<end>[/<max>]...
                                           Create an event with time slots";

/// Raw slot input for `create`, parsed against the display timezone later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub start: String,
    pub end: String,
    pub max_bookings: u32,
}

impl SlotSpec {
    /// `START/END` or `START/END/MAX`; capacity defaults to 1.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut parts = spec.split('/');
        let start = parts.next().unwrap_or_default().to_string();
        let end = parts.next().unwrap_or_default().to_string();
        let max_bookings = match parts.next() {
            Some(max) => max
                .parse()
                .map_err(|_| eyre!("Invalid max bookings {max:?} in slot {spec:?}"))?,
            None => 1,
        };
        if parts.next().is_some() {
            return Err(eyre!("Too many parts in slot {spec:?}"));
        }

        Ok(Self {
            start,
            end,
            max_bookings,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Health,
    Events,
    Event {
        id: Uuid,
    },
    Book {
        event_id: Uuid,
        slot_id: Uuid,
        name: String,
        email: String,
    },
    Bookings {
        email: String,
    },
    Cancel {
        booking_id: Uuid,
        email: String,
    },
    Create {
        event: NewEvent,
        slots: Vec<SlotSpec>,
    },
}

fn next_arg(args: &mut impl Iterator<Item = String>, name: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| eyre!("Missing argument <{name}>\n\n{USAGE}"))
}

fn next_id(args: &mut impl Iterator<Item = String>, name: &str) -> Result<Uuid> {
    let raw = next_arg(args, name)?;
    Uuid::parse_str(&raw).map_err(|_| eyre!("<{name}> must be a UUID, got {raw:?}"))
}

impl Command {
    /// Parse from process arguments. The first item is the program name.
    pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Command> {
        args.next();

        let command = next_arg(&mut args, "command")?;

        match command.as_str() {
            "health" => Ok(Command::Health),
            "events" => Ok(Command::Events),
            "event" => Ok(Command::Event {
                id: next_id(&mut args, "event-id")?,
            }),
            "book" => Ok(Command::Book {
                event_id: next_id(&mut args, "event-id")?,
                slot_id: next_id(&mut args, "slot-id")?,
                name: next_arg(&mut args, "name")?,
                email: next_arg(&mut args, "email")?,
            }),
            "bookings" => Ok(Command::Bookings {
                email: next_arg(&mut args, "email")?,
            }),
            "cancel" => Ok(Command::Cancel {
                booking_id: next_id(&mut args, "booking-id")?,
                email: next_arg(&mut args, "email")?,
            }),
            "create" => {
                let event = NewEvent {
                    title: next_arg(&mut args, "title")?,
                    description: next_arg(&mut args, "description")?,
                    creator_name: next_arg(&mut args, "creator-name")?,
                    creator_email: next_arg(&mut args, "creator-email")?,
                };
                let slots = args
                    .map(|spec| SlotSpec::parse(&spec))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Command::Create { event, slots })
            }
            other => Err(eyre!("Unknown command {other:?}\n\n{USAGE}")),
        }
    }
}

/// Turn an error alert left by a flow into a command failure.
fn fail_on_error(alert: &Option<Alert>) -> Result<()> {
    match alert {
        Some(alert) if alert.kind == AlertKind::Error => Err(eyre!("{}", alert.message)),
        _ => Ok(()),
    }
}

/// Run `command` and return what should be printed.
pub async fn execute<A: BookingApi + ?Sized>(
    api: &A,
    timezone: &Tz,
    command: Command,
    now: DateTime<Utc>,
) -> Result<String> {
    match command {
        Command::Health => {
            let status = api.health().await?;
            Ok(format!("Backend is up: {status}"))
        }
        Command::Events => {
            let mut board = EventBoard::new();
            board.load(api).await;
            if let Some(error) = &board.error {
                return Err(eyre!("Failed to load events: {error}"));
            }
            Ok(render_board(&board.cards(now), timezone))
        }
        Command::Event { id } => {
            let mut detail = EventDetail::new(id);
            detail.load(api).await;
            if detail.redirect_home {
                tokio::time::sleep(NOT_FOUND_REDIRECT_DELAY).await;
                let mut board = EventBoard::new();
                board.load(api).await;
                return Ok(format!(
                    "{}\n\n{}",
                    detail.alert.as_ref().map(ToString::to_string).unwrap_or_default(),
                    render_board(&board.cards(now), timezone)
                ));
            }
            Ok(render_detail(&detail, now, timezone))
        }
        Command::Book {
            event_id,
            slot_id,
            name,
            email,
        } => {
            let mut detail = EventDetail::new(event_id);
            detail.load(api).await;
            fail_on_error(&detail.alert)?;

            detail.set_attendee(&name, &email);
            if !detail.select_slot(slot_id, now) {
                fail_on_error(&detail.alert)?;
            }
            detail.submit(api).await;
            fail_on_error(&detail.alert)?;

            Ok(render_detail(&detail, now, timezone))
        }
        Command::Bookings { email } => {
            let mut lookup = BookingsLookup::new();
            lookup.search(api, &email).await;
            fail_on_error(&lookup.alert)?;
            Ok(render_bookings(&lookup, now, timezone))
        }
        Command::Cancel { booking_id, email } => {
            api.cancel_booking(booking_id, &email).await?;
            Ok(format!("Booking {booking_id} cancelled"))
        }
        Command::Create { event, slots } => {
            let mut draft = EventDraft::new(event);
            for spec in &slots {
                let start = parse_in_timezone(&spec.start, timezone);
                let end = parse_in_timezone(&spec.end, timezone);
                if !draft.add_slot(start, end, spec.max_bookings) {
                    fail_on_error(&draft.alert)?;
                }
            }
            draft.submit(api).await;
            fail_on_error(&draft.alert)?;

            let created = draft
                .created
                .as_ref()
                .ok_or_else(|| eyre!("Backend returned no event"))?;
            let confirmation = draft.alert.as_ref().map(ToString::to_string).unwrap_or_default();

            tokio::time::sleep(CREATED_REDIRECT_DELAY).await;
            let mut detail = EventDetail::new(created.id);
            detail.load(api).await;
            if detail.redirect_home {
                // Created but not readable back.
                return Ok(format!("{confirmation}\nEvent id: {}", created.id));
            }
            Ok(format!(
                "{confirmation}\n\n{}",
                render_detail(&detail, now, timezone)
            ))
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

pub fn render_board(cards: &[EventCard], timezone: &Tz) -> String {
    if cards.is_empty() {
        return String::from("No events yet. Create one with `bookit create`.");
    }

    let mut out = String::new();
    for card in cards {
        out.push_str(&format!("{}  [{}]\n", card.title, card.summary.availability));
        out.push_str(&format!(
            "  Created by {} on {}\n",
            card.creator_name,
            format_date_utc(&card.created_at, timezone)
        ));
        out.push_str(&format!("  {}\n", card.description));
        out.push_str(&format!(
            "  {} available, {} total\n",
            plural(card.summary.available_slot_count, "slot"),
            plural(card.summary.total_slot_count, "slot")
        ));
        out.push_str(&format!("  id: {}\n\n", card.id));
    }
    out.trim_end().to_string()
}

pub fn render_slot_row(row: &SlotRow, timezone: &Tz) -> String {
    let marker = if row.selected { "*" } else { " " };
    let capacity = match row.status {
        SlotStatus::Past => String::from("This time slot has passed"),
        SlotStatus::Available { remaining } => {
            format!("{}, {} left", row.occupancy, remaining)
        }
        SlotStatus::Full => row.occupancy.clone(),
    };

    format!(
        "{} [{}] {} {} - {}  ({})  slot: {}",
        marker,
        row.status,
        format_date_utc(&row.slot.start_time, timezone),
        format_time_utc(&row.slot.start_time, timezone),
        format_time_utc(&row.slot.end_time, timezone),
        capacity,
        row.slot.id
    )
}

pub fn render_detail(detail: &EventDetail, now: DateTime<Utc>, timezone: &Tz) -> String {
    let mut out = String::new();
    if let Some(alert) = &detail.alert {
        out.push_str(&format!("{alert}\n\n"));
    }

    let Some(event) = &detail.event else {
        return out.trim_end().to_string();
    };

    out.push_str(&format!("{}\n", event.title));
    out.push_str(&format!(
        "Created by {} <{}>\n",
        event.creator_name, event.creator_email
    ));
    out.push_str(&format!("{}\n\n", event.description));
    out.push_str(&format!(
        "Time slots ({}):\n",
        timezone_abbreviation(timezone, now)
    ));

    let rows = detail.slot_rows(now);
    if rows.is_empty() {
        out.push_str("  No time slots available for this event.\n");
    }
    for row in &rows {
        out.push_str(&render_slot_row(row, timezone));
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn render_booking_entry(entry: &BookingEntry, timezone: &Tz) -> String {
    let mut out = format!("{}  [{}]\n", entry.event.title, entry.recency);
    out.push_str(&format!(
        "  {} {} - {}\n",
        format_date_utc(&entry.slot.start_time, timezone),
        format_time_utc(&entry.slot.start_time, timezone),
        format_time_utc(&entry.slot.end_time, timezone)
    ));
    out.push_str(&format!("  Organizer: {}\n", entry.event.creator_name));
    if let Some(description) = &entry.event.description {
        out.push_str(&format!("  {description}\n"));
    }
    out.push_str(&format!(
        "  Booked as {} <{}> on {}\n",
        entry.booking.attendee_name,
        entry.booking.attendee_email,
        format_date_utc(&entry.booking.created_at, timezone)
    ));
    out.push_str(&format!("  Booking id: {}", entry.booking.id));
    out
}

pub fn render_bookings(lookup: &BookingsLookup, now: DateTime<Utc>, timezone: &Tz) -> String {
    let entries = lookup.entries(now);
    if entries.is_empty() {
        return match &lookup.alert {
            Some(alert) => alert.to_string(),
            None => String::from("No bookings found"),
        };
    }

    let mut out = format!(
        "Bookings for {} ({} found)\n\n",
        lookup.email,
        entries.len()
    );
    let rendered: Vec<String> = entries
        .iter()
        .map(|entry| render_booking_entry(entry, timezone))
        .collect();
    out.push_str(&rendered.join("\n\n"));
    out
}
