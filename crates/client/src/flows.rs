//! Per-view state for the booking front end.
//!
//! Each flow owns the transient state one screen needs (selection, form
//! drafts, the current alert) and talks to the backend through
//! [`crate::api::BookingApi`]. Nothing is shared between flows; starting a
//! new operation on a flow replaces whatever the previous one left behind.

use std::fmt;

pub mod bookings;
pub mod events;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Success => "✅",
            AlertKind::Error => "❌",
            AlertKind::Info => "ℹ️",
        }
    }
}

/// A dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}
