use thiserror::Error;

/// Message shown when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already booked: {0}")]
    AlreadyBooked(String),

    /// The backend answered 2xx but refused the request in the body.
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn network() -> Self {
        BookingError::Network(NETWORK_ERROR_MESSAGE.to_string())
    }

    /// HTTP status the backend answered with, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            BookingError::NotFound(_) => Some(404),
            BookingError::AlreadyBooked(_) => Some(409),
            BookingError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The bare message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            BookingError::Validation(msg)
            | BookingError::NotFound(msg)
            | BookingError::AlreadyBooked(msg)
            | BookingError::Rejected(msg)
            | BookingError::Network(msg)
            | BookingError::Decode(msg) => msg.clone(),
            BookingError::Api { message, .. } => message.clone(),
            BookingError::Internal(err) => err.to_string(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
