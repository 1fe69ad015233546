//! # Booking API Client
//!
//! Thin HTTP wrapper over the booking backend. Every call is a single
//! request/response: no retries, no caching, no de-duplication.
//!
//! Failures are mapped onto [`BookingError`]:
//!
//! - transport failures (refused connection, timeout) become
//!   [`BookingError::Network`] with a fixed user-facing message,
//! - `404` becomes [`BookingError::NotFound`], `409` becomes
//!   [`BookingError::AlreadyBooked`], anything else non-2xx becomes
//!   [`BookingError::Api`],
//! - a 2xx body that doesn't match the expected shape becomes
//!   [`BookingError::Decode`].
//!
//! Error messages come from the JSON body's `detail` field, then `message`,
//! then fall back to `HTTP <status>: <reason>`.

use async_trait::async_trait;
use bookit_core::{
    errors::{BookingError, BookingResult},
    models::{
        booking::{Booking, BookingConfirmation, CreateBookingRequest},
        event::{CreateEventRequest, Event},
    },
    validation::validate_create_event,
};
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{normalize_base_url, ClientConfig};

/// Operations the booking backend offers.
///
/// Flows are written against this trait so they can run against
/// [`MockBookingApi`] in tests.
#[automock]
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> BookingResult<Value>;

    /// `GET /events/`, events without their slots.
    async fn list_events(&self) -> BookingResult<Vec<Event>>;

    /// `GET /events/with-slots`
    async fn list_events_with_slots(&self) -> BookingResult<Vec<Event>>;

    /// `GET /events/{id}`
    async fn get_event(&self, id: Uuid) -> BookingResult<Event>;

    /// `POST /events/`. Slots are validated before anything is sent.
    async fn create_event(&self, request: &CreateEventRequest) -> BookingResult<Event>;

    /// `POST /bookings/`
    ///
    /// The confirmation is returned as sent. The backend may refuse with a
    /// 2xx and `success: false`; callers turn that into an error with
    /// [`BookingConfirmation::into_result`].
    ///
    /// # Errors
    ///
    /// * `BookingError::AlreadyBooked` - 409, the attendee already holds the slot
    /// * `BookingError::NotFound` - 404
    /// * `BookingError::Network` - the backend could not be reached
    /// * `BookingError::Api` - any other non-2xx status
    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> BookingResult<BookingConfirmation>;

    /// `GET /bookings/user/{email}`
    async fn bookings_for_email(&self, email: &str) -> BookingResult<Vec<Booking>>;

    /// `DELETE /bookings/{id}?attendee_email=...`
    async fn cancel_booking(&self, booking_id: Uuid, attendee_email: &str) -> BookingResult<()>;
}

/// reqwest-backed [`BookingApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `BookingError::Internal` if reqwest can't build its client,
    /// e.g. when no TLS backend is available.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bookit_client::{api::ApiClient, config::ClientConfig};
    ///
    /// let client = ApiClient::new(&ClientConfig::default()).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8000");
    /// ```
    pub fn new(config: &ClientConfig) -> BookingResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BookingError::Internal(Box::new(e)))?;

        Ok(Self {
            http,
            base_url: normalize_base_url(&config.api_url),
        })
    }

    /// Client with reqwest defaults, pointed at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, request: RequestBuilder) -> BookingResult<Response> {
        let response = request.send().await.map_err(transport_error)?;

        if response.status().is_success() {
            debug!(status = %response.status(), url = %response.url(), "Request succeeded");
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> BookingResult<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(transport_error)?;

        serde_json::from_slice(&body).map_err(|e| BookingError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn health(&self) -> BookingResult<Value> {
        self.fetch(self.http.get(self.url("/health"))).await
    }

    async fn list_events(&self) -> BookingResult<Vec<Event>> {
        self.fetch(self.http.get(self.url("/events/"))).await
    }

    async fn list_events_with_slots(&self) -> BookingResult<Vec<Event>> {
        self.fetch(self.http.get(self.url("/events/with-slots"))).await
    }

    async fn get_event(&self, id: Uuid) -> BookingResult<Event> {
        self.fetch(self.http.get(self.url(&format!("/events/{id}"))))
            .await
    }

    async fn create_event(&self, request: &CreateEventRequest) -> BookingResult<Event> {
        validate_create_event(request)?;

        self.fetch(self.http.post(self.url("/events/")).json(request))
            .await
    }

    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> BookingResult<BookingConfirmation> {
        self.fetch(self.http.post(self.url("/bookings/")).json(request))
            .await
    }

    async fn bookings_for_email(&self, email: &str) -> BookingResult<Vec<Booking>> {
        let endpoint = format!("/bookings/user/{}", urlencoding::encode(email));
        self.fetch(self.http.get(self.url(&endpoint))).await
    }

    async fn cancel_booking(&self, booking_id: Uuid, attendee_email: &str) -> BookingResult<()> {
        let endpoint = format!(
            "/bookings/{}?attendee_email={}",
            booking_id,
            urlencoding::encode(attendee_email)
        );
        self.send(self.http.delete(self.url(&endpoint))).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> BookingError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        warn!(error = %err, "Backend unreachable");
        BookingError::network()
    } else if err.is_decode() {
        BookingError::Decode(err.to_string())
    } else {
        BookingError::Internal(Box::new(err))
    }
}

async fn error_from_response(response: Response) -> BookingError {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);

    warn!(status = %status, url = %url, message = %message, "Request failed");

    match status {
        StatusCode::NOT_FOUND => BookingError::NotFound(message),
        StatusCode::CONFLICT => BookingError::AlreadyBooked(message),
        _ => BookingError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pick a human-readable message out of an error body.
///
/// # Returns
///
/// The `detail` field, else the `message` field, else
/// `"HTTP {code}: {reason}"`. Empty or null fields are skipped and
/// non-string values are rendered as JSON.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();

    parsed
        .as_ref()
        .and_then(|value| {
            ["detail", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(field_text))
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        })
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        // FastAPI validation errors put a list of problems under `detail`.
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"detail": "Event not found"}"#, "Event not found")]
    #[case(r#"{"message": "Slot is full"}"#, "Slot is full")]
    #[case(r#"{"detail": "first", "message": "second"}"#, "first")]
    #[case(r#"{"detail": "", "message": "second"}"#, "second")]
    #[case(r#"{"detail": null}"#, "HTTP 500: Internal Server Error")]
    #[case("", "HTTP 500: Internal Server Error")]
    #[case("<html>oops</html>", "HTTP 500: Internal Server Error")]
    fn test_error_message(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, body), expected);
    }

    #[test]
    fn test_error_message_structured_detail() {
        let body = r#"{"detail": [{"loc": ["body", "title"], "msg": "field required"}]}"#;
        let message = error_message(StatusCode::UNPROCESSABLE_ENTITY, body);

        assert!(message.contains("field required"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::with_base_url("http://localhost:8000/");

        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/events/"), "http://localhost:8000/events/");
    }
}
