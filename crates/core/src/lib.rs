//! # bookit core
//!
//! Domain types and client-side rules for the event booking service: the
//! models the backend returns, the error taxonomy, time helpers and the
//! slot/booking/event status computation.

pub mod errors;
pub mod models;
pub mod status;
pub mod time;
pub mod validation;
