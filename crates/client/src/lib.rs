//! # bookit client
//!
//! Everything between a terminal user and the booking backend:
//!
//! - **config**: environment configuration
//! - **api**: the HTTP client and the [`api::BookingApi`] trait it implements
//! - **flows**: per-screen state (event board, event detail, create form,
//!   my bookings)
//! - **commands**: argument parsing and text rendering

pub mod api;
pub mod commands;
pub mod config;
pub mod flows;

use chrono::Utc;
use eyre::Result;
use tracing::info;

/// Run one command against the backend described by `config` and print the
/// result.
pub async fn run(config: config::ClientConfig, command: commands::Command) -> Result<()> {
    let api = api::ApiClient::new(&config)?;
    info!(api_url = %api.base_url(), timezone = %config.timezone, "Running {:?}", command);

    let output = commands::execute(&api, &config.timezone, command, Utc::now()).await?;
    println!("{output}");

    Ok(())
}
