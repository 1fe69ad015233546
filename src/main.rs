use bookit_client::{commands::Command, config::ClientConfig};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use std::env;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Initialize logging; stderr keeps command output clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let command = Command::parse(env::args())?;

    bookit_client::run(config, command).await
}
