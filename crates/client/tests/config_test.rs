use bookit_client::config::{
    normalize_base_url, parse_log_level, parse_timezone, ClientConfig, DEFAULT_API_URL,
};
use chrono_tz::Tz;
use rstest::rstest;
use std::collections::HashMap;
use std::time::Duration;
use tracing::Level;

#[test]
fn test_default_config() {
    let config = ClientConfig::default();

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.timezone, Tz::UTC);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.timeout(), Duration::from_secs(30));
}

#[test]
fn test_custom_timeout() {
    let config = ClientConfig {
        request_timeout: 5,
        ..ClientConfig::default()
    };

    assert_eq!(config.timeout(), Duration::from_secs(5));
}

#[rstest]
#[case("trace", Level::TRACE)]
#[case("DEBUG", Level::DEBUG)]
#[case(" warn ", Level::WARN)]
#[case("error", Level::ERROR)]
#[case("loud", Level::INFO)]
fn test_parse_log_level(#[case] value: &str, #[case] expected: Level) {
    assert_eq!(parse_log_level(value), expected);
}

#[test]
fn test_parse_timezone() {
    assert_eq!(parse_timezone("Europe/Berlin").unwrap(), Tz::Europe__Berlin);
    assert!(parse_timezone("Mars/Olympus_Mons").is_err());
}

#[test]
fn test_normalize_base_url() {
    assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
    assert_eq!(normalize_base_url(" https://api.example.com// "), "https://api.example.com");
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_from_vars_reads_every_setting() {
    let source = vars(&[
        ("BOOKIT_API_URL", "https://bookings.example.com/"),
        ("BOOKIT_TIMEZONE", "America/New_York"),
        ("LOG_LEVEL", "debug"),
        ("BOOKIT_REQUEST_TIMEOUT_SECONDS", "12"),
    ]);

    let config = ClientConfig::from_vars(|key| source.get(key).cloned()).unwrap();

    assert_eq!(config.api_url, "https://bookings.example.com");
    assert_eq!(config.timezone, Tz::America__New_York);
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(config.timeout(), Duration::from_secs(12));
}

#[test]
fn test_from_vars_defaults() {
    let source = vars(&[
        ("BOOKIT_TIMEZONE", "UTC"),
        ("BOOKIT_REQUEST_TIMEOUT_SECONDS", "soon"),
    ]);

    let config = ClientConfig::from_vars(|key| source.get(key).cloned()).unwrap();

    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.timeout(), Duration::from_secs(30));
}

#[test]
fn test_from_vars_rejects_unknown_timezone() {
    let source = vars(&[("BOOKIT_TIMEZONE", "Mars/Olympus_Mons")]);

    let error = ClientConfig::from_vars(|key| source.get(key).cloned()).unwrap_err();

    assert!(error.to_string().contains("BOOKIT_TIMEZONE"));
}
