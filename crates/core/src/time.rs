//! # Time Utilities
//!
//! Parsing, display formatting and temporal predicates for the ISO-8601
//! timestamps the booking backend sends.
//!
//! Every helper here fails soft: an unparsable timestamp never produces an
//! error. Predicates answer `false` and formatters return a fixed sentinel
//! string (`"Invalid date"`, `"Invalid time"`, `"Invalid date/time"`).
//!
//! Predicates come in two forms. The `*_at` variants take `now` explicitly
//! and are what the status code uses; the bare variants read the wall clock
//! at call time and exist for display code.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::env;

pub const INVALID_DATE: &str = "Invalid date";
pub const INVALID_TIME: &str = "Invalid time";
pub const INVALID_DATE_TIME: &str = "Invalid date/time";

const DATE_FORMAT: &str = "%b %d, %Y";
const TIME_FORMAT: &str = "%-I:%M %p";
const DATE_TIME_FORMAT: &str = "%b %d, %Y %-I:%M %p";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Instants with an explicit offset: RFC 3339, or `+0200` without a colon.
fn parse_with_offset(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(value, format).ok())
        })
        .map(|instant| instant.with_timezone(&Utc))
}

/// Date-times without an offset. A bare date is midnight.
fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parse an ISO-8601 instant.
///
/// Explicit offsets are kept, with or without a colon. A date-time without
/// an offset is read as UTC, which is how the backend stores it; a bare
/// date is UTC midnight.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    parse_with_offset(value).or_else(|| parse_naive(value).map(|naive| Utc.from_utc_datetime(&naive)))
}

/// Parse user input, reading a date-time without an offset as wall-clock
/// time in `timezone`.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant; local
/// times skipped by a DST gap don't parse.
pub fn parse_in_timezone(value: &str, timezone: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Some(instant) = parse_with_offset(value) {
        return Some(instant);
    }
    let naive = parse_naive(value)?;
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// The runtime's timezone, taken from `TZ`. Falls back to UTC.
pub fn local_timezone() -> Tz {
    env::var("TZ")
        .ok()
        .and_then(|name| name.trim_start_matches(':').parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Abbreviation of `timezone` at `now`, e.g. `CEST` or `UTC`.
pub fn timezone_abbreviation(timezone: &Tz, now: DateTime<Utc>) -> String {
    now.with_timezone(timezone).format("%Z").to_string()
}

pub fn is_past_at(timestamp: &str, now: DateTime<Utc>) -> bool {
    parse_timestamp(timestamp).is_some_and(|instant| instant < now)
}

/// True iff `timestamp` is strictly before the current instant.
pub fn is_past(timestamp: &str) -> bool {
    is_past_at(timestamp, Utc::now())
}

/// True iff `timestamp` falls on the same calendar date as `now`, compared
/// in `now`'s timezone.
pub fn is_today_at<Z: TimeZone>(timestamp: &str, now: &DateTime<Z>) -> bool {
    parse_timestamp(timestamp)
        .is_some_and(|instant| instant.with_timezone(&now.timezone()).date_naive() == now.date_naive())
}

pub fn is_today(timestamp: &str) -> bool {
    is_today_at(timestamp, &Local::now())
}

pub fn format_date_utc(instant: &DateTime<Utc>, timezone: &Tz) -> String {
    instant.with_timezone(timezone).format(DATE_FORMAT).to_string()
}

pub fn format_time_utc(instant: &DateTime<Utc>, timezone: &Tz) -> String {
    instant.with_timezone(timezone).format(TIME_FORMAT).to_string()
}

pub fn format_date_time_utc(instant: &DateTime<Utc>, timezone: &Tz) -> String {
    instant
        .with_timezone(timezone)
        .format(DATE_TIME_FORMAT)
        .to_string()
}

/// Render the date portion, e.g. `Oct 05, 2026`.
pub fn format_date(timestamp: &str, timezone: &Tz) -> String {
    parse_timestamp(timestamp)
        .map(|instant| format_date_utc(&instant, timezone))
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// Render the time of day, e.g. `2:30 PM`.
pub fn format_time(timestamp: &str, timezone: &Tz) -> String {
    parse_timestamp(timestamp)
        .map(|instant| format_time_utc(&instant, timezone))
        .unwrap_or_else(|| INVALID_TIME.to_string())
}

pub fn format_date_time(timestamp: &str, timezone: &Tz) -> String {
    parse_timestamp(timestamp)
        .map(|instant| format_date_time_utc(&instant, timezone))
        .unwrap_or_else(|| INVALID_DATE_TIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).expect("valid timestamp")
    }

    #[rstest]
    #[case("2026-10-05T14:30:00Z", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05T16:30:00+02:00", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05T14:30:00", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05T14:30:00.250", "2026-10-05T14:30:00.250Z")]
    #[case("2026-10-05 14:30:00", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05T14:30", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05T16:30:00+0200", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05T16:30+0200", "2026-10-05T14:30:00Z")]
    #[case("2026-10-05", "2026-10-05T00:00:00Z")]
    fn test_parse_timestamp(#[case] input: &str, #[case] expected: &str) {
        let expected = DateTime::parse_from_rfc3339(expected)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_timestamp(input), Some(expected));
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("")]
    #[case("2026-13-40T00:00:00Z")]
    fn test_parse_timestamp_rejects_garbage(#[case] input: &str) {
        assert_eq!(parse_timestamp(input), None);
    }

    #[test]
    fn test_parse_in_timezone_reads_naive_as_local() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        let parsed = parse_in_timezone("2026-07-01T10:00", &berlin).unwrap();
        assert_eq!(parsed, at("2026-07-01T08:00:00Z"));

        let parsed = parse_in_timezone("2026-07-01", &berlin).unwrap();
        assert_eq!(parsed, at("2026-06-30T22:00:00Z"));

        // Explicit offsets win over the zone.
        let parsed = parse_in_timezone("2026-07-01T10:00:00Z", &berlin).unwrap();
        assert_eq!(parsed, at("2026-07-01T10:00:00Z"));
    }

    #[test]
    fn test_is_past_at() {
        let now = at("2026-10-05T12:00:00Z");
        assert!(is_past_at("2026-10-05T11:59:59Z", now));
        assert!(!is_past_at("2026-10-05T12:00:00Z", now));
        assert!(!is_past_at("2026-10-05T12:00:01Z", now));
    }

    #[test]
    fn test_is_past_fails_soft() {
        assert!(!is_past("not-a-date"));
        assert!(!is_past_at("", Utc::now()));
    }

    #[test]
    fn test_is_past_wall_clock() {
        let earlier = (Utc::now() - Duration::hours(1)).to_rfc3339();
        let later = (Utc::now() + Duration::hours(1)).to_rfc3339();
        assert!(is_past(&earlier));
        assert!(!is_past(&later));
    }

    #[test]
    fn test_is_today_at() {
        let now = at("2026-10-05T23:30:00Z");
        assert!(is_today_at("2026-10-05T00:00:00Z", &now));
        assert!(!is_today_at("2026-10-06T00:00:00Z", &now));
        assert!(!is_today_at("garbage", &now));

        // The same instant is already tomorrow in Tokyo.
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        let tokyo_now = now.with_timezone(&tokyo);
        assert!(is_today_at("2026-10-06T01:00:00Z", &tokyo_now));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-10-05T14:30:00Z", &Tz::UTC), "Oct 05, 2026");
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        assert_eq!(format_date("2026-10-05T20:00:00Z", &tokyo), "Oct 06, 2026");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("2026-10-05T14:30:00Z", &Tz::UTC), "2:30 PM");
        assert_eq!(format_time("2026-10-05T00:05:00Z", &Tz::UTC), "12:05 AM");
        let new_york: Tz = "America/New_York".parse().unwrap();
        assert_eq!(format_time("2026-10-05T14:30:00Z", &new_york), "10:30 AM");
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(
            format_date_time("2026-10-05T09:15:00Z", &Tz::UTC),
            "Oct 05, 2026 9:15 AM"
        );
    }

    #[test]
    fn test_formatters_use_sentinels() {
        assert_eq!(format_date("not-a-date", &Tz::UTC), INVALID_DATE);
        assert_eq!(format_time("not-a-date", &Tz::UTC), INVALID_TIME);
        assert_eq!(format_date_time("not-a-date", &Tz::UTC), INVALID_DATE_TIME);
    }

    #[test]
    fn test_timezone_abbreviation() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        assert_eq!(timezone_abbreviation(&berlin, at("2026-07-01T00:00:00Z")), "CEST");
        assert_eq!(timezone_abbreviation(&berlin, at("2026-01-01T00:00:00Z")), "CET");
        assert_eq!(timezone_abbreviation(&Tz::UTC, at("2026-01-01T00:00:00Z")), "UTC");
    }
}
