//! # Reproducible Output Timestamp (`common::archive::timestamp`)
//!
//! File: cli/src/common/archive/timestamp.rs
//!
//! ## Overview
//!
//! Parses the configured output timestamp and converts times into the DOS
//! date/time representation stored in ZIP entries.
//!
//! Accepted forms:
//! - ISO-8601 with an offset, e.g. `2024-01-01T10:00:00+02:00` or `...Z`
//! - integer seconds since the epoch, as in `SOURCE_DATE_EPOCH`
//!
//! Absent, empty, and one-character values switch reproducible output off; a
//! single character is a convenient way to blank an inherited value.
//!
use crate::core::error::{EjbError, Result};
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use std::time::SystemTime;

/// Earliest accepted timestamp: 1980-01-01T00:00:02Z.
const MIN_EPOCH_SECONDS: i64 = 315_532_802;
/// Latest accepted timestamp: 2099-12-31T23:59:59Z.
const MAX_EPOCH_SECONDS: i64 = 4_102_444_799;

/// Parses an output timestamp value. `Ok(None)` means reproducible output is off.
pub fn parse_output_timestamp(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let value = match raw.map(str::trim) {
        Some(v) if v.chars().count() >= 2 => v,
        _ => return Ok(None),
    };

    let instant = if value.bytes().all(|b| b.is_ascii_digit()) {
        let seconds: i64 = value.parse().map_err(|e: std::num::ParseIntError| {
            invalid(value, e.to_string())
        })?;
        DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or_else(|| invalid(value, "seconds out of range".to_string()))?
    } else {
        DateTime::parse_from_rfc3339(value)
            .map_err(|e| invalid(value, e.to_string()))?
            .with_timezone(&Utc)
            .with_nanosecond(0)
            .ok_or_else(|| invalid(value, "cannot truncate to seconds".to_string()))?
    };

    let seconds = instant.timestamp();
    if !(MIN_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&seconds) {
        return Err(invalid(
            value,
            format!(
                "'{}' is not within the valid range 1980-01-01T00:00:02Z to 2099-12-31T23:59:59Z",
                instant.to_rfc3339()
            ),
        ));
    }
    Ok(Some(instant))
}

fn invalid(value: &str, reason: String) -> anyhow::Error {
    anyhow::anyhow!(EjbError::Timestamp {
        value: value.to_string(),
        reason,
    })
}

/// Converts a wall-clock time to a ZIP entry time. Times outside the DOS range
/// fall back to the earliest representable time.
pub fn to_zip_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> zip::DateTime {
    let (Ok(year), Ok(month), Ok(day)) = (
        u16::try_from(time.year()),
        u8::try_from(time.month()),
        u8::try_from(time.day()),
    ) else {
        return zip::DateTime::default();
    };
    zip::DateTime::from_date_and_time(
        year,
        month,
        day,
        time.hour() as u8,
        time.minute() as u8,
        time.second() as u8,
    )
    .unwrap_or_default()
}

/// Local time of a file modification, used when output is not reproducible.
pub fn zip_datetime_from_system(time: SystemTime) -> zip::DateTime {
    to_zip_datetime(&DateTime::<Local>::from(time))
}

pub fn zip_datetime_now() -> zip::DateTime {
    to_zip_datetime(&Local::now())
}
