//! Serde helpers for ledger timestamps.
//!
//! Timestamps are written as RFC 3339 with as many fractional digits as
//! needed, so a write/read cycle is lossless. On read, date-times without an
//! offset (`2025-11-30T16:00:00.123456`) are accepted and interpreted in the
//! local time zone.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::CoreError;

/// Formats a timestamp the way the ledger stores it.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a ledger timestamp, with or without a UTC offset.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTimestamp`] when the input is neither form,
/// or when a local time does not exist (DST gap).
pub fn parse(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| CoreError::InvalidTimestamp(raw.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| CoreError::InvalidTimestamp(raw.to_string()))
}

/// `#[serde(serialize_with)]` adapter.
pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

/// `#[serde(deserialize_with)]` adapter.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}
