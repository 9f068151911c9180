//! Channel types.
//!
//! The DVR reports channel numbers as JSON strings (`"6010"`, `"9001.1"`)
//! on most versions and as bare integers on some. [`ChannelNumber`] accepts
//! both and always serializes as a string, which is also the key used by
//! the failure ledger.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Channel Number
// ============================================================================

/// Identifier of a DVR channel.
///
/// Ordering is numeric when both numbers parse as decimals and lexical
/// otherwise, so `"9"` sorts before `"10"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelNumber(String);

impl ChannelNumber {
    /// Returns the number as it appears in URLs and ledger keys.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}

impl FromStr for ChannelNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '?', '#', ' ']) {
            return Err(CoreError::InvalidChannelNumber(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<u32> for ChannelNumber {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for ChannelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for ChannelNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a
                .partial_cmp(&b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ChannelNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for ChannelNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ChannelNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(u64),
            Decimal(f64),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Integer(n) => n.to_string(),
            Raw::Decimal(n) => n.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Channel
// ============================================================================

/// A channel to be health-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel number on the DVR.
    pub number: ChannelNumber,
    /// Display name (e.g. "ESPN").
    pub name: String,
}

impl Channel {
    /// Creates a new channel.
    pub fn new(number: impl Into<ChannelNumber>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
