//! Time handling for satellite acquisitions.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Sensing period of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range, rejecting an end before the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeParseError> {
        if end < start {
            return Err(TimeParseError::Reversed {
                start: to_iso_seconds(&start),
                end: to_iso_seconds(&end),
            });
        }
        Ok(Self { start, end })
    }

    /// Single-instant range.
    pub fn instant(at: DateTime<Utc>) -> Self {
        Self { start: at, end: at }
    }

    /// Acquisition midpoint, used as the label of the cube time dimension.
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Time range ends before it starts: {start} > {end}")]
    Reversed { start: String, end: String },
}

/// Parse the compact UTC timestamps used in product names and native headers.
///
/// Accepted shapes:
/// - `20200101T100000` (Sentinel-3 SAFE names)
/// - `20230101000000Z` (EPS MPHR and Metop names)
/// - `20210101121243.184000000Z` (MSG native names, nanosecond fraction)
/// - `20210101120010.123` (MSG native header fields)
pub fn parse_compact_timestamp(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let trimmed = s.trim();
    let body = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    let (main, fraction) = match body.split_once('.') {
        Some((main, fraction)) => (main, Some(fraction)),
        None => (body, None),
    };

    let digits: String = if main.len() == 15 && main.as_bytes()[8] == b'T' {
        main.chars().filter(|c| *c != 'T').collect()
    } else {
        main.to_string()
    };

    if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::InvalidFormat(s.to_string()));
    }

    let naive = NaiveDateTime::parse_from_str(&digits, "%Y%m%d%H%M%S")
        .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;

    let nanos = match fraction {
        None => 0,
        Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(TimeParseError::InvalidFormat(s.to_string()));
        }
        Some(f) => {
            let mut padded: String = f.chars().take(9).collect();
            while padded.len() < 9 {
                padded.push('0');
            }
            padded
                .parse::<u32>()
                .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?
        }
    };

    let with_nanos = naive
        .with_nanosecond(nanos)
        .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;

    Ok(Utc.from_utc_datetime(&with_nanos))
}

/// ISO 8601 at seconds precision with a `Z` suffix, the catalog representation.
pub fn to_iso_seconds(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
