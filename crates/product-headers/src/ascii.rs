//! ASCII key/value header blocks.
//!
//! EPS main product headers use `KEY = VALUE` lines, MSG native headers use
//! `KEY : VALUE`. Keys are upper-case identifiers padded with spaces. Lines
//! that do not look like a field (binary record headers, blank padding) are
//! skipped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use eo_common::parse_compact_timestamp;

use crate::error::{HeaderError, HeaderResult};

/// Parsed key/value header.
#[derive(Debug, Clone, Default)]
pub struct AsciiHeader {
    fields: HashMap<String, String>,
}

impl AsciiHeader {
    /// Parse a header block. Non-UTF-8 bytes are replaced, never rejected.
    pub fn parse(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let mut fields = HashMap::new();

        for line in text.lines() {
            let Some((key, value)) = split_field(line) else {
                continue;
            };
            // First occurrence wins; later records may reuse key names.
            fields.entry(key).or_insert(value);
        }

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> HeaderResult<&str> {
        self.get(key).ok_or_else(|| HeaderError::missing(key))
    }

    /// Optional timestamp field. Present but unparsable is an error.
    pub fn timestamp(&self, key: &str) -> HeaderResult<Option<DateTime<Utc>>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse_compact_timestamp(raw)
                .map(Some)
                .map_err(|_| HeaderError::invalid(key, raw)),
        }
    }

    /// Optional numeric field. Present but unparsable is an error.
    pub fn number<T: std::str::FromStr>(&self, key: &str) -> HeaderResult<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| HeaderError::invalid(key, raw)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn split_field(line: &str) -> Option<(String, String)> {
    let sep = line.find(['=', ':'])?;
    let key = line[..sep].trim();
    let value = line[sep + 1..].trim();

    let is_key = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
    if !is_key || value.is_empty() {
        return None;
    }

    Some((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MPHR: &str = "\
PRODUCT_NAME                  = ASCA_SMO_02_M02_20230101000000Z_20230101014158Z_N_O_20230101013051Z
INSTRUMENT_ID                 = ASCA
SENSING_START                 = 20230101000000Z
SENSING_END                   = 20230101014158Z
TOTAL_MDR                     = 3264
";

    #[test]
    fn test_parse_eps_style() {
        let header = AsciiHeader::parse(MPHR.as_bytes());
        assert_eq!(header.get("INSTRUMENT_ID"), Some("ASCA"));
        assert_eq!(header.number::<usize>("TOTAL_MDR").unwrap(), Some(3264));
        assert_eq!(
            header.timestamp("SENSING_END").unwrap(),
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 1, 41, 58).unwrap())
        );
    }

    #[test]
    fn test_parse_msg_style_and_skip_noise() {
        let mut bytes = vec![0x01, 0x00, 0xff, 0x10, b'\n'];
        bytes.extend_from_slice(b"SENSING_START    : 20210101120010.123\nLLOS  : 41.5\nlower : x\n");
        let header = AsciiHeader::parse(&bytes);

        assert_eq!(header.len(), 2);
        assert_eq!(header.number::<f64>("LLOS").unwrap(), Some(41.5));
        assert!(header.get("lower").is_none());
    }

    #[test]
    fn test_bad_values_are_errors() {
        let header = AsciiHeader::parse(b"SENSING_START = yesterday\nTOTAL_MDR = many\n");
        assert!(matches!(
            header.timestamp("SENSING_START"),
            Err(HeaderError::InvalidValue { .. })
        ));
        assert!(header.number::<usize>("TOTAL_MDR").is_err());
        assert!(matches!(
            header.require("SENSING_END"),
            Err(HeaderError::MissingField(_))
        ));
    }
}
