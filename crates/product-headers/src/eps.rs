//! EPS native format headers (Metop).
//!
//! An EPS product is a sequence of records, each introduced by a 20-byte
//! generic record header (GRH). The first record is the main product header
//! (MPHR, record class 1) whose body is an ASCII `KEY = VALUE` block.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::ascii::AsciiHeader;
use crate::bounded::read_prefix;
use crate::error::{HeaderError, HeaderResult};

/// Length of the generic record header in bytes.
pub const GRH_LEN: usize = 20;

/// Record class of the main product header.
pub const RECORD_CLASS_MPHR: u8 = 1;

/// Generic record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub record_class: u8,
    pub instrument_group: u8,
    pub record_subclass: u8,
    pub record_subclass_version: u8,
    /// Size of the whole record including this header
    pub record_size: u32,
    pub record_start: DateTime<Utc>,
    pub record_stop: DateTime<Utc>,
}

impl RecordHeader {
    /// Parse a GRH from its big-endian on-disk layout.
    pub fn parse(bytes: &[u8]) -> HeaderResult<Self> {
        if bytes.len() < GRH_LEN {
            return Err(HeaderError::NotEps(format!(
                "record header needs {} bytes, got {}",
                GRH_LEN,
                bytes.len()
            )));
        }

        let record_size = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Ok(Self {
            record_class: bytes[0],
            instrument_group: bytes[1],
            record_subclass: bytes[2],
            record_subclass_version: bytes[3],
            record_size,
            record_start: short_cds_time(&bytes[8..14])?,
            record_stop: short_cds_time(&bytes[14..20])?,
        })
    }
}

/// Unix milliseconds of 2000-01-01T00:00:00Z, the EPS time origin.
const EPS_EPOCH_MILLIS: i64 = 946_684_800_000;

/// CCSDS day-segmented time: u16 days since 2000-01-01, u32 milliseconds of day.
fn short_cds_time(bytes: &[u8]) -> HeaderResult<DateTime<Utc>> {
    let days = u16::from_be_bytes([bytes[0], bytes[1]]);
    let millis = u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
    let total = EPS_EPOCH_MILLIS + i64::from(days) * 86_400_000 + i64::from(millis);
    DateTime::from_timestamp_millis(total)
        .ok_or_else(|| HeaderError::invalid("record time", format!("day {days} ms {millis}")))
}

/// Main product header of an EPS file.
#[derive(Debug, Clone)]
pub struct EpsMainHeader {
    pub record: RecordHeader,
    pub fields: AsciiHeader,
}

impl EpsMainHeader {
    /// Read the MPHR from the first `limit` bytes of `path`.
    pub fn read(path: &Path, limit: usize) -> HeaderResult<Self> {
        let prefix = read_prefix(path, limit)?;
        Self::parse(&prefix)
    }

    pub fn parse(bytes: &[u8]) -> HeaderResult<Self> {
        let record = RecordHeader::parse(bytes)?;
        if record.record_class != RECORD_CLASS_MPHR {
            return Err(HeaderError::NotEps(format!(
                "first record has class {}, expected MPHR",
                record.record_class
            )));
        }

        let end = (record.record_size as usize).clamp(GRH_LEN, bytes.len());
        let fields = AsciiHeader::parse(&bytes[GRH_LEN..end]);
        if fields.is_empty() {
            return Err(HeaderError::missing("MPHR fields"));
        }

        Ok(Self { record, fields })
    }

    pub fn product_name(&self) -> Option<&str> {
        self.fields.get("PRODUCT_NAME")
    }

    pub fn sensing_start(&self) -> HeaderResult<Option<DateTime<Utc>>> {
        self.fields.timestamp("SENSING_START")
    }

    pub fn sensing_end(&self) -> HeaderResult<Option<DateTime<Utc>>> {
        self.fields.timestamp("SENSING_END")
    }

    /// Number of measurement data records, i.e. swath scan lines.
    pub fn total_mdr(&self) -> HeaderResult<Option<usize>> {
        self.fields.number("TOTAL_MDR")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn grh(class: u8, size: u32) -> Vec<u8> {
        let mut out = vec![class, 0, 0, 2];
        out.extend_from_slice(&size.to_be_bytes());
        // 2023-01-01 = day 8401 since 2000-01-01, 1000 ms
        out.extend_from_slice(&8401u16.to_be_bytes());
        out.extend_from_slice(&1000u32.to_be_bytes());
        out.extend_from_slice(&8401u16.to_be_bytes());
        out.extend_from_slice(&2000u32.to_be_bytes());
        out
    }

    #[test]
    fn test_parse_record_header() {
        let header = RecordHeader::parse(&grh(1, 3307)).unwrap();
        assert_eq!(header.record_class, 1);
        assert_eq!(header.record_subclass_version, 2);
        assert_eq!(header.record_size, 3307);
        assert_eq!(
            header.record_start,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_mphr() {
        let body = b"SENSING_START = 20230101000000Z\nSENSING_END = 20230101014158Z\nTOTAL_MDR = 12\n";
        let mut bytes = grh(1, (GRH_LEN + body.len()) as u32);
        bytes.extend_from_slice(body);
        // Trailing payload must not leak into the header
        bytes.extend_from_slice(b"\nTOTAL_MDR = 99999\n");

        let mphr = EpsMainHeader::parse(&bytes).unwrap();
        assert_eq!(mphr.total_mdr().unwrap(), Some(12));
        assert!(mphr.sensing_start().unwrap().is_some());
    }

    #[test]
    fn test_wrong_record_class() {
        let mut bytes = grh(8, 40);
        bytes.extend_from_slice(b"TOTAL_MDR = 1\n");
        assert!(matches!(
            EpsMainHeader::parse(&bytes),
            Err(HeaderError::NotEps(_))
        ));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            RecordHeader::parse(&[1, 0, 0]),
            Err(HeaderError::NotEps(_))
        ));
    }
}
