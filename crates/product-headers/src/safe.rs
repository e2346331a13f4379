//! Sentinel-3 SAFE manifest reader.
//!
//! Every `.SEN3` product directory carries an `xfdumanifest.xml` describing
//! the acquisition period, the footprint polygon and the image size. Reading
//! it is enough to catalog the product without opening any netCDF payload.

use std::path::Path;

use chrono::{DateTime, Utc};
use eo_common::{parse_compact_timestamp, BoundingBox, GridShape};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::bounded::read_prefix;
use crate::error::{HeaderError, HeaderResult};

/// Name of the manifest inside a SAFE directory.
pub const MANIFEST_FILE_NAME: &str = "xfdumanifest.xml";

/// Fields of `xfdumanifest.xml` needed for discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeManifest {
    /// Acquisition period; `None` when the manifest omits it
    pub start_time: Option<DateTime<Utc>>,
    pub stop_time: Option<DateTime<Utc>>,
    /// Footprint polygon as `(lon, lat)` pairs
    pub footprint: Vec<(f64, f64)>,
    /// Image size, when the manifest declares it
    pub image_size: Option<GridShape>,
    /// Product type, e.g. `OL_1_ERR___`
    pub product_type: Option<String>,
}

impl SafeManifest {
    /// Read the manifest of a SAFE directory, capped at `limit` bytes.
    pub fn read(product_dir: &Path, limit: usize) -> HeaderResult<Self> {
        let manifest_path = product_dir.join(MANIFEST_FILE_NAME);
        let bytes = read_prefix(&manifest_path, limit)?;
        let text = String::from_utf8_lossy(&bytes);
        let manifest = Self::parse(&text)?;

        debug!(
            path = %product_dir.display(),
            footprint_points = manifest.footprint.len(),
            "Parsed SAFE manifest"
        );

        Ok(manifest)
    }

    /// Parse manifest XML. Namespace prefixes are ignored, only local names matter.
    pub fn parse(xml: &str) -> HeaderResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut path: Vec<String> = Vec::new();
        let mut start_time = None;
        let mut stop_time = None;
        let mut pos_list = None;
        let mut rows = None;
        let mut cols = None;
        let mut product_type = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
                Ok(Event::End(_)) => {
                    path.pop();
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| xml_error(&e))?;
                    let text = text.trim();
                    match path.last().map(String::as_str) {
                        Some("startTime") if start_time.is_none() => {
                            start_time = Some(parse_time("startTime", text)?);
                        }
                        Some("stopTime") if stop_time.is_none() => {
                            stop_time = Some(parse_time("stopTime", text)?);
                        }
                        Some("posList") if pos_list.is_none() => {
                            pos_list = Some(text.to_string());
                        }
                        Some("numberOfLines") if rows.is_none() && inside(&path, "imageSize") => {
                            rows = Some(parse_count("numberOfLines", text)?);
                        }
                        Some("numberOfElements")
                            if cols.is_none() && inside(&path, "imageSize") =>
                        {
                            cols = Some(parse_count("numberOfElements", text)?);
                        }
                        Some("productType") if product_type.is_none() => {
                            product_type = Some(text.to_string());
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(&e)),
                _ => {}
            }
        }

        let footprint = match pos_list {
            Some(list) => parse_pos_list(&list)?,
            None => Vec::new(),
        };
        let image_size = match (rows, cols) {
            (Some(rows), Some(cols)) => Some(GridShape::new(rows, cols)),
            _ => None,
        };

        Ok(Self {
            start_time,
            stop_time,
            footprint,
            image_size,
            product_type,
        })
    }

    /// Bounding box of the footprint, `None` if the manifest has no footprint.
    pub fn footprint_bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.footprint.iter().copied())
    }
}

fn inside(path: &[String], element: &str) -> bool {
    path.iter().any(|p| p == element)
}

fn xml_error(e: &quick_xml::Error) -> HeaderError {
    HeaderError::Xml {
        file: MANIFEST_FILE_NAME.to_string(),
        message: e.to_string(),
    }
}

/// Manifest times are ISO 8601 with microseconds, e.g. `2020-01-01T10:00:00.012345Z`.
fn parse_time(field: &str, text: &str) -> HeaderResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    parse_compact_timestamp(text).map_err(|_| HeaderError::invalid(field, text))
}

fn parse_count(field: &str, text: &str) -> HeaderResult<usize> {
    text.parse().map_err(|_| HeaderError::invalid(field, text))
}

/// `gml:posList` holds whitespace-separated `lat lon` pairs.
fn parse_pos_list(text: &str) -> HeaderResult<Vec<(f64, f64)>> {
    let values: Vec<f64> = text
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| HeaderError::invalid("posList", truncate(text)))?;

    if values.len() % 2 != 0 {
        return Err(HeaderError::invalid("posList", "odd number of coordinates"));
    }

    Ok(values.chunks(2).map(|pair| (pair[1], pair[0])).collect())
}

fn truncate(text: &str) -> String {
    text.chars().take(64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xfdu:XFDU xmlns:xfdu="urn:ccsds:schema:xfdu:1" xmlns:gml="http://www.opengis.net/gml"
           xmlns:sentinel-safe="http://www.esa.int/safe/sentinel/1.1"
           xmlns:sentinel3="http://www.esa.int/safe/sentinel/sentinel-3/1.0"
           xmlns:olci="http://www.esa.int/safe/sentinel/sentinel-3/olci/1.0">
  <metadataSection>
    <metadataObject ID="acquisitionPeriod">
      <metadataWrap><xmlData>
        <sentinel-safe:acquisitionPeriod>
          <sentinel-safe:startTime>2020-01-01T10:00:00.012345Z</sentinel-safe:startTime>
          <sentinel-safe:stopTime>2020-01-01T10:40:00.000000Z</sentinel-safe:stopTime>
        </sentinel-safe:acquisitionPeriod>
      </xmlData></metadataWrap>
    </metadataObject>
    <metadataObject ID="generalProductInformation">
      <metadataWrap><xmlData>
        <sentinel3:generalProductInformation>
          <sentinel3:productType>OL_1_ERR___</sentinel3:productType>
        </sentinel3:generalProductInformation>
      </xmlData></metadataWrap>
    </metadataObject>
    <metadataObject ID="olciProductInformation">
      <metadataWrap><xmlData>
        <olci:olciProductInformation>
          <olci:imageSize grid="Reduced Resolution">
            <sentinel3:startOffset>0</sentinel3:startOffset>
            <sentinel3:numberOfLines>1520</sentinel3:numberOfLines>
            <sentinel3:numberOfElements>1217</sentinel3:numberOfElements>
          </olci:imageSize>
        </olci:olciProductInformation>
      </xmlData></metadataWrap>
    </metadataObject>
    <metadataObject ID="measurementFrameSet">
      <metadataWrap><xmlData>
        <sentinel-safe:frameSet><sentinel-safe:footPrint>
          <gml:posList>40.0 10.0 41.5 20.0 30.0 22.0 29.0 12.0 40.0 10.0</gml:posList>
        </sentinel-safe:footPrint></sentinel-safe:frameSet>
      </xmlData></metadataWrap>
    </metadataObject>
  </metadataSection>
</xfdu:XFDU>"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = SafeManifest::parse(MANIFEST).unwrap();
        assert_eq!(
            manifest.stop_time,
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 10, 40, 0).unwrap())
        );
        assert_eq!(manifest.image_size, Some(GridShape::new(1520, 1217)));
        assert_eq!(manifest.product_type.as_deref(), Some("OL_1_ERR___"));
        assert_eq!(manifest.footprint.len(), 5);
        assert_eq!(manifest.footprint[0], (10.0, 40.0));

        let bbox = manifest.footprint_bbox().unwrap();
        assert_eq!(bbox, BoundingBox::new(10.0, 29.0, 22.0, 41.5));
    }

    #[test]
    fn test_missing_times_are_optional() {
        let xml = "<XFDU><metadataSection></metadataSection></XFDU>";
        let manifest = SafeManifest::parse(xml).unwrap();
        assert!(manifest.start_time.is_none());
        assert!(manifest.footprint_bbox().is_none());
    }

    #[test]
    fn test_malformed_pos_list() {
        let xml = "<XFDU><startTime>2020-01-01T10:00:00Z</startTime>\
                   <stopTime>2020-01-01T10:01:00Z</stopTime>\
                   <posList>40.0 abc</posList></XFDU>";
        assert!(matches!(
            SafeManifest::parse(xml),
            Err(HeaderError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_broken_xml() {
        let xml = "<XFDU><startTime>2020-01-01T10:00:00Z</stopTime></XFDU>";
        assert!(matches!(SafeManifest::parse(xml), Err(HeaderError::Xml { .. })));
    }
}
