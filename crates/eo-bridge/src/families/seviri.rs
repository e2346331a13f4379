//! MSG SEVIRI Level-1.5 native files.
//!
//! File names look like `MSG4-SEVI-MSG15-0100-NA-20210101121243.184000000Z-NA.nat`;
//! the sixth `-` field is the nominal end of the repeat cycle. The file opens
//! with an ASCII main product header of `KEY : VALUE` lines.

use std::path::Path;

use chrono::Duration;
use eo_common::{
    parse_compact_timestamp, GeostationaryDisk, GridCrs, GridDescription, GridShape, GridTag,
    TimeRange,
};
use product_headers::{read_prefix, AsciiHeader};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::families::{combine_times, eumetsat, header_error};
use crate::family::{BandSpec, FamilyDescriptor, FetchUnit, NativeGrid, ProductFamily};
use crate::probe::{product_name, ProductHeader, ProductProbe};
use crate::recognition::{EntryLayout, RecognitionRule};

pub const GRID_VIS_IR: &str = "seviri-vis-ir-3km";
pub const GRID_HRV: &str = "seviri-hrv-1km";

const FAMILY: ProductFamily = ProductFamily::SeviriL1bNative;

const PREFIXES: &[&str] = &["MSG1-SEVI", "MSG2-SEVI", "MSG3-SEVI", "MSG4-SEVI"];

const KEYWORDS: &[&str] = &["EUMETSAT", "Meteosat", "MSG", "SEVIRI", "L1b", "Native"];

/// Sampling distance at the sub-satellite point (metres).
const VIS_IR_RESOLUTION: f64 = 3000.403_165_817;
const HRV_RESOLUTION: f64 = 1000.134_348_869;

const VIS_IR_SHAPE: GridShape = GridShape {
    rows: 3712,
    cols: 3712,
};
/// Full-disk HRV image as delivered in native files (two windows side by side).
const HRV_SHAPE: GridShape = GridShape {
    rows: 11136,
    cols: 5568,
};

/// Duration of the full-disk scan ending at the time in the file name.
const SCAN_MINUTES: i64 = 12;

/// Channels on the 3 km grid, in default load order.
const VIS_IR_CHANNELS: [(&str, &str, &str); 11] = [
    ("IR_016", "%", "1.6 um near-infrared reflectance"),
    ("IR_039", "K", "3.9 um brightness temperature"),
    ("IR_087", "K", "8.7 um brightness temperature"),
    ("IR_097", "K", "9.7 um ozone channel brightness temperature"),
    ("IR_108", "K", "10.8 um brightness temperature"),
    ("IR_120", "K", "12.0 um brightness temperature"),
    ("IR_134", "K", "13.4 um carbon dioxide channel brightness temperature"),
    ("VIS006", "%", "0.6 um visible reflectance"),
    ("VIS008", "%", "0.8 um visible reflectance"),
    ("WV_062", "K", "6.2 um water vapour brightness temperature"),
    ("WV_073", "K", "7.3 um water vapour brightness temperature"),
];

pub fn descriptor() -> FamilyDescriptor {
    let vis_ir = GridTag::new(GRID_VIS_IR);
    let hrv = GridTag::new(GRID_HRV);

    let mut bands = vec![BandSpec::new(
        "HRV",
        &hrv,
        "%",
        "High resolution visible reflectance",
    )];
    bands.extend(
        VIS_IR_CHANNELS
            .iter()
            .map(|&(name, unit, description)| BandSpec::new(name, &vis_ir, unit, description)),
    );

    FamilyDescriptor {
        family: FAMILY,
        title: "MSG SEVIRI L1b Native",
        description: "Meteosat SEVIRI Level-1b data in native (.nat) format.",
        keywords: KEYWORDS,
        license: "proprietary",
        providers: vec![eumetsat()],
        recognition: RecognitionRule::new(EntryLayout::File, ".nat", PREFIXES),
        bands,
        // HRV sits on its own grid and must be requested alone.
        default_bands: VIS_IR_CHANNELS.iter().map(|(name, _, _)| *name).collect(),
        grids: vec![
            NativeGrid {
                tag: vis_ir,
                resolution_m: VIS_IR_RESOLUTION,
            },
            NativeGrid {
                tag: hrv,
                resolution_m: HRV_RESOLUTION,
            },
        ],
        fetch_unit: FetchUnit::WholeProduct,
    }
}

/// Probe reading the ASCII main product header.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeviriProbe;

impl SeviriProbe {
    fn grids(sub_lon: f64, sized: bool) -> Vec<GridDescription> {
        let crs = GridCrs::Geostationary { sub_lon };
        vec![
            GridDescription {
                tag: GridTag::new(GRID_VIS_IR),
                resolution_m: VIS_IR_RESOLUTION,
                crs,
                shape: sized.then_some(VIS_IR_SHAPE),
            },
            GridDescription {
                tag: GridTag::new(GRID_HRV),
                resolution_m: HRV_RESOLUTION,
                crs,
                shape: sized.then_some(HRV_SHAPE),
            },
        ]
    }
}

impl ProductProbe for SeviriProbe {
    fn name_times(&self, product: &Path) -> Result<TimeRange> {
        let name = product_name(product);
        let end = name
            .split('-')
            .nth(5)
            .and_then(|raw| parse_compact_timestamp(raw).ok())
            .ok_or_else(|| {
                BridgeError::malformed(FAMILY, product, "product name carries no scan time")
            })?;

        Ok(TimeRange {
            start: end - Duration::minutes(SCAN_MINUTES),
            end,
        })
    }

    fn nominal_grids(&self) -> Vec<GridDescription> {
        Self::grids(0.0, false)
    }

    fn read_header(&self, product: &Path, limit: usize) -> Result<ProductHeader> {
        let prefix = read_prefix(product, limit).map_err(|e| header_error(FAMILY, product, e))?;
        let fields = AsciiHeader::parse(&prefix);
        if fields.is_empty() {
            return Err(BridgeError::malformed(
                FAMILY,
                product,
                "no ASCII main product header",
            ));
        }

        let start = fields
            .timestamp("SENSING_START")
            .map_err(|e| header_error(FAMILY, product, e))?;
        let end = fields
            .timestamp("SENSING_END")
            .map_err(|e| header_error(FAMILY, product, e))?;
        let time = combine_times(FAMILY, product, start, end, || self.name_times(product))?;

        let sub_lon = fields
            .number::<f64>("LLOS")
            .map_err(|e| header_error(FAMILY, product, e))?
            .unwrap_or(0.0);

        debug!(
            path = %product.display(),
            fields = fields.len(),
            sub_lon,
            "Read SEVIRI main product header"
        );

        Ok(ProductHeader {
            time,
            bbox: GeostationaryDisk::meteosat(sub_lon).visible_bbox(),
            grids: Self::grids(sub_lon, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_descriptor_defaults_exclude_hrv() {
        let d = descriptor();
        d.validate().unwrap();
        assert_eq!(d.bands.len(), 12);
        assert_eq!(d.default_bands.len(), 11);
        assert!(!d.default_bands.contains(&"HRV"));
        assert_eq!(d.band("HRV").unwrap().grid.as_str(), GRID_HRV);
    }

    #[test]
    fn test_name_times() {
        let name = "MSG4-SEVI-MSG15-0100-NA-20210101121243.184000000Z-NA.nat";
        let time = SeviriProbe.name_times(Path::new(name)).unwrap();
        assert_eq!(time.end.timestamp(), Utc.with_ymd_and_hms(2021, 1, 1, 12, 12, 43).unwrap().timestamp());
        assert_eq!(time.start, time.end - Duration::minutes(12));

        let err = SeviriProbe.name_times(Path::new("MSG4-SEVI-x.nat")).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedProduct { .. }));
    }

    #[test]
    fn test_nominal_grids_are_unsized() {
        let grids = SeviriProbe.nominal_grids();
        assert_eq!(grids.len(), 2);
        assert!(grids.iter().all(|g| g.shape.is_none()));
    }
}
