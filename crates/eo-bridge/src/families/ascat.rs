//! Metop ASCAT soil moisture at 25 km (SOMO25) in EPS native format.
//!
//! File names look like
//! `ASCA_SMO_02_M01_20230101000000Z_20230101014158Z_N_O_20230101013051Z.nat`,
//! with sensing start and end as the fifth and sixth `_` fields. A product
//! may also be a directory wrapping exactly one such file.

use std::path::Path;

use eo_common::{parse_compact_timestamp, BoundingBox, GridCrs, GridDescription, GridShape, GridTag, TimeRange};
use product_headers::EpsMainHeader;

use crate::error::{BridgeError, Result};
use crate::families::{combine_times, eumetsat, header_error};
use crate::family::{BandSpec, FamilyDescriptor, FetchUnit, NativeGrid, ProductFamily};
use crate::probe::{product_name, ProductHeader, ProductProbe};
use crate::recognition::{EntryLayout, RecognitionRule};

pub const GRID_SWATH: &str = "ascat-swath-25km";

const FAMILY: ProductFamily = ProductFamily::AscatSomo25;

const PREFIXES: &[&str] = &["ASCA_SMO_"];

const KEYWORDS: &[&str] = &[
    "EUMETSAT",
    "Metop",
    "ASCAT",
    "Soil Moisture",
    "SOMO25",
    "L2",
    "Native",
];

/// Swath nodes per scan line, both swaths together.
const NODES_PER_LINE: usize = 42;

const INSTRUMENT_ID: &str = "ASCA";

const VARIABLES: [(&str, &str, &str); 17] = [
    ("sm", "%", "Surface soil moisture (degree of saturation)"),
    ("sm_noise", "%", "Estimated error of surface soil moisture"),
    ("sm_mean", "%", "Mean surface soil moisture"),
    ("sm_sens", "dB", "Soil moisture sensitivity"),
    ("sig40", "dB", "Backscatter normalized to 40 degrees incidence"),
    ("sig40_noise", "dB", "Estimated error of normalized backscatter"),
    ("slope40", "dB/deg", "Backscatter slope at 40 degrees incidence"),
    ("slope40_noise", "dB/deg", "Estimated error of backscatter slope"),
    ("dry_sig40", "dB", "Dry reference backscatter at 40 degrees"),
    ("wet_sig40", "dB", "Wet reference backscatter at 40 degrees"),
    ("snow_prob", "%", "Snow cover probability"),
    ("frozen_prob", "%", "Frozen soil probability"),
    ("wetland", "%", "Inundation and wetland fraction"),
    ("topo", "%", "Topographic complexity"),
    ("proc_flag", "1", "Processing flags"),
    ("agg_flag", "1", "Aggregation flags"),
    ("corr_flag", "1", "Correction flags"),
];

pub fn descriptor() -> FamilyDescriptor {
    let grid = GridTag::new(GRID_SWATH);
    let bands: Vec<BandSpec> = VARIABLES
        .iter()
        .map(|&(name, unit, description)| BandSpec::new(name, &grid, unit, description))
        .collect();

    FamilyDescriptor {
        family: FAMILY,
        title: "Metop ASCAT Soil Moisture 25 km (SOMO25)",
        description: "Metop ASCAT Soil Moisture 25 km (SOMO25) Level-2 swath product in EPS native (.nat) format.",
        keywords: KEYWORDS,
        license: "proprietary",
        providers: vec![eumetsat()],
        recognition: RecognitionRule::new(EntryLayout::FileOrWrappedDirectory, ".nat", PREFIXES),
        default_bands: bands.iter().map(|b| b.name).collect(),
        bands,
        grids: vec![NativeGrid {
            tag: grid,
            resolution_m: 25_000.0,
        }],
        fetch_unit: FetchUnit::WholeProduct,
    }
}

/// Probe reading the EPS main product header.
#[derive(Debug, Default, Clone, Copy)]
pub struct AscatProbe;

impl AscatProbe {
    fn grid(rows: Option<usize>) -> GridDescription {
        GridDescription {
            tag: GridTag::new(GRID_SWATH),
            resolution_m: 25_000.0,
            crs: GridCrs::Swath,
            shape: rows.map(|rows| GridShape::new(rows, NODES_PER_LINE)),
        }
    }
}

impl ProductProbe for AscatProbe {
    fn name_times(&self, product: &Path) -> Result<TimeRange> {
        let name = product_name(product);
        let mut fields = name.split('_').skip(4);
        let mut next_time = || {
            fields
                .next()
                .and_then(|raw| parse_compact_timestamp(raw).ok())
        };

        match (next_time(), next_time()) {
            (Some(start), Some(end)) => {
                TimeRange::new(start, end).map_err(|e| BridgeError::malformed(FAMILY, product, e))
            }
            _ => Err(BridgeError::malformed(
                FAMILY,
                product,
                "product name carries no sensing period",
            )),
        }
    }

    fn nominal_grids(&self) -> Vec<GridDescription> {
        vec![Self::grid(None)]
    }

    fn read_header(&self, product: &Path, limit: usize) -> Result<ProductHeader> {
        let mphr = EpsMainHeader::read(product, limit).map_err(|e| header_error(FAMILY, product, e))?;

        if let Some(instrument) = mphr.fields.get("INSTRUMENT_ID") {
            if instrument != INSTRUMENT_ID {
                return Err(BridgeError::malformed(
                    FAMILY,
                    product,
                    format!("instrument {instrument}, expected {INSTRUMENT_ID}"),
                ));
            }
        }

        let start = mphr
            .sensing_start()
            .map_err(|e| header_error(FAMILY, product, e))?;
        let end = mphr
            .sensing_end()
            .map_err(|e| header_error(FAMILY, product, e))?;
        let time = combine_times(FAMILY, product, start, end, || self.name_times(product))?;

        let rows = mphr
            .total_mdr()
            .map_err(|e| header_error(FAMILY, product, e))?;

        Ok(ProductHeader {
            time,
            // The swath footprint needs payload geolocation.
            bbox: BoundingBox::global(),
            grids: vec![Self::grid(rows)],
        })
    }
}
