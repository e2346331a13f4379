//! Sentinel-3 OLCI products in SAFE layout.
//!
//! Product directories are named like
//! `S3A_OL_1_ERR____20200101T100000_20200101T104000_20200102T120000_..._.SEN3`:
//! a 16-character mission/type field, then sensing start and stop.

use std::path::Path;

use eo_common::{
    parse_compact_timestamp, BoundingBox, GridCrs, GridDescription, GridShape, GridTag, TimeRange,
};
use product_headers::SafeManifest;

use crate::error::{BridgeError, Result};
use crate::families::{combine_times, esa, eumetsat, header_error};
use crate::family::{BandSpec, FamilyDescriptor, FetchUnit, NativeGrid, ProductFamily};
use crate::probe::{product_name, ProductHeader, ProductProbe};
use crate::recognition::{EntryLayout, RecognitionRule};

pub const GRID_RR: &str = "olci-rr-1200m";
pub const GRID_FR: &str = "olci-fr-300m";

const SAFE_SUFFIX: &str = ".SEN3";

const ERR_PREFIXES: &[&str] = &["S3A_OL_1_ERR", "S3B_OL_1_ERR"];
const EFR_PREFIXES: &[&str] = &["S3A_OL_1_EFR", "S3B_OL_1_EFR"];
const WFR_PREFIXES: &[&str] = &["S3A_OL_2_WFR", "S3B_OL_2_WFR"];

const KEYWORDS: &[&str] = &["Copernicus", "Sentinel-3", "OLCI", "SAFE"];

/// OLCI channels Oa01..Oa21.
const CHANNELS: [(&str, &str); 21] = [
    ("Oa01", "TOA radiance at 400 nm"),
    ("Oa02", "TOA radiance at 412.5 nm"),
    ("Oa03", "TOA radiance at 442.5 nm"),
    ("Oa04", "TOA radiance at 490 nm"),
    ("Oa05", "TOA radiance at 510 nm"),
    ("Oa06", "TOA radiance at 560 nm"),
    ("Oa07", "TOA radiance at 620 nm"),
    ("Oa08", "TOA radiance at 665 nm"),
    ("Oa09", "TOA radiance at 673.75 nm"),
    ("Oa10", "TOA radiance at 681.25 nm"),
    ("Oa11", "TOA radiance at 708.75 nm"),
    ("Oa12", "TOA radiance at 753.75 nm"),
    ("Oa13", "TOA radiance at 761.25 nm"),
    ("Oa14", "TOA radiance at 764.375 nm"),
    ("Oa15", "TOA radiance at 767.5 nm"),
    ("Oa16", "TOA radiance at 778.75 nm"),
    ("Oa17", "TOA radiance at 865 nm"),
    ("Oa18", "TOA radiance at 885 nm"),
    ("Oa19", "TOA radiance at 900 nm"),
    ("Oa20", "TOA radiance at 940 nm"),
    ("Oa21", "TOA radiance at 1020 nm"),
];

/// Channels delivered as water-leaving reflectance in WFR products.
const WFR_REFLECTANCES: [(&str, &str); 16] = [
    ("Oa01_reflectance", "Water-leaving reflectance at 400 nm"),
    ("Oa02_reflectance", "Water-leaving reflectance at 412.5 nm"),
    ("Oa03_reflectance", "Water-leaving reflectance at 442.5 nm"),
    ("Oa04_reflectance", "Water-leaving reflectance at 490 nm"),
    ("Oa05_reflectance", "Water-leaving reflectance at 510 nm"),
    ("Oa06_reflectance", "Water-leaving reflectance at 560 nm"),
    ("Oa07_reflectance", "Water-leaving reflectance at 620 nm"),
    ("Oa08_reflectance", "Water-leaving reflectance at 665 nm"),
    ("Oa09_reflectance", "Water-leaving reflectance at 673.75 nm"),
    ("Oa10_reflectance", "Water-leaving reflectance at 681.25 nm"),
    ("Oa11_reflectance", "Water-leaving reflectance at 708.75 nm"),
    ("Oa12_reflectance", "Water-leaving reflectance at 753.75 nm"),
    ("Oa16_reflectance", "Water-leaving reflectance at 778.75 nm"),
    ("Oa17_reflectance", "Water-leaving reflectance at 865 nm"),
    ("Oa18_reflectance", "Water-leaving reflectance at 885 nm"),
    ("Oa21_reflectance", "Water-leaving reflectance at 1020 nm"),
];

/// Geometry, flags and meteo annotations of Level-1B products.
const L1B_ANNOTATIONS: [(&str, &str, &str); 10] = [
    ("solar_zenith_angle", "degrees", "Sun zenith angle"),
    ("solar_azimuth_angle", "degrees", "Sun azimuth angle"),
    ("satellite_zenith_angle", "degrees", "Viewing zenith angle"),
    ("satellite_azimuth_angle", "degrees", "Viewing azimuth angle"),
    ("quality_flags", "1", "Classification and quality flags"),
    ("mask", "1", "Derived land/water/cloud mask"),
    ("humidity", "%", "Relative humidity (ECMWF)"),
    ("total_ozone", "kg.m-2", "Total columnar ozone (ECMWF)"),
    ("sea_level_pressure", "hPa", "Mean sea level pressure (ECMWF)"),
    (
        "total_columnar_water_vapour",
        "kg.m-2",
        "Total columnar water vapour (ECMWF)",
    ),
];

/// Number of annotations loaded by default; the ECMWF meteo fields are opt-in.
const L1B_DEFAULT_ANNOTATIONS: usize = 6;

const WFR_PRODUCTS: [(&str, &str, &str); 11] = [
    ("chl_nn", "mg.m-3", "Chlorophyll-a concentration (neural net)"),
    ("chl_oc4me", "mg.m-3", "Chlorophyll-a concentration (OC4Me)"),
    ("tsm_nn", "g.m-3", "Total suspended matter"),
    ("iwv", "kg.m-2", "Integrated water vapour column"),
    ("par", "uEinstein.m-2.s-1", "Photosynthetically active radiation"),
    ("trsp", "m", "Secchi depth transparency"),
    ("kd490_m07", "m-1", "Diffuse attenuation coefficient at 490 nm"),
    ("a865", "1", "Aerosol Angstrom exponent"),
    ("t865", "1", "Aerosol optical thickness at 865 nm"),
    ("adg443_nn", "m-1", "CDM absorption at 443 nm"),
    ("wqsf", "1", "Water quality and science flags"),
];

/// Product-type code in the manifest and the directory name.
fn product_type(family: ProductFamily) -> &'static str {
    match family {
        ProductFamily::OlciL1bEfr => "OL_1_EFR",
        ProductFamily::OlciL2Wfr => "OL_2_WFR",
        _ => "OL_1_ERR",
    }
}

fn l1b_bands(grid: &GridTag) -> Vec<BandSpec> {
    let radiances = CHANNELS
        .iter()
        .map(|&(name, description)| BandSpec::new(name, grid, "mW.m-2.sr-1.nm-1", description));
    let annotations = L1B_ANNOTATIONS
        .iter()
        .map(|&(name, unit, description)| BandSpec::new(name, grid, unit, description));

    radiances.chain(annotations).collect()
}

fn l1b_defaults() -> Vec<&'static str> {
    CHANNELS
        .iter()
        .map(|(name, _)| *name)
        .chain(
            L1B_ANNOTATIONS[..L1B_DEFAULT_ANNOTATIONS]
                .iter()
                .map(|(name, _, _)| *name),
        )
        .collect()
}

fn wfr_bands(grid: &GridTag) -> Vec<BandSpec> {
    WFR_REFLECTANCES
        .iter()
        .map(|&(name, description)| BandSpec::new(name, grid, "1", description))
        .chain(
            WFR_PRODUCTS
                .iter()
                .map(|&(name, unit, description)| BandSpec::new(name, grid, unit, description)),
        )
        .collect()
}

/// Descriptor of one OLCI family.
pub fn descriptor(family: ProductFamily) -> FamilyDescriptor {
    let (grid, resolution_m) = match family {
        ProductFamily::OlciL1bErr => (GridTag::new(GRID_RR), 1200.0),
        _ => (GridTag::new(GRID_FR), 300.0),
    };

    let (title, description, prefixes) = match family {
        ProductFamily::OlciL1bEfr => (
            "Sentinel-3 OLCI L1B Full Resolution",
            "Sentinel-3 OLCI Level-1B top-of-atmosphere radiances at 300 m (EFR) in SAFE format.",
            EFR_PREFIXES,
        ),
        ProductFamily::OlciL2Wfr => (
            "Sentinel-3 OLCI L2 Water Full Resolution",
            "Sentinel-3 OLCI Level-2 water reflectances and ocean colour products at 300 m (WFR) in SAFE format.",
            WFR_PREFIXES,
        ),
        _ => (
            "Sentinel-3 OLCI L1B Reduced Resolution",
            "Sentinel-3 OLCI Level-1B top-of-atmosphere radiances at 1.2 km (ERR) in SAFE format.",
            ERR_PREFIXES,
        ),
    };

    let (bands, default_bands) = if family == ProductFamily::OlciL2Wfr {
        let bands = wfr_bands(&grid);
        let defaults = bands.iter().map(|b| b.name).collect();
        (bands, defaults)
    } else {
        (l1b_bands(&grid), l1b_defaults())
    };

    FamilyDescriptor {
        family,
        title,
        description,
        keywords: KEYWORDS,
        license: "proprietary",
        providers: vec![esa(), eumetsat()],
        recognition: RecognitionRule::new(EntryLayout::Directory, SAFE_SUFFIX, prefixes),
        bands,
        default_bands,
        grids: vec![NativeGrid {
            tag: grid,
            resolution_m,
        }],
        fetch_unit: FetchUnit::PerBand,
    }
}

/// Probe reading `xfdumanifest.xml`.
#[derive(Debug, Clone)]
pub struct OlciProbe {
    family: ProductFamily,
    grid: NativeGrid,
}

impl OlciProbe {
    pub fn new(descriptor: &FamilyDescriptor) -> Result<Self> {
        let grid = descriptor.grids.first().cloned().ok_or_else(|| {
            BridgeError::Config(format!("{} declares no grid", descriptor.family))
        })?;
        Ok(Self {
            family: descriptor.family,
            grid,
        })
    }

    fn grid(&self, shape: Option<GridShape>) -> GridDescription {
        GridDescription {
            tag: self.grid.tag.clone(),
            resolution_m: self.grid.resolution_m,
            crs: GridCrs::Swath,
            shape,
        }
    }
}

impl ProductProbe for OlciProbe {
    fn name_times(&self, product: &Path) -> Result<TimeRange> {
        let name = product_name(product);
        let field = |range: std::ops::Range<usize>| {
            name.get(range)
                .and_then(|raw| parse_compact_timestamp(raw).ok())
        };

        match (field(16..31), field(32..47)) {
            (Some(start), Some(stop)) => TimeRange::new(start, stop)
                .map_err(|e| BridgeError::malformed(self.family, product, e)),
            _ => Err(BridgeError::malformed(
                self.family,
                product,
                "product name carries no sensing period",
            )),
        }
    }

    fn nominal_grids(&self) -> Vec<GridDescription> {
        vec![self.grid(None)]
    }

    fn read_header(&self, product: &Path, limit: usize) -> Result<ProductHeader> {
        let manifest =
            SafeManifest::read(product, limit).map_err(|e| header_error(self.family, product, e))?;

        let expected = product_type(self.family);
        if let Some(found) = &manifest.product_type {
            if found.trim_end_matches('_') != expected {
                return Err(BridgeError::malformed(
                    self.family,
                    product,
                    format!("manifest product type {found}, expected {expected}"),
                ));
            }
        }

        let time = combine_times(self.family, product, manifest.start_time, manifest.stop_time, || {
            self.name_times(product)
        })?;

        Ok(ProductHeader {
            time,
            bbox: manifest.footprint_bbox().unwrap_or_else(BoundingBox::global),
            grids: vec![self.grid(manifest.image_size)],
        })
    }
}
