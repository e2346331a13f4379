//! Catalog metadata of one discovered product.

use eo_common::{to_iso_seconds, BoundingBox, GridDescription, GridTag, TimeRange};
use serde::Serialize;
use serde_json::{json, Value};

use crate::family::{BandSpec, FamilyDescriptor, ProductFamily, Provider};

pub const STAC_VERSION: &str = "1.0.0";

/// One entry of the band manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandInfo {
    pub name: String,
    pub grid: GridTag,
    pub unit: String,
    pub description: String,
}

impl From<&BandSpec> for BandInfo {
    fn from(spec: &BandSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            grid: spec.grid.clone(),
            unit: spec.unit.to_string(),
            description: spec.description.to_string(),
        }
    }
}

/// Metadata of one product, computed on demand from names and headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionMetadata {
    /// Product path as a string
    pub id: String,
    pub family: ProductFamily,
    pub title: String,
    pub description: String,
    pub bbox: BoundingBox,
    pub time: TimeRange,
    pub bands: Vec<BandInfo>,
    /// Native grids, in band table order of first use
    pub grids: Vec<GridDescription>,
    pub keywords: Vec<String>,
    pub providers: Vec<Provider>,
    pub license: String,
}

impl CollectionMetadata {
    /// Fill the static parts from a descriptor.
    pub fn from_descriptor(
        descriptor: &FamilyDescriptor,
        id: String,
        product_name: &str,
        bbox: BoundingBox,
        time: TimeRange,
        grids: Vec<GridDescription>,
    ) -> Self {
        Self {
            id,
            family: descriptor.family,
            title: format!("{} ({})", descriptor.title, product_name),
            description: descriptor.description.to_string(),
            bbox,
            time,
            bands: descriptor.bands.iter().map(BandInfo::from).collect(),
            grids,
            keywords: descriptor.keywords.iter().map(|k| k.to_string()).collect(),
            providers: descriptor.providers.clone(),
            license: descriptor.license.to_string(),
        }
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn grid(&self, tag: &GridTag) -> Option<&GridDescription> {
        self.grids.iter().find(|g| &g.tag == tag)
    }

    /// Render as a STAC collection document.
    pub fn to_stac(&self) -> Value {
        let bbox = self.bbox.to_array();
        let start = to_iso_seconds(&self.time.start);
        let end = to_iso_seconds(&self.time.end);
        let band_names = self.band_names();

        let eo_bands: Vec<Value> = self
            .bands
            .iter()
            .map(|b| {
                json!({
                    "name": b.name,
                    "description": b.description,
                    "unit": b.unit,
                    "grid": b.grid,
                })
            })
            .collect();

        let grids: Vec<Value> = self
            .grids
            .iter()
            .map(|g| {
                json!({
                    "tag": g.tag,
                    "resolution": g.resolution_m,
                    "shape": g.shape.map(|s| [s.rows, s.cols]),
                    "crs": g.crs,
                })
            })
            .collect();

        json!({
            "stac_version": STAC_VERSION,
            "type": "Collection",
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "license": self.license,
            "keywords": self.keywords,
            "providers": self.providers,
            "links": [],
            "extent": {
                "spatial": { "bbox": [bbox] },
                "temporal": { "interval": [[start, end]] },
            },
            "cube:dimensions": {
                "x": {
                    "type": "spatial",
                    "axis": "x",
                    "extent": [bbox[0], bbox[2]],
                    "reference_system": "EPSG:4326",
                },
                "y": {
                    "type": "spatial",
                    "axis": "y",
                    "extent": [bbox[1], bbox[3]],
                    "reference_system": "EPSG:4326",
                },
                "t": { "type": "temporal", "extent": [start, end] },
                "bands": { "type": "bands", "values": band_names },
            },
            "summaries": {
                "eo:bands": eo_bands,
                "eo_bridge:family": self.family,
                "eo_bridge:grids": grids,
            },
        })
    }
}
