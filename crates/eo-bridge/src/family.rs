//! Product families and their static descriptors.
//!
//! A [`FamilyDescriptor`] is built once per family at registration time and
//! shared read-only (behind `Arc`) by the family's discovery handler and
//! cube loader.

use std::collections::HashSet;
use std::fmt;

use eo_common::GridTag;
use serde::{Deserialize, Serialize};

use crate::recognition::RecognitionRule;

/// Every supported product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductFamily {
    /// Sentinel-3 OLCI Level-1B, reduced resolution
    #[serde(rename = "sentinel3-olci-l1b-err")]
    OlciL1bErr,
    /// Sentinel-3 OLCI Level-1B, full resolution
    #[serde(rename = "sentinel3-olci-l1b-efr")]
    OlciL1bEfr,
    /// Sentinel-3 OLCI Level-2 water, full resolution
    #[serde(rename = "sentinel3-olci-l2-wfr")]
    OlciL2Wfr,
    /// MSG SEVIRI Level-1.5 in native format
    #[serde(rename = "msg-seviri-l1b-native")]
    SeviriL1bNative,
    /// Metop ASCAT soil moisture 25 km swath (SOMO25)
    #[serde(rename = "metop-ascat-somo25")]
    AscatSomo25,
}

impl ProductFamily {
    /// All families in registration order.
    pub const ALL: [ProductFamily; 5] = [
        ProductFamily::OlciL1bErr,
        ProductFamily::OlciL1bEfr,
        ProductFamily::OlciL2Wfr,
        ProductFamily::SeviriL1bNative,
        ProductFamily::AscatSomo25,
    ];

    /// Stable string identifier.
    pub fn id(&self) -> &'static str {
        match self {
            ProductFamily::OlciL1bErr => "sentinel3-olci-l1b-err",
            ProductFamily::OlciL1bEfr => "sentinel3-olci-l1b-efr",
            ProductFamily::OlciL2Wfr => "sentinel3-olci-l2-wfr",
            ProductFamily::SeviriL1bNative => "msg-seviri-l1b-native",
            ProductFamily::AscatSomo25 => "metop-ascat-somo25",
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One band (variable) a family can deliver.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSpec {
    pub name: &'static str,
    pub grid: GridTag,
    pub unit: &'static str,
    pub description: &'static str,
}

impl BandSpec {
    pub fn new(
        name: &'static str,
        grid: &GridTag,
        unit: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            grid: grid.clone(),
            unit,
            description,
        }
    }
}

/// Nominal properties of one native grid of a family.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeGrid {
    pub tag: GridTag,
    /// Nominal ground sampling distance (metres)
    pub resolution_m: f64,
}

/// Smallest unit of work handed to a format reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchUnit {
    /// One reader call per band (one payload file per band on disk)
    PerBand,
    /// One reader call yields every requested band
    WholeProduct,
}

/// Data provider shown in catalog metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub roles: Vec<String>,
    pub url: String,
}

impl Provider {
    pub fn new(name: &str, roles: &[&str], url: &str) -> Self {
        Self {
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            url: url.to_string(),
        }
    }
}

/// Static, read-only description of one family.
#[derive(Debug, Clone)]
pub struct FamilyDescriptor {
    pub family: ProductFamily,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub license: &'static str,
    pub providers: Vec<Provider>,
    pub recognition: RecognitionRule,
    /// Ordered band table; order is the default band order of loaded cubes
    pub bands: Vec<BandSpec>,
    /// Bands loaded when the caller gives no band filter
    pub default_bands: Vec<&'static str>,
    pub grids: Vec<NativeGrid>,
    pub fetch_unit: FetchUnit,
}

impl FamilyDescriptor {
    pub fn band(&self, name: &str) -> Option<&BandSpec> {
        self.bands.iter().find(|b| b.name == name)
    }

    pub fn band_names(&self) -> Vec<&'static str> {
        self.bands.iter().map(|b| b.name).collect()
    }

    pub fn grid(&self, tag: &GridTag) -> Option<&NativeGrid> {
        self.grids.iter().find(|g| &g.tag == tag)
    }

    /// Requested names absent from the band table, in request order.
    pub fn unknown_bands<'a>(&self, requested: &'a [String]) -> Vec<&'a str> {
        let known: HashSet<&str> = self.bands.iter().map(|b| b.name).collect();
        requested
            .iter()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect()
    }

    /// Check the internal consistency of the tables.
    ///
    /// Every band must reference a declared grid, band names must be unique,
    /// and every default band must exist.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for band in &self.bands {
            if !seen.insert(band.name) {
                return Err(format!("{}: duplicate band {}", self.family, band.name));
            }
            if self.grid(&band.grid).is_none() {
                return Err(format!(
                    "{}: band {} references undeclared grid {}",
                    self.family, band.name, band.grid
                ));
            }
        }
        for name in &self.default_bands {
            if !seen.contains(name) {
                return Err(format!("{}: default band {} is not in the table", self.family, name));
            }
        }
        if self.default_bands.is_empty() {
            return Err(format!("{}: empty default band set", self.family));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_ids_are_unique() {
        let ids: HashSet<&str> = ProductFamily::ALL.iter().map(|f| f.id()).collect();
        assert_eq!(ids.len(), ProductFamily::ALL.len());
    }

    #[test]
    fn test_serde_uses_id() {
        let json = serde_json::to_string(&ProductFamily::AscatSomo25).unwrap();
        assert_eq!(json, "\"metop-ascat-somo25\"");
        assert_eq!(ProductFamily::OlciL1bErr.to_string(), "sentinel3-olci-l1b-err");
    }
}
