//! Header-only product probes.
//!
//! A probe knows how one family encodes its acquisition period in the
//! product name and which header or manifest carries the catalog fields.
//! Probes never touch payload data.

use std::path::Path;

use eo_common::{BoundingBox, GridDescription, GridTag, TimeRange};

use crate::error::Result;

/// What a probe learned about one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductHeader {
    pub time: TimeRange,
    pub bbox: BoundingBox,
    /// Every native grid of the family, sized when the header says so
    pub grids: Vec<GridDescription>,
}

impl ProductHeader {
    pub fn grid(&self, tag: &GridTag) -> Option<&GridDescription> {
        self.grids.iter().find(|g| &g.tag == tag)
    }
}

/// Family-specific header access.
///
/// `product` is the payload entry resolved by the recognition rule: the
/// SAFE directory or the native file.
pub trait ProductProbe: Send + Sync {
    /// Sensing period encoded in the product name.
    fn name_times(&self, product: &Path) -> Result<TimeRange>;

    /// Native grids as known without reading any header (unsized).
    fn nominal_grids(&self) -> Vec<GridDescription>;

    /// Read the header, at most `limit` bytes of it.
    fn read_header(&self, product: &Path, limit: usize) -> Result<ProductHeader>;
}

/// File or directory name as UTF-8, empty when not representable.
pub(crate) fn product_name(product: &Path) -> &str {
    product
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
}
