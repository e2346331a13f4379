//! Metadata discovery without reading payload data.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::family::FamilyDescriptor;
use crate::metadata::CollectionMetadata;
use crate::probe::{product_name, ProductProbe};

/// Per-family metadata extraction.
pub trait DiscoveryHandler: Send + Sync {
    fn discover(&self, path: &Path) -> Result<CollectionMetadata>;
}

/// Discovery from names and bounded header reads.
pub struct HeaderDiscovery {
    descriptor: Arc<FamilyDescriptor>,
    probe: Arc<dyn ProductProbe>,
    header_read_limit: usize,
}

impl HeaderDiscovery {
    pub fn new(
        descriptor: Arc<FamilyDescriptor>,
        probe: Arc<dyn ProductProbe>,
        header_read_limit: usize,
    ) -> Self {
        Self {
            descriptor,
            probe,
            header_read_limit,
        }
    }
}

impl DiscoveryHandler for HeaderDiscovery {
    fn discover(&self, path: &Path) -> Result<CollectionMetadata> {
        let family = self.descriptor.family;
        let payload = self
            .descriptor
            .recognition
            .product_file(path)
            .ok_or_else(|| BridgeError::PathMismatch {
                family,
                path: path.to_path_buf(),
            })?;

        let header = self.probe.read_header(&payload, self.header_read_limit)?;

        debug!(
            family = %family,
            path = %path.display(),
            start = %header.time.start,
            end = %header.time.end,
            "Discovered product"
        );

        Ok(CollectionMetadata::from_descriptor(
            &self.descriptor,
            path.to_string_lossy().into_owned(),
            product_name(path),
            header.bbox,
            header.time,
            header.grids,
        ))
    }
}
