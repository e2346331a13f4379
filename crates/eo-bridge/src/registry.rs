//! Format registry and dispatch.
//!
//! The registry is filled once (usually by [`register_all`]) and then only
//! read. It holds no locks; share it by reference.
//!
//! [`register_all`]: crate::families::register_all

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::BridgeConfig;
use crate::cube::{BandRequest, Cube};
use crate::discovery::DiscoveryHandler;
use crate::error::{BridgeError, Result};
use crate::families::register_all;
use crate::family::{FamilyDescriptor, ProductFamily};
use crate::loader::CubeLoader;
use crate::metadata::CollectionMetadata;
use crate::reader::FormatReaders;

/// Descriptor, discovery handler and cube loader of one family.
#[derive(Clone)]
pub struct FamilyEntry {
    pub descriptor: Arc<FamilyDescriptor>,
    pub discovery: Arc<dyn DiscoveryHandler>,
    pub loader: Arc<dyn CubeLoader>,
}

impl FamilyEntry {
    pub fn new(
        descriptor: Arc<FamilyDescriptor>,
        discovery: Arc<dyn DiscoveryHandler>,
        loader: Arc<dyn CubeLoader>,
    ) -> Self {
        Self {
            descriptor,
            discovery,
            loader,
        }
    }

    pub fn family(&self) -> ProductFamily {
        self.descriptor.family
    }
}

impl fmt::Debug for FamilyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyEntry")
            .field("family", &self.descriptor.family)
            .field("recognition", &self.descriptor.recognition)
            .finish()
    }
}

/// Ordered table of registered families.
#[derive(Default)]
pub struct FormatRegistry {
    entries: Vec<FamilyEntry>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported family.
    pub fn with_all_families(readers: &FormatReaders, config: &BridgeConfig) -> Result<Self> {
        let mut registry = Self::new();
        register_all(&mut registry, readers, config)?;
        Ok(registry)
    }

    /// Add an entry, replacing an existing entry of the same family in place.
    ///
    /// Fails without modifying the table when the recognition rule could
    /// claim names of another registered family.
    pub fn register(&mut self, entry: FamilyEntry) -> Result<()> {
        let family = entry.family();

        if let Some(existing) = self.entries.iter().find(|e| {
            e.family() != family
                && e.descriptor
                    .recognition
                    .overlaps(&entry.descriptor.recognition)
        }) {
            return Err(BridgeError::OverlappingRecognition {
                family,
                existing: existing.family(),
            });
        }

        match self.entries.iter_mut().find(|e| e.family() == family) {
            Some(slot) => {
                debug!(family = %family, "Replacing registered family");
                *slot = entry;
            }
            None => {
                debug!(family = %family, "Registering family");
                self.entries.push(entry);
            }
        }

        Ok(())
    }

    /// Family owning `path`, checked in registration order.
    pub fn resolve(&self, path: &Path) -> Result<&FamilyEntry> {
        let mut matching = self
            .entries
            .iter()
            .filter(|e| e.descriptor.recognition.matches(path));

        let Some(first) = matching.next() else {
            return Err(BridgeError::UnrecognizedProduct {
                path: path.to_path_buf(),
            });
        };

        let others: Vec<ProductFamily> = matching.map(FamilyEntry::family).collect();
        if !others.is_empty() {
            let mut families = vec![first.family()];
            families.extend(others);
            return Err(BridgeError::AmbiguousProduct {
                path: path.to_path_buf(),
                families,
            });
        }

        debug!(path = %path.display(), family = %first.family(), "Resolved product");
        Ok(first)
    }

    pub fn get(&self, family: ProductFamily) -> Option<&FamilyEntry> {
        self.entries.iter().find(|e| e.family() == family)
    }

    /// Registered families in registration order.
    pub fn families(&self) -> Vec<ProductFamily> {
        self.entries.iter().map(FamilyEntry::family).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `path` and run its family's discovery.
    pub fn discover(&self, path: &Path) -> Result<CollectionMetadata> {
        self.resolve(path)?.discovery.discover(path)
    }

    /// Resolve `path` and build a lazy cube with its family's loader.
    pub fn load(
        &self,
        path: &Path,
        bands: Option<BandRequest>,
        fetch_metadata: bool,
    ) -> Result<Cube> {
        self.resolve(path)?.loader.load(path, bands, fetch_metadata)
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("families", &self.families())
            .finish()
    }
}
