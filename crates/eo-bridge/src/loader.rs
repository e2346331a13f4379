//! Lazy cube loading.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::cube::{BandRequest, Cube, CubeGraph};
use crate::error::{BridgeError, Result};
use crate::family::FamilyDescriptor;
use crate::grid_check::check_grid_compatibility;
use crate::probe::ProductProbe;
use crate::reader::FormatReader;

/// Per-family cube construction.
pub trait CubeLoader: Send + Sync {
    /// Build a lazy cube. No format reader is called here.
    ///
    /// `None` or an empty request loads the family default bands. With
    /// `fetch_metadata` the header is read for exact times and sized y/x
    /// axes; otherwise times come from the product name and y/x stay
    /// unsized until materialization.
    fn load(&self, path: &Path, bands: Option<BandRequest>, fetch_metadata: bool) -> Result<Cube>;
}

/// Loader shared by every family; behavior comes from the descriptor and probe.
pub struct NativeCubeLoader {
    descriptor: Arc<FamilyDescriptor>,
    probe: Arc<dyn ProductProbe>,
    reader: Arc<dyn FormatReader>,
    header_read_limit: usize,
}

impl NativeCubeLoader {
    pub fn new(
        descriptor: Arc<FamilyDescriptor>,
        probe: Arc<dyn ProductProbe>,
        reader: Arc<dyn FormatReader>,
        header_read_limit: usize,
    ) -> Self {
        Self {
            descriptor,
            probe,
            reader,
            header_read_limit,
        }
    }

    fn effective_bands(&self, bands: Option<BandRequest>) -> Result<Vec<String>> {
        let requested = bands.filter(|b| !b.is_empty());

        let Some(requested) = requested else {
            return Ok(self
                .descriptor
                .default_bands
                .iter()
                .map(|b| b.to_string())
                .collect());
        };

        let unknown = self.descriptor.unknown_bands(requested.as_slice());
        if !unknown.is_empty() {
            return Err(BridgeError::UnsupportedBand {
                family: self.descriptor.family,
                bands: unknown.iter().map(|b| b.to_string()).collect(),
                available: self
                    .descriptor
                    .band_names()
                    .iter()
                    .map(|b| b.to_string())
                    .collect(),
            });
        }

        Ok(requested.as_slice().to_vec())
    }
}

impl CubeLoader for NativeCubeLoader {
    fn load(&self, path: &Path, bands: Option<BandRequest>, fetch_metadata: bool) -> Result<Cube> {
        let family = self.descriptor.family;
        let payload = self
            .descriptor
            .recognition
            .product_file(path)
            .ok_or_else(|| BridgeError::PathMismatch {
                family,
                path: path.to_path_buf(),
            })?;

        let bands = self.effective_bands(bands)?;
        let tag = check_grid_compatibility(&self.descriptor, &bands)?;

        let graph = CubeGraph::plan(
            family,
            &payload,
            &bands,
            self.descriptor.fetch_unit,
            Arc::clone(&self.reader),
        );

        let (time, grids, sized) = if fetch_metadata {
            let header = self.probe.read_header(&payload, self.header_read_limit)?;
            (header.time, header.grids, true)
        } else {
            (self.probe.name_times(&payload)?, self.probe.nominal_grids(), false)
        };

        let grid = grids
            .into_iter()
            .find(|g| g.tag == tag)
            .ok_or_else(|| {
                BridgeError::malformed(family, path, format!("no grid description for {tag}"))
            })?;

        let (y, x) = if sized {
            (grid.y_coords(), grid.x_coords())
        } else {
            (None, None)
        };

        debug!(
            family = %family,
            path = %path.display(),
            grid = %tag,
            bands = bands.len(),
            reads = graph.reads().len(),
            fetch_metadata,
            "Built lazy cube"
        );

        Ok(Cube {
            family,
            path: path.to_path_buf(),
            payload,
            time: time.midpoint(),
            bands,
            grid,
            y,
            x,
            graph,
        })
    }
}
