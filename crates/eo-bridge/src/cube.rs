//! Lazy cubes.
//!
//! A [`Cube`] carries labels and a [`CubeGraph`] of pending reads. Nothing
//! is decoded until [`Cube::materialize`] runs the graph.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eo_common::{GridDescription, GridShape, GridTag};
use ndarray::{s, Array4};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::family::{FetchUnit, ProductFamily};
use crate::reader::{FormatReader, Geolocation, RawDataset, ReadRequest, ReaderError};

/// Dimension names, in storage order.
pub const DIMS: [&str; 4] = ["time", "band", "y", "x"];

/// Ordered, de-duplicated band names. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandRequest(Vec<String>);

impl BandRequest {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Self(out)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for BandRequest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for BandRequest {
    fn from(names: [S; N]) -> Self {
        Self::new(names)
    }
}

/// One reader invocation not yet performed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRead {
    pub request: ReadRequest,
}

/// Computation graph behind a cube: independent reads whose results are
/// stacked along the band axis.
#[derive(Clone)]
pub struct CubeGraph {
    reader: Arc<dyn FormatReader>,
    fetch_unit: FetchUnit,
    reads: Vec<PendingRead>,
}

impl CubeGraph {
    /// Plan reads of `bands` from `payload` according to the fetch unit.
    pub fn plan(
        family: ProductFamily,
        payload: &Path,
        bands: &[String],
        fetch_unit: FetchUnit,
        reader: Arc<dyn FormatReader>,
    ) -> Self {
        let request = |bands: Vec<String>| PendingRead {
            request: ReadRequest {
                family,
                path: payload.to_path_buf(),
                bands,
            },
        };

        let reads = match fetch_unit {
            FetchUnit::PerBand => bands.iter().map(|b| request(vec![b.clone()])).collect(),
            FetchUnit::WholeProduct if bands.is_empty() => Vec::new(),
            FetchUnit::WholeProduct => vec![request(bands.to_vec())],
        };

        Self {
            reader,
            fetch_unit,
            reads,
        }
    }

    pub fn reads(&self) -> &[PendingRead] {
        &self.reads
    }

    pub fn fetch_unit(&self) -> FetchUnit {
        self.fetch_unit
    }

    fn execute(&self) -> std::result::Result<Vec<RawDataset>, (PathBuf, ReaderError)> {
        self.reads
            .iter()
            .map(|pending| {
                self.reader
                    .read(&pending.request)
                    .map_err(|e| (pending.request.path.clone(), e))
            })
            .collect()
    }
}

impl fmt::Debug for CubeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeGraph")
            .field("fetch_unit", &self.fetch_unit)
            .field("reads", &self.reads)
            .finish()
    }
}

/// Lazily evaluated `(time, band, y, x)` array of one product.
#[derive(Debug, Clone)]
pub struct Cube {
    pub family: ProductFamily,
    /// Product path the cube was loaded from
    pub path: PathBuf,
    /// Payload entry handed to the reader
    pub payload: PathBuf,
    /// Single time label, the acquisition midpoint
    pub time: DateTime<Utc>,
    pub bands: Vec<String>,
    pub grid: GridDescription,
    /// `None` until materialized when metadata was not fetched
    pub y: Option<Vec<f64>>,
    pub x: Option<Vec<f64>>,
    pub graph: CubeGraph,
}

impl Cube {
    pub fn dimensions(&self) -> [&'static str; 4] {
        DIMS
    }

    /// Dimension lengths; y and x are `None` while unsized.
    pub fn shape(&self) -> [Option<usize>; 4] {
        [
            Some(1),
            Some(self.bands.len()),
            self.y.as_ref().map(Vec::len),
            self.x.as_ref().map(Vec::len),
        ]
    }

    pub fn band_names(&self) -> &[String] {
        &self.bands
    }

    pub fn grid_tag(&self) -> &GridTag {
        &self.grid.tag
    }

    /// Keep a subset of the cube's bands, in the order given. No read happens.
    pub fn filter_bands(&self, bands: &BandRequest) -> Result<Cube> {
        let unknown: Vec<String> = bands
            .as_slice()
            .iter()
            .filter(|b| !self.bands.contains(b))
            .cloned()
            .collect();
        if !unknown.is_empty() || bands.is_empty() {
            return Err(BridgeError::UnsupportedBand {
                family: self.family,
                bands: unknown,
                available: self.bands.clone(),
            });
        }

        let kept = bands.as_slice().to_vec();
        let graph = CubeGraph::plan(
            self.family,
            &self.payload,
            &kept,
            self.graph.fetch_unit,
            Arc::clone(&self.graph.reader),
        );

        Ok(Cube {
            bands: kept,
            graph,
            ..self.clone()
        })
    }

    /// Run every pending read and stack the results.
    ///
    /// Reader errors, missing variables and shape disagreements all surface
    /// as `ReaderFailure` carrying the cause.
    pub fn materialize(&self) -> Result<MaterializedCube> {
        debug!(
            family = %self.family,
            path = %self.path.display(),
            reads = self.graph.reads.len(),
            bands = self.bands.len(),
            "Materializing cube"
        );

        let datasets = self
            .graph
            .execute()
            .map_err(|(path, source)| BridgeError::reader_failure(path, source))?;

        let mut by_name = HashMap::new();
        let mut geolocation: Option<Geolocation> = None;
        for dataset in &datasets {
            for variable in &dataset.variables {
                by_name.entry(variable.name.as_str()).or_insert(&variable.values);
            }
            if geolocation.is_none() {
                geolocation = dataset.geolocation.clone();
            }
        }

        let fail = |source: ReaderError| BridgeError::reader_failure(&self.payload, source);

        let mut ordered = Vec::with_capacity(self.bands.len());
        for band in &self.bands {
            let values = by_name
                .get(band.as_str())
                .ok_or_else(|| fail(ReaderError::MissingVariable(band.clone())))?;
            ordered.push((band, *values));
        }

        let expected = match (self.grid.shape, ordered.first()) {
            (Some(shape), _) => (shape.rows, shape.cols),
            (None, Some((_, values))) => values.dim(),
            (None, None) => (0, 0),
        };

        let mut data = Array4::<f32>::zeros((1, ordered.len(), expected.0, expected.1));
        for (i, (band, values)) in ordered.iter().enumerate() {
            if values.dim() != expected {
                return Err(fail(ReaderError::ShapeMismatch {
                    variable: band.to_string(),
                    expected,
                    found: values.dim(),
                }));
            }
            data.slice_mut(s![0, i, .., ..]).assign(*values);
        }

        if let Some(geo) = &geolocation {
            for (name, found) in [("lat", geo.lat.dim()), ("lon", geo.lon.dim())] {
                if found != expected {
                    return Err(fail(ReaderError::ShapeMismatch {
                        variable: name.to_string(),
                        expected,
                        found,
                    }));
                }
            }
        }

        let sized = GridDescription {
            shape: Some(GridShape::new(expected.0, expected.1)),
            ..self.grid.clone()
        };
        let y = match &self.y {
            Some(y) => y.clone(),
            None => sized.y_coords().unwrap_or_default(),
        };
        let x = match &self.x {
            Some(x) => x.clone(),
            None => sized.x_coords().unwrap_or_default(),
        };

        Ok(MaterializedCube {
            time: self.time,
            bands: self.bands.clone(),
            y,
            x,
            data,
            geolocation,
        })
    }
}

/// Decoded cube.
#[derive(Debug, Clone)]
pub struct MaterializedCube {
    pub time: DateTime<Utc>,
    pub bands: Vec<String>,
    pub y: Vec<f64>,
    pub x: Vec<f64>,
    /// `(time, band, y, x)`
    pub data: Array4<f32>,
    pub geolocation: Option<Geolocation>,
}

impl MaterializedCube {
    pub fn band_index(&self, name: &str) -> Option<usize> {
        self.bands.iter().position(|b| b == name)
    }
}
