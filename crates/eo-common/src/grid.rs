//! Native grid descriptions.
//!
//! A grid tag names one native resolution/geolocation scheme. Bands that
//! share a tag stack without resampling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GeostationaryDisk;

/// Identifier of one native grid, e.g. `seviri-vis-ir-3km`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridTag(String);

impl GridTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of rows (y) and columns (x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// How the y/x axes of a grid relate to the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GridCrs {
    /// Fixed geostationary projection, axes in metres from nadir.
    Geostationary { sub_lon: f64 },
    /// Instrument swath, axes are scan line / pixel indices and geolocation
    /// comes as 2-D latitude/longitude from the payload.
    Swath,
}

/// Native grid of one product, as far as headers describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDescription {
    pub tag: GridTag,
    /// Nominal ground sampling distance (metres)
    pub resolution_m: f64,
    pub crs: GridCrs,
    /// Known only when the header carries the image size
    pub shape: Option<GridShape>,
}

impl GridDescription {
    /// y coordinates, north to south. `None` when the shape is unknown.
    pub fn y_coords(&self) -> Option<Vec<f64>> {
        let shape = self.shape?;
        Some(match self.crs {
            GridCrs::Geostationary { .. } => {
                GeostationaryDisk::axis_coords(shape.rows, self.resolution_m, false)
            }
            GridCrs::Swath => index_coords(shape.rows),
        })
    }

    /// x coordinates, west to east. `None` when the shape is unknown.
    pub fn x_coords(&self) -> Option<Vec<f64>> {
        let shape = self.shape?;
        Some(match self.crs {
            GridCrs::Geostationary { .. } => {
                GeostationaryDisk::axis_coords(shape.cols, self.resolution_m, true)
            }
            GridCrs::Swath => index_coords(shape.cols),
        })
    }
}

fn index_coords(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}
