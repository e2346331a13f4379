//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Whole-globe extent, used when a product does not expose its footprint
    /// without reading payload geolocation.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Smallest box enclosing all `(lon, lat)` points.
    ///
    /// Returns `None` for an empty iterator or when any coordinate is not finite.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bbox: Option<BoundingBox> = None;
        for (lon, lat) in points {
            if !lon.is_finite() || !lat.is_finite() {
                return None;
            }
            bbox = Some(match bbox {
                None => BoundingBox::new(lon, lat, lon, lat),
                Some(b) => BoundingBox::new(
                    b.min_lon.min(lon),
                    b.min_lat.min(lat),
                    b.max_lon.max(lon),
                    b.max_lat.max(lat),
                ),
            });
        }
        bbox
    }

    /// Width in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon < other.max_lon
            && self.max_lon > other.min_lon
            && self.min_lat < other.max_lat
            && self.max_lat > other.min_lat
    }

    /// Check if a point is contained within this bbox.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Clamp to valid geographic coordinates.
    pub fn clamp_to_valid(&self) -> Self {
        Self {
            min_lon: self.min_lon.clamp(-180.0, 180.0),
            min_lat: self.min_lat.clamp(-90.0, 90.0),
            max_lon: self.max_lon.clamp(-180.0, 180.0),
            max_lat: self.max_lat.clamp(-90.0, 90.0),
        }
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`, the STAC `bbox` ordering.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::global()
    }
}
