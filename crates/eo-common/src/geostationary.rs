//! Geostationary full-disk geometry.
//!
//! MSG SEVIRI images the full Earth disk from a fixed point above the
//! equator. The native grid is expressed in projection metres centred on
//! the sub-satellite point.

use crate::BoundingBox;

/// Satellite height above the Earth surface used by the MSG ground segment (metres).
pub const MSG_PERSPECTIVE_HEIGHT: f64 = 35_785_831.0;
/// Equatorial radius of the MSG reference ellipsoid (metres).
pub const MSG_SEMI_MAJOR_AXIS: f64 = 6_378_169.0;
/// Polar radius of the MSG reference ellipsoid (metres).
pub const MSG_SEMI_MINOR_AXIS: f64 = 6_356_583.8;

/// Geostationary viewing geometry for one satellite position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeostationaryDisk {
    /// Longitude of the sub-satellite point (degrees)
    pub sub_lon: f64,
    /// Perspective point height above the surface (metres)
    pub perspective_point_height: f64,
    /// Semi-major axis (metres)
    pub req: f64,
    /// Semi-minor axis (metres)
    pub rpol: f64,
}

impl GeostationaryDisk {
    /// Meteosat Second Generation geometry at the given sub-satellite longitude.
    pub fn meteosat(sub_lon: f64) -> Self {
        Self {
            sub_lon,
            perspective_point_height: MSG_PERSPECTIVE_HEIGHT,
            req: MSG_SEMI_MAJOR_AXIS,
            rpol: MSG_SEMI_MINOR_AXIS,
        }
    }

    /// Geocentric angle between nadir and the visible limb (degrees).
    pub fn limb_angle_deg(&self) -> f64 {
        let h = self.perspective_point_height + self.req;
        (self.req / h).acos().to_degrees()
    }

    /// Geographic extent of the visible disk.
    ///
    /// The longitude span collapses to the full range when the disk crosses
    /// the antimeridian.
    pub fn visible_bbox(&self) -> BoundingBox {
        let limb = self.limb_angle_deg();
        let west = self.sub_lon - limb;
        let east = self.sub_lon + limb;
        let (min_lon, max_lon) = if west < -180.0 || east > 180.0 {
            (-180.0, 180.0)
        } else {
            (west, east)
        };
        BoundingBox::new(min_lon, -limb, max_lon, limb)
    }

    /// Cell-centre coordinates of `n` cells of size `step`, centred on nadir.
    ///
    /// Ascending runs west to east (x); descending runs north to south (y).
    pub fn axis_coords(n: usize, step: f64, ascending: bool) -> Vec<f64> {
        let centre = (n as f64 - 1.0) / 2.0;
        (0..n)
            .map(|i| {
                let offset = (i as f64 - centre) * step;
                if ascending {
                    offset
                } else {
                    -offset
                }
            })
            .collect()
    }
}
