//! Synthetic pixel data for fake format readers.
//!
//! Values follow fixed patterns so tests can check that bands land at the
//! right index of a materialized cube.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid filled with a value derived from the band name.
///
/// The value is the sum of the name's bytes, so two different band names
/// almost always produce different constants.
pub fn create_band_grid(band: &str, width: usize, height: usize) -> Vec<f32> {
    vec![band_marker(band); width * height]
}

/// Marker value written by [`create_band_grid`] for `band`.
pub fn band_marker(band: &str) -> f32 {
    band.bytes().map(u32::from).sum::<u32>() as f32
}

/// Latitude/longitude grids for a swath, row-major.
///
/// Latitude decreases by `step` per row from `lat0`, longitude increases
/// by `step` per column from `lon0`.
pub fn create_swath_geolocation(
    width: usize,
    height: usize,
    lat0: f64,
    lon0: f64,
    step: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut lat = Vec::with_capacity(width * height);
    let mut lon = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            lat.push(lat0 - row as f64 * step);
            lon.push(lon0 + col as f64 * step);
        }
    }
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(3, 2);
        assert_eq!(grid, vec![0.0, 1000.0, 2000.0, 1.0, 1001.0, 2001.0]);
    }

    #[test]
    fn test_band_markers_differ() {
        assert_ne!(band_marker("humidity"), band_marker("total_ozone"));
        assert!(create_band_grid("sm", 2, 2)
            .iter()
            .all(|v| *v == band_marker("sm")));
    }

    #[test]
    fn test_swath_geolocation() {
        let (lat, lon) = create_swath_geolocation(2, 2, 10.0, 20.0, 0.5);
        assert_eq!(lat, vec![10.0, 10.0, 9.5, 9.5]);
        assert_eq!(lon, vec![20.0, 20.5, 20.0, 20.5]);
    }
}
