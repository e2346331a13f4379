//! Tests for grid descriptions and disk geometry working together.

use eo_common::{BoundingBox, GeostationaryDisk, GridCrs, GridDescription, GridShape, GridTag};

// ============================================================================
// Geostationary grids
// ============================================================================

#[test]
fn test_seviri_full_disk_coords_are_centred() {
    let grid = GridDescription {
        tag: GridTag::new("seviri-vis-ir-3km"),
        resolution_m: 3000.403165817,
        crs: GridCrs::Geostationary { sub_lon: 0.0 },
        shape: Some(GridShape::new(3712, 3712)),
    };

    let xs = grid.x_coords().unwrap();
    let ys = grid.y_coords().unwrap();
    assert_eq!(xs.len(), 3712);
    assert_eq!(ys.len(), 3712);

    // Symmetric around nadir
    assert!((xs[0] + xs[3711]).abs() < 1e-6);
    assert!((ys[0] + ys[3711]).abs() < 1e-6);

    // x runs west to east, y north to south
    assert!(xs[0] < xs[1]);
    assert!(ys[0] > ys[1]);

    // Half the disk is roughly 5570 km
    assert!((xs[3711] - 5_567_000.0).abs() < 5_000.0);
}

#[test]
fn test_disk_bbox_contains_nadir() {
    let bbox = GeostationaryDisk::meteosat(41.5).visible_bbox();
    assert!(bbox.contains(41.5, 0.0));
    assert!(!bbox.contains(-100.0, 0.0));
}

// ============================================================================
// Swath grids
// ============================================================================

#[test]
fn test_swath_shape_len() {
    let shape = GridShape::new(3264, 42);
    assert_eq!(shape.len(), 137_088);
    assert!(!shape.is_empty());
    assert!(GridShape::new(0, 42).is_empty());
}

#[test]
fn test_global_bbox_default() {
    assert_eq!(BoundingBox::default(), BoundingBox::new(-180.0, -90.0, 180.0, 90.0));
    assert_eq!(BoundingBox::global().to_array(), [-180.0, -90.0, 180.0, 90.0]);
}
