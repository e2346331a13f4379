//! Grid compatibility of a band selection.

use std::collections::BTreeSet;

use eo_common::GridTag;

use crate::error::{BridgeError, Result};
use crate::family::FamilyDescriptor;

/// Resolve the single native grid shared by `bands`.
///
/// Bands on different grid tags cannot be stacked without resampling, so a
/// mixed selection fails with `IncompatibleGridSelection` listing every
/// band with its tag. Names must already be known to the descriptor;
/// unknown names are reported as `UnsupportedBand`.
pub fn check_grid_compatibility(descriptor: &FamilyDescriptor, bands: &[String]) -> Result<GridTag> {
    let mut selection = Vec::with_capacity(bands.len());
    let mut unknown = Vec::new();

    for name in bands {
        match descriptor.band(name) {
            Some(spec) => selection.push((name.clone(), spec.grid.clone())),
            None => unknown.push(name.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(BridgeError::UnsupportedBand {
            family: descriptor.family,
            bands: unknown,
            available: descriptor.band_names().iter().map(|s| s.to_string()).collect(),
        });
    }

    let tags: BTreeSet<GridTag> = selection.iter().map(|(_, tag)| tag.clone()).collect();
    let mut tags = tags.into_iter();

    match (tags.next(), tags.next()) {
        (Some(tag), None) => Ok(tag),
        (Some(_), Some(_)) => Err(BridgeError::IncompatibleGridSelection {
            family: descriptor.family,
            selection,
        }),
        (None, _) => Err(BridgeError::UnsupportedBand {
            family: descriptor.family,
            bands: Vec::new(),
            available: descriptor.band_names().iter().map(|s| s.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::families::seviri;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_grid_selection() {
        let descriptor = seviri::descriptor();
        let tag = check_grid_compatibility(&descriptor, &names(&["IR_108", "VIS006"])).unwrap();
        assert_eq!(tag.as_str(), seviri::GRID_VIS_IR);

        let tag = check_grid_compatibility(&descriptor, &names(&["HRV"])).unwrap();
        assert_eq!(tag.as_str(), seviri::GRID_HRV);
    }

    #[test]
    fn test_mixed_grids_are_rejected() {
        let descriptor = seviri::descriptor();
        let err = check_grid_compatibility(&descriptor, &names(&["IR_108", "HRV"])).unwrap_err();
        match err {
            BridgeError::IncompatibleGridSelection { selection, .. } => {
                assert_eq!(selection.len(), 2);
                assert_eq!(selection[0].0, "IR_108");
                assert_eq!(selection[1].1.as_str(), seviri::GRID_HRV);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let descriptor = seviri::descriptor();
        let err = check_grid_compatibility(&descriptor, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedBand);
    }
}
