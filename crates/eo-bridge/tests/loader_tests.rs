//! Lazy cube loading and materialization.

mod common;

use std::error::Error as _;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use eo_bridge::{
    BandRequest, BridgeConfig, BridgeError, CubeLoader, ErrorKind, FetchUnit, FormatReaders,
    FormatRegistry, ProductFamily, ReaderError, DIMS,
};
use test_utils::{band_marker, temp_test_dir, write_ascat, write_olci_err, write_seviri};

use common::{registry_with, CountingReader, FailingReader};

#[test]
fn test_mixed_grid_selection_is_rejected_before_any_read() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let reader = Arc::new(CountingReader::new(4, 4));
    let registry = registry_with(reader.clone());

    let err = registry
        .load(&seviri, Some(BandRequest::from(["HRV", "IR_108"])), false)
        .unwrap_err();

    match err {
        BridgeError::IncompatibleGridSelection { family, selection } => {
            assert_eq!(family, ProductFamily::SeviriL1bNative);
            let described: Vec<(&str, &str)> = selection
                .iter()
                .map(|(band, tag)| (band.as_str(), tag.as_str()))
                .collect();
            assert_eq!(
                described,
                vec![("HRV", "seviri-hrv-1km"), ("IR_108", "seviri-vis-ir-3km")]
            );
        }
        other => panic!("expected IncompatibleGridSelection, got {other}"),
    }
    assert_eq!(reader.calls(), 0);
}

#[test]
fn test_unknown_band_is_unsupported() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let reader = Arc::new(CountingReader::new(4, 4));
    let registry = registry_with(reader.clone());

    for request in [
        BandRequest::from(["IR_999"]),
        BandRequest::from(["HRV", "IR_999", "IR_108"]),
    ] {
        match registry.load(&seviri, Some(request), false) {
            Err(BridgeError::UnsupportedBand {
                bands, available, ..
            }) => {
                assert_eq!(bands, vec!["IR_999"]);
                assert!(available.contains(&"HRV".to_string()));
            }
            other => panic!("expected UnsupportedBand, got {other:?}"),
        }
    }
    assert_eq!(reader.calls(), 0);
}

#[test]
fn test_single_band_with_metadata() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let reader = Arc::new(CountingReader::new(4, 4));
    let registry = registry_with(reader.clone());

    let cube = registry
        .load(&seviri, Some(BandRequest::from(["IR_108"])), true)
        .unwrap();

    assert_eq!(cube.dimensions(), DIMS);
    assert_eq!(cube.dimensions(), ["time", "band", "y", "x"]);
    assert_eq!(cube.band_names(), &["IR_108"]);
    assert_eq!(cube.grid_tag().as_str(), "seviri-vis-ir-3km");
    assert_eq!(cube.shape(), [Some(1), Some(1), Some(3712), Some(3712)]);

    let y = cube.y.as_ref().unwrap();
    let x = cube.x.as_ref().unwrap();
    assert!(y[0] > 0.0 && y[3711] < 0.0, "y runs north to south");
    assert!(x[0] < 0.0 && x[3711] > 0.0, "x runs west to east");

    // Header period 12:00:10.123 to 12:12:43.184
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 10).unwrap();
    let end = Utc.with_ymd_and_hms(2021, 1, 1, 12, 12, 44).unwrap();
    assert!(cube.time > start && cube.time < end);
    assert_eq!(reader.calls(), 0);
}

#[test]
fn test_hrv_alone_is_loadable() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let registry = registry_with(Arc::new(CountingReader::new(4, 4)));

    let cube = registry
        .load(&seviri, Some(BandRequest::from(["HRV"])), true)
        .unwrap();
    assert_eq!(cube.grid_tag().as_str(), "seviri-hrv-1km");
    assert_eq!(cube.shape(), [Some(1), Some(1), Some(11136), Some(5568)]);
}

#[test]
fn test_default_bands_per_family() {
    let dir = temp_test_dir();
    let registry = registry_with(Arc::new(CountingReader::new(4, 4)));

    let seviri = registry.load(&write_seviri(dir.path()), None, false).unwrap();
    assert_eq!(seviri.bands.len(), 11);
    assert!(!seviri.bands.contains(&"HRV".to_string()));
    assert_eq!(seviri.grid_tag().as_str(), "seviri-vis-ir-3km");

    let olci = registry.load(&write_olci_err(dir.path()), None, false).unwrap();
    assert_eq!(olci.bands.len(), 27);
    assert_eq!(olci.bands[0], "Oa01");
    assert!(!olci.bands.contains(&"humidity".to_string()));

    // An empty request behaves like no request.
    let ascat = registry
        .load(&write_ascat(dir.path(), 6), Some(BandRequest::default()), false)
        .unwrap();
    assert_eq!(ascat.bands.len(), 17);
}

#[test]
fn test_without_metadata_times_come_from_name() {
    let dir = temp_test_dir();
    let olci = write_olci_err(dir.path());
    let registry = registry_with(Arc::new(CountingReader::new(4, 4)));

    let lazy = registry
        .load(&olci, Some(BandRequest::from(["Oa08"])), false)
        .unwrap();
    assert_eq!(lazy.time, Utc.with_ymd_and_hms(2020, 1, 1, 10, 20, 0).unwrap());
    assert_eq!(lazy.shape(), [Some(1), Some(1), None, None]);
    assert!(lazy.y.is_none() && lazy.x.is_none());

    let eager = registry
        .load(&olci, Some(BandRequest::from(["Oa08"])), true)
        .unwrap();
    assert_eq!(eager.time, lazy.time);
    assert_eq!(eager.shape(), [Some(1), Some(1), Some(1520), Some(1217)]);
}

#[test]
fn test_per_band_reads_for_olci() {
    let dir = temp_test_dir();
    let olci = write_olci_err(dir.path());
    let reader = Arc::new(CountingReader::new(3, 5));
    let registry = registry_with(reader.clone());

    let cube = registry
        .load(&olci, Some(BandRequest::from(["Oa17", "Oa01", "Oa17"])), false)
        .unwrap();
    assert_eq!(cube.graph.fetch_unit(), FetchUnit::PerBand);
    assert_eq!(cube.graph.reads().len(), 2);
    assert_eq!(reader.calls(), 0);

    let out = cube.materialize().unwrap();
    assert_eq!(reader.calls(), 2);
    assert_eq!(out.data.shape(), &[1, 2, 3, 5]);
    assert_eq!(out.bands, vec!["Oa17", "Oa01"]);
    assert_eq!(out.data[[0, 0, 2, 4]], band_marker("Oa17"));
    assert_eq!(out.data[[0, 1, 0, 0]], band_marker("Oa01"));
    assert_eq!(out.y, vec![0.0, 1.0, 2.0]);
    assert_eq!(out.x.len(), 5);

    let requests = reader.requests();
    assert!(requests.iter().all(|r| r.path == olci));
    assert_eq!(requests[0].bands, vec!["Oa17"]);
}

#[test]
fn test_whole_product_read_for_seviri() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let reader = Arc::new(CountingReader::new(2, 2));
    let registry = registry_with(reader.clone());

    let cube = registry
        .load(&seviri, Some(BandRequest::from(["IR_108", "WV_062", "VIS006"])), false)
        .unwrap();
    let out = cube.materialize().unwrap();

    assert_eq!(reader.calls(), 1);
    assert_eq!(reader.requests()[0].bands, vec!["IR_108", "WV_062", "VIS006"]);
    assert_eq!(out.band_index("WV_062"), Some(1));
    assert_eq!(out.data[[0, 2, 1, 1]], band_marker("VIS006"));

    // Geostationary axes are projection metres centred on nadir.
    assert_eq!(out.x.len(), 2);
    assert!(out.x[0] < 0.0 && out.x[1] > 0.0);
}

#[test]
fn test_ascat_swath_materialize_with_header_shape() {
    let dir = temp_test_dir();
    let ascat = write_ascat(dir.path(), 6);
    let reader = Arc::new(CountingReader::new(6, 42).with_geolocation());
    let registry = registry_with(reader.clone());

    let cube = registry
        .load(&ascat, Some(BandRequest::from(["sm", "sm_noise"])), true)
        .unwrap();
    assert_eq!(cube.shape(), [Some(1), Some(2), Some(6), Some(42)]);

    let out = cube.materialize().unwrap();
    let geo = out.geolocation.as_ref().unwrap();
    assert_eq!(geo.lat.dim(), (6, 42));
    assert_eq!(geo.lat[[0, 0]], 45.0);
    assert_eq!(geo.lon[[0, 1]], 5.25);
    assert_eq!(out.y.len(), 6);
}

#[test]
fn test_reader_shape_disagreeing_with_header_fails() {
    let dir = temp_test_dir();
    let ascat = write_ascat(dir.path(), 6);
    let registry = registry_with(Arc::new(CountingReader::new(7, 42)));

    let cube = registry.load(&ascat, None, true).unwrap();
    let err = cube.materialize().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReaderFailure);
    let source = err.source().unwrap().to_string();
    assert!(source.contains("(7, 42)"), "{source}");
}

#[test]
fn test_reader_error_is_wrapped() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let readers = FormatReaders::uniform(Arc::new(FailingReader));
    let registry = FormatRegistry::with_all_families(&readers, &BridgeConfig::default()).unwrap();

    let cube = registry.load(&seviri, None, false).unwrap();
    match cube.materialize() {
        Err(BridgeError::ReaderFailure { path, source }) => {
            assert_eq!(path, seviri);
            assert!(matches!(source, ReaderError::Decode(_)));
        }
        other => panic!("expected ReaderFailure, got {other:?}"),
    }
}

#[test]
fn test_missing_reader_fails_only_on_materialize() {
    let dir = temp_test_dir();
    let olci = write_olci_err(dir.path());
    let registry =
        FormatRegistry::with_all_families(&FormatReaders::default(), &BridgeConfig::default())
            .unwrap();

    let cube = registry.load(&olci, None, true).unwrap();
    let err = cube.materialize().unwrap_err();
    assert!(matches!(
        err,
        BridgeError::ReaderFailure {
            source: ReaderError::Unavailable {
                family: ProductFamily::OlciL1bErr
            },
            ..
        }
    ));
}

#[test]
fn test_reader_per_family_override() {
    let dir = temp_test_dir();
    let ascat = write_ascat(dir.path(), 2);
    let seviri = write_seviri(dir.path());
    let reader = Arc::new(CountingReader::new(2, 42));
    let readers = FormatReaders::default().with(ProductFamily::AscatSomo25, reader.clone());
    let registry = FormatRegistry::with_all_families(&readers, &BridgeConfig::default()).unwrap();

    registry.load(&ascat, None, true).unwrap().materialize().unwrap();
    assert_eq!(reader.calls(), 1);

    let err = registry.load(&seviri, None, false).unwrap().materialize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReaderFailure);
}

#[test]
fn test_filter_bands_narrows_without_reading() {
    let dir = temp_test_dir();
    let seviri = write_seviri(dir.path());
    let reader = Arc::new(CountingReader::new(2, 2));
    let registry = registry_with(reader.clone());

    let cube = registry.load(&seviri, None, true).unwrap();
    let narrowed = cube
        .filter_bands(&BandRequest::from(["WV_073", "IR_016"]))
        .unwrap();
    assert_eq!(narrowed.band_names(), &["WV_073", "IR_016"]);
    assert_eq!(narrowed.shape()[2], Some(3712));
    assert_eq!(reader.calls(), 0);

    // HRV was never part of the default cube.
    let err = cube.filter_bands(&BandRequest::from(["HRV"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedBand);
}

#[test]
fn test_loader_rejects_foreign_path() {
    let dir = temp_test_dir();
    let olci = write_olci_err(dir.path());
    let registry = registry_with(Arc::new(CountingReader::new(1, 1)));

    let ascat = registry.get(ProductFamily::AscatSomo25).unwrap();
    let err = ascat.loader.load(&olci, None, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathMismatch);
}
