//! Shared helpers for eo-bridge integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use eo_bridge::{
    BridgeConfig, FormatReader, FormatReaders, FormatRegistry, Geolocation, RawDataset,
    RawVariable, ReadRequest, ReaderError,
};
use ndarray::Array2;
use test_utils::{create_band_grid, create_swath_geolocation};

/// Format reader that counts calls and returns constant grids.
pub struct CountingReader {
    calls: AtomicUsize,
    requests: Mutex<Vec<ReadRequest>>,
    rows: usize,
    cols: usize,
    with_geolocation: bool,
}

impl CountingReader {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            rows,
            cols,
            with_geolocation: false,
        }
    }

    pub fn with_geolocation(mut self) -> Self {
        self.with_geolocation = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ReadRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl FormatReader for CountingReader {
    fn read(&self, request: &ReadRequest) -> Result<RawDataset, ReaderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let shape = (self.rows, self.cols);
        let variables = request
            .bands
            .iter()
            .map(|band| RawVariable {
                name: band.clone(),
                values: Array2::from_shape_vec(shape, create_band_grid(band, self.cols, self.rows))
                    .unwrap(),
            })
            .collect();

        let geolocation = self.with_geolocation.then(|| {
            let (lat, lon) = create_swath_geolocation(self.cols, self.rows, 45.0, 5.0, 0.25);
            Geolocation {
                lat: Array2::from_shape_vec(shape, lat).unwrap(),
                lon: Array2::from_shape_vec(shape, lon).unwrap(),
            }
        });

        Ok(RawDataset {
            variables,
            geolocation,
        })
    }
}

/// Reader that always fails to decode.
pub struct FailingReader;

impl FormatReader for FailingReader {
    fn read(&self, _request: &ReadRequest) -> Result<RawDataset, ReaderError> {
        Err(ReaderError::Decode("corrupt record at offset 4096".to_string()))
    }
}

/// Registry with every family reading through `reader`.
pub fn registry_with(reader: Arc<CountingReader>) -> FormatRegistry {
    FormatRegistry::with_all_families(&FormatReaders::uniform(reader), &BridgeConfig::default())
        .unwrap()
}
