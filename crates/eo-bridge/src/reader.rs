//! Format reader boundary.
//!
//! Payload decoding (netCDF inside SAFE archives, EPS and MSG native
//! records, calibration) happens behind [`FormatReader`]. The bridge only
//! plans reads and checks what comes back.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ndarray::Array2;
use thiserror::Error;

use crate::family::ProductFamily;

/// Errors produced by format readers.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("no format reader installed for {family}")]
    Unavailable { family: ProductFamily },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("reader did not return variable {0}")]
    MissingVariable(String),

    #[error("variable {variable} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        variable: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One unit of work for a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub family: ProductFamily,
    /// Payload entry: the SAFE directory or the native file
    pub path: PathBuf,
    /// Variables to decode, in cube band order
    pub bands: Vec<String>,
}

/// One decoded 2-D variable on the product's native grid.
#[derive(Debug, Clone)]
pub struct RawVariable {
    pub name: String,
    pub values: Array2<f32>,
}

/// Per-pixel geolocation of swath products.
#[derive(Debug, Clone)]
pub struct Geolocation {
    pub lat: Array2<f64>,
    pub lon: Array2<f64>,
}

/// What a reader returns for one request.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub variables: Vec<RawVariable>,
    pub geolocation: Option<Geolocation>,
}

impl RawDataset {
    pub fn variable(&self, name: &str) -> Option<&RawVariable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// Decoder of one native format.
pub trait FormatReader: Send + Sync {
    fn read(&self, request: &ReadRequest) -> Result<RawDataset, ReaderError>;
}

/// Placeholder installed when no decoder is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableReader;

impl FormatReader for UnavailableReader {
    fn read(&self, request: &ReadRequest) -> Result<RawDataset, ReaderError> {
        Err(ReaderError::Unavailable {
            family: request.family,
        })
    }
}

/// Reader injected per family at registration.
#[derive(Clone)]
pub struct FormatReaders {
    fallback: Arc<dyn FormatReader>,
    by_family: HashMap<ProductFamily, Arc<dyn FormatReader>>,
}

impl FormatReaders {
    /// Use `reader` for every family.
    pub fn uniform(reader: Arc<dyn FormatReader>) -> Self {
        Self {
            fallback: reader,
            by_family: HashMap::new(),
        }
    }

    /// Override the reader of one family.
    pub fn with(mut self, family: ProductFamily, reader: Arc<dyn FormatReader>) -> Self {
        self.by_family.insert(family, reader);
        self
    }

    pub fn get(&self, family: ProductFamily) -> Arc<dyn FormatReader> {
        self.by_family
            .get(&family)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}

impl Default for FormatReaders {
    fn default() -> Self {
        Self::uniform(Arc::new(UnavailableReader))
    }
}

impl fmt::Debug for FormatReaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<&ProductFamily> = self.by_family.keys().collect();
        overridden.sort();
        f.debug_struct("FormatReaders")
            .field("overridden", &overridden)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Zeros;

    impl FormatReader for Zeros {
        fn read(&self, request: &ReadRequest) -> Result<RawDataset, ReaderError> {
            Ok(RawDataset {
                variables: request
                    .bands
                    .iter()
                    .map(|name| RawVariable {
                        name: name.clone(),
                        values: Array2::zeros((2, 2)),
                    })
                    .collect(),
                geolocation: None,
            })
        }
    }

    fn request(family: ProductFamily) -> ReadRequest {
        ReadRequest {
            family,
            path: PathBuf::from("/data/product"),
            bands: vec!["sm".to_string()],
        }
    }

    #[test]
    fn test_default_readers_are_unavailable() {
        let readers = FormatReaders::default();
        let err = readers
            .get(ProductFamily::AscatSomo25)
            .read(&request(ProductFamily::AscatSomo25))
            .unwrap_err();
        assert!(matches!(
            err,
            ReaderError::Unavailable {
                family: ProductFamily::AscatSomo25
            }
        ));
    }

    #[test]
    fn test_override_one_family() {
        let readers = FormatReaders::default().with(ProductFamily::AscatSomo25, Arc::new(Zeros));
        let dataset = readers
            .get(ProductFamily::AscatSomo25)
            .read(&request(ProductFamily::AscatSomo25))
            .unwrap();
        assert!(dataset.variable("sm").is_some());

        assert!(readers
            .get(ProductFamily::SeviriL1bNative)
            .read(&request(ProductFamily::SeviriL1bNative))
            .is_err());
    }
}
