//! Discovery and lazy cube loading for native Earth-observation products.
//!
//! Supported families:
//! - Sentinel-3 OLCI Level-1B (ERR, EFR) and Level-2 WFR in SAFE layout
//! - MSG SEVIRI Level-1.5 native files
//! - Metop ASCAT SOMO25 EPS native files
//!
//! A [`FormatRegistry`] routes a product path to its family. Discovery
//! builds [`CollectionMetadata`] from names and bounded header reads only.
//! Loading builds a lazy [`Cube`] with dimensions `(time, band, y, x)`; the
//! pluggable [`FormatReader`] is called only when the cube is materialized.
//!
//! ```rust,ignore
//! use eo_bridge::{BandRequest, BridgeConfig, FormatReaders, FormatRegistry};
//!
//! let config = BridgeConfig::from_env();
//! let registry = FormatRegistry::with_all_families(&FormatReaders::default(), &config)?;
//! let collections = eo_bridge::list_collections(&registry, &["/data"], &config)?;
//! let cube = registry.load(path, Some(BandRequest::from(["IR_108"])), true)?;
//! ```

pub mod config;
pub mod cube;
pub mod discovery;
pub mod error;
pub mod families;
pub mod family;
pub mod grid_check;
pub mod listing;
pub mod loader;
pub mod metadata;
pub mod probe;
pub mod reader;
pub mod recognition;
pub mod registry;
pub mod telemetry;

pub use config::{BridgeConfig, LogFormat, LoggingConfig};
pub use cube::{BandRequest, Cube, CubeGraph, MaterializedCube, PendingRead, DIMS};
pub use discovery::{DiscoveryHandler, HeaderDiscovery};
pub use error::{BridgeError, ErrorKind, Result};
pub use families::register_all;
pub use family::{BandSpec, FamilyDescriptor, FetchUnit, NativeGrid, ProductFamily, Provider};
pub use grid_check::check_grid_compatibility;
pub use listing::list_collections;
pub use loader::{CubeLoader, NativeCubeLoader};
pub use metadata::{BandInfo, CollectionMetadata};
pub use probe::{ProductHeader, ProductProbe};
pub use reader::{
    FormatReader, FormatReaders, Geolocation, RawDataset, RawVariable, ReadRequest, ReaderError,
    UnavailableReader,
};
pub use recognition::{EntryLayout, RecognitionRule};
pub use registry::{FamilyEntry, FormatRegistry};
pub use telemetry::init_logging;
