//! Common types shared by the EO discovery and loading crates.

pub mod bbox;
pub mod geostationary;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use geostationary::GeostationaryDisk;
pub use grid::{GridCrs, GridDescription, GridShape, GridTag};
pub use time::{parse_compact_timestamp, to_iso_seconds, TimeParseError, TimeRange};
