//! Header-only readers for native Earth-observation products.
//!
//! Nothing in this crate touches payload arrays. Each reader looks at a
//! bounded prefix of a file (or a small XML sidecar) and returns the fields
//! needed to catalog a product:
//!
//! - [`safe`]: Sentinel-3 SAFE `xfdumanifest.xml` (acquisition period,
//!   footprint, image size)
//! - [`eps`]: EPS generic record header + main product header (Metop)
//! - [`ascii`]: `KEY = VALUE` / `KEY : VALUE` header blocks shared by EPS
//!   and MSG native files
//! - [`bounded`]: size-capped file reads

pub mod ascii;
pub mod bounded;
pub mod eps;
pub mod error;
pub mod safe;

pub use ascii::AsciiHeader;
pub use bounded::read_prefix;
pub use eps::{EpsMainHeader, RecordHeader, GRH_LEN};
pub use error::{HeaderError, HeaderResult};
pub use safe::{SafeManifest, MANIFEST_FILE_NAME};
