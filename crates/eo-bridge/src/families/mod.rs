//! Supported product families and their registration.

pub mod ascat;
pub mod olci;
pub mod seviri;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eo_common::TimeRange;
use product_headers::HeaderError;
use tracing::info;

use crate::config::BridgeConfig;
use crate::discovery::HeaderDiscovery;
use crate::error::{BridgeError, Result};
use crate::family::{FamilyDescriptor, ProductFamily, Provider};
use crate::loader::NativeCubeLoader;
use crate::probe::ProductProbe;
use crate::reader::FormatReaders;
use crate::registry::{FamilyEntry, FormatRegistry};

pub use ascat::AscatProbe;
pub use olci::OlciProbe;
pub use seviri::SeviriProbe;

/// Static descriptor of `family`.
pub fn descriptor(family: ProductFamily) -> FamilyDescriptor {
    match family {
        ProductFamily::OlciL1bErr | ProductFamily::OlciL1bEfr | ProductFamily::OlciL2Wfr => {
            olci::descriptor(family)
        }
        ProductFamily::SeviriL1bNative => seviri::descriptor(),
        ProductFamily::AscatSomo25 => ascat::descriptor(),
    }
}

/// Build the descriptor, handler and loader of one family.
pub fn family_entry(
    family: ProductFamily,
    readers: &FormatReaders,
    config: &BridgeConfig,
) -> Result<FamilyEntry> {
    let descriptor = descriptor(family);
    descriptor.validate().map_err(BridgeError::Config)?;
    let descriptor = Arc::new(descriptor);

    let probe: Arc<dyn ProductProbe> = match family {
        ProductFamily::OlciL1bErr | ProductFamily::OlciL1bEfr | ProductFamily::OlciL2Wfr => {
            Arc::new(OlciProbe::new(&descriptor)?)
        }
        ProductFamily::SeviriL1bNative => Arc::new(SeviriProbe),
        ProductFamily::AscatSomo25 => Arc::new(AscatProbe),
    };

    let discovery = HeaderDiscovery::new(
        Arc::clone(&descriptor),
        Arc::clone(&probe),
        config.header_read_limit,
    );
    let loader = NativeCubeLoader::new(
        Arc::clone(&descriptor),
        probe,
        readers.get(family),
        config.header_read_limit,
    );

    Ok(FamilyEntry::new(
        descriptor,
        Arc::new(discovery),
        Arc::new(loader),
    ))
}

/// Register every supported family. Calling it again rebuilds the same table.
pub fn register_all(
    registry: &mut FormatRegistry,
    readers: &FormatReaders,
    config: &BridgeConfig,
) -> Result<()> {
    for family in ProductFamily::ALL {
        registry.register(family_entry(family, readers, config)?)?;
    }

    info!(
        families = registry.len(),
        header_read_limit = config.header_read_limit,
        "Registered product families"
    );

    Ok(())
}

pub(crate) fn esa() -> Provider {
    Provider::new("ESA", &["producer"], "https://www.esa.int/")
}

pub(crate) fn eumetsat() -> Provider {
    Provider::new(
        "EUMETSAT",
        &["producer", "licensor"],
        "https://www.eumetsat.int/",
    )
}

/// Every header failure means the product cannot be cataloged.
pub(crate) fn header_error(family: ProductFamily, path: &Path, err: HeaderError) -> BridgeError {
    BridgeError::malformed(family, path, err)
}

/// Header times where present, product name times for whatever is missing.
pub(crate) fn combine_times<F>(
    family: ProductFamily,
    path: &Path,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    from_name: F,
) -> Result<TimeRange>
where
    F: FnOnce() -> Result<TimeRange>,
{
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        (start, end) => {
            let named = from_name()?;
            (start.unwrap_or(named.start), end.unwrap_or(named.end))
        }
    };

    TimeRange::new(start, end).map_err(|e| BridgeError::malformed(family, path, e))
}
