//! Collection listing over directory trees.

use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, ErrorKind, Result};
use crate::metadata::CollectionMetadata;
use crate::registry::FormatRegistry;

/// Discover every recognized product below `roots`.
///
/// Roots themselves are containers and are never treated as products.
/// Recognized directories are not descended into. Unrecognized entries are
/// skipped; discovery errors abort the listing unless
/// `config.skip_malformed` is set. Output is sorted by collection id.
pub fn list_collections<P: AsRef<Path>>(
    registry: &FormatRegistry,
    roots: &[P],
    config: &BridgeConfig,
) -> Result<Vec<CollectionMetadata>> {
    let mut collections = Vec::new();
    let mut skipped = 0usize;

    for root in roots {
        let root = root.as_ref();
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = config.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = walker.into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let source = std::io::Error::from(e);
                    if config.skip_malformed {
                        warn!(path = %path.display(), error = %source, "Skipping unreadable entry");
                        skipped += 1;
                        continue;
                    }
                    return Err(BridgeError::Io { path, source });
                }
            };

            let path = entry.path();
            let family_entry = match registry.resolve(path) {
                Ok(family_entry) => family_entry,
                Err(e) if e.kind() == ErrorKind::UnrecognizedProduct => {
                    debug!(path = %path.display(), "Not a product");
                    continue;
                }
                Err(e) if config.skip_malformed => {
                    warn!(path = %path.display(), error = %e, "Skipping product");
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if entry.file_type().is_dir() {
                entries.skip_current_dir();
            }

            match family_entry.discovery.discover(path) {
                Ok(metadata) => collections.push(metadata),
                Err(e) if config.skip_malformed => {
                    warn!(
                        path = %path.display(),
                        family = %family_entry.family(),
                        error = %e,
                        "Skipping malformed product"
                    );
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    collections.sort_by(|a, b| a.id.cmp(&b.id));

    info!(
        roots = roots.len(),
        collections = collections.len(),
        skipped,
        "Listed collections"
    );

    Ok(collections)
}
