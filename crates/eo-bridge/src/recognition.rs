//! Declarative path recognition.
//!
//! Rules are data rather than closures so the registry can detect two
//! families claiming the same names before any product is touched.

use std::fs;
use std::path::{Path, PathBuf};

/// Which filesystem entry a product occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLayout {
    /// A directory whose name matches (SAFE archives)
    Directory,
    /// A regular file whose name matches
    File,
    /// A matching file, or a directory holding exactly one matching file
    FileOrWrappedDirectory,
}

impl EntryLayout {
    fn accepts_files(self) -> bool {
        matches!(self, EntryLayout::File | EntryLayout::FileOrWrappedDirectory)
    }

    fn accepts_directories(self) -> bool {
        matches!(
            self,
            EntryLayout::Directory | EntryLayout::FileOrWrappedDirectory
        )
    }
}

/// Name-based recognition rule of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionRule {
    pub layout: EntryLayout,
    /// Required name suffix, compared case-insensitively
    pub suffix: &'static str,
    /// Name must start with one of these
    pub prefixes: &'static [&'static str],
}

impl RecognitionRule {
    pub const fn new(
        layout: EntryLayout,
        suffix: &'static str,
        prefixes: &'static [&'static str],
    ) -> Self {
        Self {
            layout,
            suffix,
            prefixes,
        }
    }

    /// Name test alone, no filesystem access.
    pub fn matches_name(&self, name: &str) -> bool {
        ends_with_ignore_case(name, self.suffix)
            && self.prefixes.iter().any(|prefix| name.starts_with(prefix))
    }

    /// Whether `path` is a product of this rule.
    ///
    /// Stats the path, and lists it when a wrapped directory is allowed.
    pub fn matches(&self, path: &Path) -> bool {
        self.product_file(path).is_some()
    }

    /// The entry holding the product payload.
    ///
    /// For directories and plain files this is `path` itself; for a wrapped
    /// directory it is the single matching file inside.
    pub fn product_file(&self, path: &Path) -> Option<PathBuf> {
        let metadata = fs::metadata(path).ok()?;

        if metadata.is_file() {
            return (self.layout.accepts_files() && self.matches_name(file_name(path)?))
                .then(|| path.to_path_buf());
        }

        if !metadata.is_dir() {
            return None;
        }

        match self.layout {
            EntryLayout::Directory => self
                .matches_name(file_name(path)?)
                .then(|| path.to_path_buf()),
            EntryLayout::FileOrWrappedDirectory => self.single_wrapped_file(path),
            EntryLayout::File => None,
        }
    }

    fn single_wrapped_file(&self, dir: &Path) -> Option<PathBuf> {
        let mut found = None;
        for entry in fs::read_dir(dir).ok()?.flatten() {
            let candidate = entry.path();
            let is_match = candidate.is_file()
                && file_name(&candidate).is_some_and(|name| self.matches_name(name));
            if is_match {
                if found.is_some() {
                    return None;
                }
                found = Some(candidate);
            }
        }
        found
    }

    /// Whether some entry name could satisfy both rules.
    ///
    /// A `true` does not prove a shared name exists; a `false` proves none
    /// does. Wrapping directories may carry any name, so collisions through
    /// them are only caught at resolve time.
    pub fn overlaps(&self, other: &RecognitionRule) -> bool {
        let layouts_meet = (self.layout.accepts_files() && other.layout.accepts_files())
            || (self.layout.accepts_directories() && other.layout.accepts_directories());
        if !layouts_meet {
            return false;
        }

        let suffixes_meet = ends_with_ignore_case(self.suffix, other.suffix)
            || ends_with_ignore_case(other.suffix, self.suffix);
        if !suffixes_meet {
            return false;
        }

        self.prefixes.iter().any(|a| {
            other
                .prefixes
                .iter()
                .any(|b| a.starts_with(b) || b.starts_with(a))
        })
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
