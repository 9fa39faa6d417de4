//! File discovery
//!
//! Walks the data root and classifies every `.json` file found under an
//! `aggregated`, `map` or `top` subtree.
//!
//! # Layout
//!
//! ```text
//! <root>/<data_type>/<category>/.../<year>/<quarter>.json
//! <root>/<data_type>/<category>/.../state/<state-slug>/<year>/<quarter>.json
//! ```
//!
//! Enumeration is lazy and sorted by file name, so two walks over the same
//! tree yield files in the same order.

mod path;
mod types;

pub use path::classify;
pub use types::{DiscoveredFile, SourceRecord};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazy iterator over the snapshot files under a data root
///
/// Yields `Err` for entries that cannot be walked or classified; the caller
/// decides whether to skip them.
pub struct Discovery {
    root: PathBuf,
    walker: walkdir::IntoIter,
}

impl Discovery {
    /// Start walking `root`
    ///
    /// Fails with a configuration error if the root is missing or is not a
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::config(format!(
                "Data directory not found: {}",
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(Error::config(format!(
                "Data path is not a directory: {}",
                root.display()
            )));
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            root: root.to_path_buf(),
            walker,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for Discovery {
    type Item = Result<DiscoveredFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    return Some(Err(Error::unreadable(path, e.to_string())));
                }
            };

            if !entry.file_type().is_file() || !is_json(entry.path()) {
                continue;
            }

            if let Some(result) = classify(&self.root, entry.path()) {
                return Some(result);
            }
        }
    }
}

/// Discover every snapshot file under `root`
pub fn discover(root: impl AsRef<Path>) -> Result<Discovery> {
    Discovery::new(root)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
