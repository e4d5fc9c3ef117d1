//! Whole-file persistence of the cache mapping
//!
//! Every save serializes the entire mapping and replaces the backing file in
//! one rename, so readers never observe a partially written document. There
//! is no incremental or batched persistence.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_yaml::Mapping;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, StashError};

/// Load the whole mapping from the file at `path`.
///
/// A missing file maps to [`StashError::NotFound`]. An all-whitespace file
/// counts as the empty mapping.
pub fn load(path: &Path) -> Result<Mapping> {
    let contents = fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            StashError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StashError::Io(err)
        }
    })?;

    let entries = if contents.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(&contents)?
    };

    debug!(path = %path.display(), entries = entries.len(), "loaded cache file");
    Ok(entries)
}

/// Serialize `entries` and replace the file at `path`.
///
/// Writes to a temporary file in the target directory, then renames it over
/// `path`.
pub fn save(path: &Path, entries: &Mapping) -> Result<()> {
    let yaml = serde_yaml::to_string(entries)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(yaml.as_bytes())?;
    tmp.persist(path).map_err(|err| StashError::Io(err.error))?;

    debug!(path = %path.display(), entries = entries.len(), "saved cache file");
    Ok(())
}
