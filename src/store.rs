//! Cache store - a flat key-value mapping mirrored to a single YAML file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::Result;
use crate::persist;

/// An embedded key-value cache backed by one YAML mapping document.
///
/// The whole mapping is held in memory and loaded at construction. Every
/// mutating call rewrites the backing file in full, so disk always matches
/// memory; there is no deferred or batched flush. Keys of mixed scalar types
/// (string and integer keys in the same mapping) round-trip through the file.
#[derive(Debug)]
pub struct Stash {
    path: PathBuf,
    entries: Mapping,
}

impl Stash {
    /// Open the cache at `path`, creating an empty backing file if none
    /// exists. Equivalent to [`Stash::open_or_create`]; use [`Stash::open`]
    /// to fail on a missing file instead.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_or_create(path)
    }

    /// Write an empty mapping document at `path`, truncating any existing
    /// file.
    pub fn create(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        persist::save(path, &Mapping::new())?;
        debug!(path = %path.display(), "created cache file");
        Ok(())
    }

    /// Delete the backing file at `path`. A missing file is not an error;
    /// any other filesystem error propagates.
    pub fn delete(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted cache file");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Open the cache at an existing `path`.
    ///
    /// Fails with [`StashError::NotFound`](crate::StashError::NotFound) when
    /// the file does not exist; the file is never created as a side effect.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = persist::load(&path)?;
        Ok(Self { path, entries })
    }

    /// Open the cache at an existing `path` and apply `configure` to the
    /// fresh instance before returning it.
    ///
    /// The instance itself is returned; `configure`'s output is used only
    /// for error propagation.
    pub fn open_with(
        path: impl Into<PathBuf>,
        configure: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<Self> {
        let mut stash = Self::open(path)?;
        configure(&mut stash)?;
        Ok(stash)
    }

    /// Open the cache at `path`, first creating an empty backing file when
    /// none exists. Never fails due to a missing file.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            Self::create(&path)?;
        }
        Self::open(path)
    }

    /// Look up `key`. Returns `None` on a miss. Pure read: never mutates
    /// state or touches the disk.
    pub fn get(&self, key: impl Into<Value>) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    /// Look up `key`, computing and storing a value on a miss.
    ///
    /// On a hit the stored value is returned and `compute` is never invoked.
    /// On a miss `compute` runs exactly once; its result is stored under
    /// `key` (rewriting the backing file) and returned.
    pub fn get_or_insert_with<V: Serialize>(
        &mut self,
        key: impl Into<Value>,
        compute: impl FnOnce() -> V,
    ) -> Result<Value> {
        let key = key.into();
        if let Some(value) = self.entries.get(&key) {
            return Ok(value.clone());
        }

        let value = serde_yaml::to_value(compute())?;
        self.entries.insert(key, value.clone());
        persist::save(&self.path, &self.entries)?;
        Ok(value)
    }

    /// Store `value` under `key`, overwriting any prior value, and rewrite
    /// the backing file. Returns the value exactly as stored.
    pub fn set<V: Serialize>(&mut self, key: impl Into<Value>, value: V) -> Result<Value> {
        let value = serde_yaml::to_value(value)?;
        self.entries.insert(key.into(), value.clone());
        persist::save(&self.path, &self.entries)?;
        Ok(value)
    }

    /// Remove `key` if present and rewrite the backing file. Removing an
    /// absent key is not an error.
    pub fn remove(&mut self, key: impl Into<Value>) -> Result<()> {
        self.entries.remove(&key.into());
        persist::save(&self.path, &self.entries)
    }

    /// Clear every entry and rewrite the (now empty) backing file.
    /// Idempotent.
    pub fn flush_all(&mut self) -> Result<()> {
        self.entries.clear();
        persist::save(&self.path, &self.entries)
    }

    /// Look up each key in the order supplied, returning the found values
    /// and silently skipping absent keys.
    ///
    /// No placeholders are inserted for misses, no loader runs and nothing
    /// is written. Pure read.
    pub fn get_multi<I, K>(&self, keys: I) -> Vec<Value>
    where
        I: IntoIterator<Item = K>,
        K: Into<Value>,
    {
        keys.into_iter()
            .filter_map(|key| self.entries.get(&key.into()).cloned())
            .collect()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `key` is present.
    pub fn contains_key(&self, key: impl Into<Value>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Iterate over the cached keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.keys()
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_creates_missing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache.yml");

        let stash = Stash::new(&path).unwrap();
        assert!(path.exists());
        assert!(stash.is_empty());
    }

    #[test]
    fn test_new_loads_existing_entries() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache.yml");

        let mut stash = Stash::new(&path).unwrap();
        stash.set("foo", 123).unwrap();

        let reopened = Stash::new(&path).unwrap();
        assert_eq!(reopened.get("foo"), Some(&Value::from(123)));
    }

    #[test]
    fn test_len_and_contains_key() {
        let temp = tempdir().unwrap();
        let mut stash = Stash::new(temp.path().join("cache.yml")).unwrap();

        assert_eq!(stash.len(), 0);
        stash.set("foo", 1).unwrap();
        stash.set(7, "seven").unwrap();

        assert_eq!(stash.len(), 2);
        assert!(stash.contains_key("foo"));
        assert!(stash.contains_key(7));
        assert!(!stash.contains_key("bar"));
    }

    #[test]
    fn test_keys_preserve_insertion_order() {
        let temp = tempdir().unwrap();
        let mut stash = Stash::new(temp.path().join("cache.yml")).unwrap();

        stash.set("b", 1).unwrap();
        stash.set("a", 2).unwrap();

        let keys: Vec<_> = stash.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);
    }

    #[test]
    fn test_path_accessor() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache.yml");
        let stash = Stash::new(&path).unwrap();
        assert_eq!(stash.path(), path);
    }
}
