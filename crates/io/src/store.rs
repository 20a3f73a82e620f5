//! Key-value store seam.
//!
//! The app's real store lives outside this workspace. It has last-write-wins
//! semantics and no transactions; these implementations honor the same
//! contract so the startup flow can be exercised end to end.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

pub const ENTRIES_KEY: &str = "entries";
pub const DATA_VERSION_KEY: &str = "dataVersion";
pub const PROFILES_KEY: &str = "profiles";

pub trait KvStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the whole value under `key`.
    fn set_raw(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| StoreError::Json {
                key: key.to_string(),
                message: e.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Json {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_raw(key, value)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON files
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers see either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_err(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl KvStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StoreError::Json {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn set_raw(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;

        let serialized = serde_json::to_string_pretty(&value).map_err(|e| StoreError::Json {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
        {
            let mut file = File::create(&temp_path).map_err(|e| io_err(&temp_path, e))?;
            file.write_all(serialized.as_bytes())
                .and_then(|()| file.sync_all())
                .map_err(|e| {
                    let _ = fs::remove_file(&temp_path);
                    io_err(&temp_path, e)
                })?;
        }
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(&path, e));
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn memory_store_last_write_wins() {
        let mut store = MemoryStore::new();
        store.set(DATA_VERSION_KEY, &1u64).unwrap();
        store.set(DATA_VERSION_KEY, &2u64).unwrap();
        assert_eq!(store.get::<u64>(DATA_VERSION_KEY).unwrap(), Some(2));
    }

    #[test]
    fn missing_key_defaults() {
        let store = MemoryStore::new();
        let entries: Vec<melorate_core::Entry> = store.get_or_default(ENTRIES_KEY).unwrap();
        assert!(entries.is_empty());
        assert_eq!(store.get::<u64>(DATA_VERSION_KEY).unwrap(), None);
    }

    #[test]
    fn wrong_shape_is_json_error() {
        let mut store = MemoryStore::new();
        store.set_raw(DATA_VERSION_KEY, json!("not a number")).unwrap();
        let err = store.get::<u64>(DATA_VERSION_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn file_store_round_trip_and_delete() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data"));

        store.set(PROFILES_KEY, &json!([{"id": "p1", "name": "Anna"}])).unwrap();
        assert!(dir.path().join("data/profiles.json").exists());

        let reopened = FileStore::new(dir.path().join("data"));
        let value = reopened.get_raw(PROFILES_KEY).unwrap().unwrap();
        assert_eq!(value[0]["name"], "Anna");

        store.delete(PROFILES_KEY).unwrap();
        assert_eq!(store.get_raw(PROFILES_KEY).unwrap(), None);
        // deleting twice is fine
        store.delete(PROFILES_KEY).unwrap();
    }

    #[test]
    fn file_store_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(ENTRIES_KEY, &Vec::<melorate_core::Entry>::new()).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["entries.json".to_string()]);
    }

    #[test]
    fn file_store_shorter_value_fully_replaces_longer() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set(PROFILES_KEY, &json!([{"id": "p1", "name": "Anna"}, {"id": "p2", "name": "Bo"}])).unwrap();
        store.set(PROFILES_KEY, &json!([])).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("profiles.json")).unwrap();
        assert_eq!(on_disk, "[]");
        assert_eq!(store.get_raw(PROFILES_KEY).unwrap(), Some(json!([])));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get_raw("../etc"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get_raw(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn file_store_corrupt_file_is_json_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("entries.json"), "{ not json").unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get_raw(ENTRIES_KEY), Err(StoreError::Json { .. })));
    }
}
