//! File-backed blob storage: one JSON file per collection key

use super::BlobStorage;
use crate::core::{Result, TodoError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

const BLOB_EXTENSION: &str = "json";

pub struct FileStorage {
    data_dir: PathBuf,
    /// Serializes writers inside this process
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (creating if needed) the directory that holds the blobs.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|e| {
            TodoError::Storage(format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the file backing `key`.
    pub fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{key}.{BLOB_EXTENSION}")))
    }
}

fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if bad {
        return Err(TodoError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl BlobStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.blob_path(key)?;
        let _guard = self.write_lock.lock()?;

        // Write beside the target, then rename over it
        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| {
            TodoError::Storage(format!("Failed to replace {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key)?;
        let _guard = self.write_lock.lock()?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.blob_path(key)?.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        assert_eq!(storage.get("todos").unwrap(), None);

        storage.set("todos", r#"{"todos":[]}"#).unwrap();
        assert!(temp_dir.path().join("todos.json").exists());
        assert_eq!(storage.get("todos").unwrap().as_deref(), Some(r#"{"todos":[]}"#));
    }

    #[test]
    fn test_set_replaces_whole_value() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        storage.set("todos", "a much longer first value").unwrap();
        storage.set("todos", "short").unwrap();
        assert_eq!(storage.get("todos").unwrap().as_deref(), Some("short"));

        // no temp files left behind
        let files = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        storage.remove("nothing").unwrap();

        storage.set("todos", "x").unwrap();
        storage.remove("todos").unwrap();
        assert!(!storage.contains("todos").unwrap());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        for key in ["", "..", "a/b", "..\\up"] {
            assert!(matches!(storage.set(key, "x"), Err(TodoError::InvalidKey(_))), "{key}");
        }
    }

    #[test]
    fn test_creates_nested_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested).unwrap();
        storage.set("todos", "x").unwrap();
        assert!(nested.join("todos.json").exists());
    }
}
