use crate::core::Result;
use crate::storage::{BlobStorage, FileStorage, MemoryStorage};
use crate::store::Store;
use std::path::{Path, PathBuf};

pub const DEFAULT_COLLECTION: &str = "todos-vanillajs";
pub const DEFAULT_DATA_DIR: &str = ".todokit";

/// Where the collection blob lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    Memory,
    #[default]
    File,
}

impl Backend {
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        match raw.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Backend::Memory),
            "file" | "fs" | "disk" => Ok(Backend::File),
            other => Err(format!("unknown backend '{other}', expected 'memory' or 'file'")),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage key of the collection blob
    pub collection: String,

    pub backend: Backend,

    /// Directory holding blob files (file backend only)
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            backend: Backend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    pub fn collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Read `TODOKIT_COLLECTION`, `TODOKIT_BACKEND` and `TODOKIT_DATA_DIR`
    pub fn from_env() -> std::result::Result<Self, String> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`from_env`](Self::from_env) over an explicit variable set
    pub fn from_vars<I, K, V>(vars: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                "TODOKIT_COLLECTION" => config.collection = value,
                "TODOKIT_BACKEND" => config.backend = Backend::parse(&value)?,
                "TODOKIT_DATA_DIR" => config.data_dir = PathBuf::from(value),
                _ => {}
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.collection.trim().is_empty() {
            return Err("Collection name cannot be empty".to_string());
        }
        if self.backend == Backend::File && self.data_dir.as_os_str().is_empty() {
            return Err("Data directory cannot be empty for the file backend".to_string());
        }
        Ok(())
    }

    pub fn open_storage(&self) -> Result<Box<dyn BlobStorage>> {
        Ok(match self.backend {
            Backend::Memory => Box::new(MemoryStorage::new()),
            Backend::File => Box::new(FileStorage::new(&self.data_dir)?),
        })
    }

    pub fn open(&self) -> Result<Store<Box<dyn BlobStorage>>> {
        Store::open(self.collection.clone(), self.open_storage()?)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION)
    }
}
