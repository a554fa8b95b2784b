//! String-keyed persistence behind the cache store.
//!
//! The cache never touches the filesystem directly; it goes through
//! [`StoragePort`] so hosts without a writable disk can supply [`NoStorage`]
//! and tests can supply [`MemoryStorage`].

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

/// Minimal get/set/remove over string keys.
pub trait StoragePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key under a directory, value stored as the file contents.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage rooted at the platform cache directory.
    pub fn in_user_cache() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "cuaca", "cuaca")
            .ok_or_else(|| anyhow!("Could not determine platform cache directory"))?;

        Ok(Self::new(dirs.cache_dir()))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read state file for key '{key}'"))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state directory: {}", self.dir.display()))?;

        fs::write(self.path_for(key), value)
            .with_context(|| format!("Failed to write state file for key '{key}'"))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove state file for key '{key}'"))
            }
        }
    }
}

/// In-memory map; used by tests and by hosts that want ephemeral state.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("storage mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("storage mutex poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("storage mutex poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Persists nothing: every read misses and writes are dropped. For hosts
/// with no storage medium.
#[derive(Debug, Default)]
pub struct NoStorage;

impl StoragePort for NoStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
