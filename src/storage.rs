//! Durable key-value storage for application data

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use simplelog::debug;
use tokio::io::AsyncWriteExt;

/// Storage addressed by string keys. Values are whole documents; every `set` replaces the
/// previous value.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns `None` when nothing is stored under `key`
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;
}

// FILE STORE ##################################################################

/// Stores each key as `<directory>/<key>.json`
#[derive(Clone, Debug)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn get_directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("Nothing stored at `{}`", path.display());
                Ok(None)
            }
            Err(err) => {
                Err(err).with_context(|| format!("Unable to read `{}`", path.display()))
            }
        }
    }

    /// Writes to a temporary file first and renames it over the old value, so a failed write
    /// never leaves a truncated document behind
    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Unable to create `{}`", self.directory.display()))?;

        let path = self.path_for(key);
        let tmp_path = self.directory.join(format!(".{key}.json.tmp"));

        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Unable to write `{}`", path.display()))?;

        debug!("Saved `{key}` to `{}`", path.display());
        Ok(())
    }
}

// MEMORY STORE ################################################################

/// In-process storage, shared between clones. Can be switched into a failing mode to exercise
/// error handling.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<bool>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_owned(), value.to_owned());
        }
        store
    }

    /// While failing, every `get` and `set` returns an error
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut flag) = self.failing.lock() {
            *flag = failing;
        }
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Synchronous read for inspection
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn check_failing(&self) -> Result<()> {
        match self.failing.lock() {
            Ok(flag) if *flag => Err(anyhow!("Storage is unavailable")),
            Ok(_) => Ok(()),
            Err(_) => Err(anyhow!("Storage lock was poisoned")),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_failing()?;
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_failing()?;
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Storage lock was poisoned"))?;
        values.insert(key.to_owned(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}


#[cfg(test)]
mod memory_store_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_clones_share_values() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.set("key", "value".to_string()).await.unwrap();
        assert_eq!(Some("value".to_string()), clone.get("key").await.unwrap());
        assert_eq!(1, clone.write_count());
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::with_value("key", "value");
        store.set_failing(true);

        assert!(store.get("key").await.is_err());
        assert!(store.set("key", "other".to_string()).await.is_err());

        store.set_failing(false);
        assert_eq!(Some("value".to_string()), store.get("key").await.unwrap());
    }
}
