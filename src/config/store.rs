//! Key/value settings store holding the persisted engine selection

use crate::error::{ProviderError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Key of the persisted engine index
pub const SEARCH_ENGINE_KEY: &str = "search-engine";

/// Notification sent whenever a key changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub key: String,
    pub value: i64,
}

/// Integer settings store with change notification
pub trait SettingsStore: Send + Sync {
    /// Read an integer; unset keys read as 0
    fn get_int(&self, key: &str) -> Result<i64>;

    /// Write an integer and notify subscribers
    fn set_int(&self, key: &str, value: i64) -> Result<()>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<SettingChange>;
}

/// In-memory store
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, i64>>,
    changes: broadcast::Sender<SettingChange>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            values: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Create a store with a preset engine index
    pub fn with_engine(index: i64) -> Self {
        let mut store = Self::new();
        if let Ok(values) = store.values.get_mut() {
            values.insert(SEARCH_ENGINE_KEY.to_string(), index);
        }
        store
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_int(&self, key: &str) -> Result<i64> {
        let values = self
            .values
            .read()
            .map_err(|e| ProviderError::Settings(e.to_string()))?;
        Ok(values.get(key).copied().unwrap_or(0))
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        {
            let mut values = self
                .values
                .write()
                .map_err(|e| ProviderError::Settings(e.to_string()))?;
            values.insert(key.to_string(), value);
        }
        // No subscribers is not an error
        let _ = self.changes.send(SettingChange {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingChange> {
        self.changes.subscribe()
    }
}

/// Store persisted as a flat JSON object on disk
pub struct FileSettingsStore {
    path: PathBuf,
    inner: MemorySettingsStore,
}

impl FileSettingsStore {
    /// Open the store, reading existing values if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut inner = MemorySettingsStore::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ProviderError::Settings(format!("{}: {}", path.display(), e)))?;
            let values: HashMap<String, i64> = serde_json::from_str(&content)
                .map_err(|e| ProviderError::Settings(format!("{}: {}", path.display(), e)))?;
            debug!("Loaded {} settings from {}", values.len(), path.display());
            *inner
                .values
                .get_mut()
                .map_err(|e| ProviderError::Settings(e.to_string()))? = values;
        }

        Ok(Self { path, inner })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, i64>) -> Result<()> {
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| ProviderError::Settings(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ProviderError::Settings(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| ProviderError::Settings(format!("{}: {}", self.path.display(), e)))
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_int(&self, key: &str) -> Result<i64> {
        self.inner.get_int(key)
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        {
            // Held across the write so concurrent setters persist in order
            let mut values = self
                .inner
                .values
                .write()
                .map_err(|e| ProviderError::Settings(e.to_string()))?;
            let mut updated = values.clone();
            updated.insert(key.to_string(), value);
            self.persist(&updated)?;
            *values = updated;
        }
        let _ = self.inner.changes.send(SettingChange {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingChange> {
        self.inner.subscribe()
    }
}
