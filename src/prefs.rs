//! Preferences surface: pick the active engine from the catalog
//!
//! Mirrors a single list-selection control bound to the `search-engine`
//! setting. Writes go straight to the store; changes made elsewhere are
//! picked up by [`EnginePreferences::sync`].

use crate::config::{SettingChange, SettingsStore, CATALOG_FILE_NAME, SEARCH_ENGINE_KEY};
use crate::engines::CatalogLoader;
use crate::error::{ProviderError, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};

/// Engine list model and the current selection
pub struct EnginePreferences {
    names: Vec<String>,
    selected: i64,
    store: Arc<dyn SettingsStore>,
    changes: broadcast::Receiver<SettingChange>,
}

impl EnginePreferences {
    /// Build the list from the catalog in `base_path`
    pub fn fill(base_path: &Path, store: Arc<dyn SettingsStore>) -> Result<Self> {
        Self::fill_from(base_path, CATALOG_FILE_NAME, store)
    }

    /// Build the list from a catalog with a custom file name
    pub fn fill_from(
        base_path: &Path,
        file_name: &str,
        store: Arc<dyn SettingsStore>,
    ) -> Result<Self> {
        let catalog = CatalogLoader::load_file(base_path, file_name)?;
        let names = catalog.names().into_iter().map(String::from).collect();
        let changes = store.subscribe();
        let selected = store.get_int(SEARCH_ENGINE_KEY)?;

        Ok(Self {
            names,
            selected,
            store,
            changes,
        })
    }

    /// Engine names in list order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Stored index; may be out of range if the store was edited by hand
    pub fn selected(&self) -> i64 {
        self.selected
    }

    pub fn selected_name(&self) -> Option<&str> {
        usize::try_from(self.selected)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(|s| s.as_str())
    }

    /// Select an engine and persist it
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.names.len();
        let stored = i64::try_from(index).unwrap_or(i64::MAX);
        let Some(name) = self.names.get(index) else {
            return Err(ProviderError::IndexOutOfRange { index: stored, len });
        };

        self.store.set_int(SEARCH_ENGINE_KEY, stored)?;
        self.selected = stored;
        info!("Selected engine {}", name);
        Ok(())
    }

    /// Apply store changes made since the last call; returns whether the
    /// selection changed
    pub fn sync(&mut self) -> Result<bool> {
        let before = self.selected;
        loop {
            match self.changes.try_recv() {
                Ok(change) if change.key == SEARCH_ENGINE_KEY => {
                    debug!("search-engine changed to {}", change.value);
                    self.selected = change.value;
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Missed {} setting changes, re-reading", skipped);
                    self.selected = self.store.get_int(SEARCH_ENGINE_KEY)?;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        Ok(self.selected != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemorySettingsStore;
    use std::path::PathBuf;

    fn bundled_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn test_fill_lists_catalog_names() {
        let store = Arc::new(MemorySettingsStore::with_engine(1));
        let prefs = EnginePreferences::fill(&bundled_dir(), store).unwrap();

        let catalog = CatalogLoader::load(&bundled_dir()).unwrap();
        let expected: Vec<String> = catalog.names().into_iter().map(String::from).collect();
        assert_eq!(prefs.names(), expected.as_slice());
        assert_eq!(prefs.selected(), 1);
        assert_eq!(prefs.selected_name(), Some(expected[1].as_str()));
    }

    #[test]
    fn test_select_writes_through() {
        let store = Arc::new(MemorySettingsStore::new());
        let mut prefs = EnginePreferences::fill(&bundled_dir(), store.clone()).unwrap();

        prefs.select(2).unwrap();

        assert_eq!(store.get_int(SEARCH_ENGINE_KEY).unwrap(), 2);
        assert_eq!(prefs.selected(), 2);
    }

    #[test]
    fn test_select_out_of_range() {
        let store = Arc::new(MemorySettingsStore::new());
        let mut prefs = EnginePreferences::fill(&bundled_dir(), store.clone()).unwrap();
        let len = prefs.names().len();

        assert!(matches!(
            prefs.select(len),
            Err(ProviderError::IndexOutOfRange { .. })
        ));
        assert_eq!(store.get_int(SEARCH_ENGINE_KEY).unwrap(), 0);
    }

    #[test]
    fn test_select_huge_index_reports_positive() {
        let store = Arc::new(MemorySettingsStore::with_engine(1));
        let mut prefs = EnginePreferences::fill(&bundled_dir(), store.clone()).unwrap();

        match prefs.select(usize::MAX) {
            Err(ProviderError::IndexOutOfRange { index, .. }) => assert!(index > 0),
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
        assert_eq!(store.get_int(SEARCH_ENGINE_KEY).unwrap(), 1);
        assert_eq!(prefs.selected(), 1);
    }

    #[test]
    fn test_sync_follows_external_changes() {
        let store = Arc::new(MemorySettingsStore::new());
        let mut prefs = EnginePreferences::fill(&bundled_dir(), store.clone()).unwrap();

        assert!(!prefs.sync().unwrap());
        store.set_int(SEARCH_ENGINE_KEY, 3).unwrap();
        store.set_int("unrelated", 9).unwrap();

        assert!(prefs.sync().unwrap());
        assert_eq!(prefs.selected(), 3);
    }
}
