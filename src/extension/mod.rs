//! Extension lifecycle
//!
//! `enable` loads the catalog, picks the engine stored in the settings store
//! and registers the provider; `disable` drops the config and unregisters it.

mod state;

pub use state::{ActiveConfig, ConfigSlot, ConfigState};

use crate::config::{Settings, SettingsStore, CATALOG_FILE_NAME, SEARCH_ENGINE_KEY};
use crate::engines::CatalogLoader;
use crate::error::Result;
use crate::host::{DisplayContext, UrlLauncher};
use crate::provider::{SearchProvider, WebSearchProvider};
use crate::search::SearchController;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Identity and install location of the extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMetadata {
    pub uuid: String,
    pub dir: PathBuf,
    pub catalog_file: String,
}

impl ExtensionMetadata {
    pub fn new(uuid: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            uuid: uuid.into(),
            dir: dir.into(),
            catalog_file: CATALOG_FILE_NAME.to_string(),
        }
    }

    /// Metadata from settings; an unset uuid gets a fresh one for this process
    pub fn from_settings(settings: &Settings) -> Self {
        let uuid = settings
            .general
            .uuid
            .clone()
            .unwrap_or_else(|| format!("web-search-{}", Uuid::new_v4()));
        Self {
            uuid,
            dir: settings.catalog.data_dir.clone(),
            catalog_file: settings.catalog.file_name.clone(),
        }
    }
}

/// Owns the active configuration and the provider registered with the host
pub struct WebSearchExtension {
    metadata: ExtensionMetadata,
    store: Arc<dyn SettingsStore>,
    launcher: Arc<dyn UrlLauncher>,
    display: Arc<dyn DisplayContext>,
    config: ConfigSlot,
    provider: Option<Arc<WebSearchProvider>>,
}

impl WebSearchExtension {
    pub fn new(
        metadata: ExtensionMetadata,
        store: Arc<dyn SettingsStore>,
        launcher: Arc<dyn UrlLauncher>,
        display: Arc<dyn DisplayContext>,
    ) -> Self {
        Self {
            metadata,
            store,
            launcher,
            display,
            config: ConfigSlot::new(),
            provider: None,
        }
    }

    pub fn metadata(&self) -> &ExtensionMetadata {
        &self.metadata
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Config of the current enable cycle
    pub fn active_config(&self) -> Option<Arc<ActiveConfig>> {
        self.config.snapshot()
    }

    /// Load the config if needed and register the provider.
    ///
    /// A catalog or selection error leaves the extension disabled with no
    /// provider registered.
    pub fn enable(&mut self, controller: &dyn SearchController) -> Result<()> {
        if !self.config.is_loaded() {
            let config = self.load_config()?;
            self.config.set(config);
        }

        if self.provider.is_some() {
            debug!("{} already enabled", self.metadata.uuid);
            return Ok(());
        }

        let provider = Arc::new(WebSearchProvider::new(
            self.metadata.uuid.clone(),
            self.config.clone(),
            self.launcher.clone(),
            self.display.clone(),
        ));
        controller.add_provider(provider.clone());
        self.provider = Some(provider);

        info!("Enabled {}", self.metadata.uuid);
        Ok(())
    }

    /// Drop the config and unregister the provider
    pub fn disable(&mut self, controller: &dyn SearchController) {
        self.config.clear();
        if let Some(provider) = self.provider.take() {
            controller.remove_provider(provider.id());
        }
        info!("Disabled {}", self.metadata.uuid);
    }

    fn load_config(&self) -> Result<ActiveConfig> {
        let catalog = CatalogLoader::load_file(&self.metadata.dir, &self.metadata.catalog_file)?;
        let index = self.store.get_int(SEARCH_ENGINE_KEY)?;
        let engine = catalog.select_by_index(index)?.clone();
        let icon = CatalogLoader::resolve_icon(&self.metadata.dir, &engine.icon);

        info!("Selected engine {} ({})", engine.name, index);
        Ok(ActiveConfig { engine, icon })
    }
}
