//! Catalog loader for reading engine definitions from the install directory

use super::catalog::{EngineCatalog, EngineDefinition, IconHandle};
use crate::config::CATALOG_FILE_NAME;
use crate::error::{ProviderError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Loader for the bundled engine catalog
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load `search-engines.json` from the install directory
    pub fn load(base_path: &Path) -> Result<EngineCatalog> {
        Self::load_file(base_path, CATALOG_FILE_NAME)
    }

    /// Load a catalog with a custom file name
    pub fn load_file(base_path: &Path, file_name: &str) -> Result<EngineCatalog> {
        let path = base_path.join(file_name);
        debug!("Reading engine catalog from {}", path.display());

        let bytes = std::fs::read(&path).map_err(|source| ProviderError::Io {
            path: path.clone(),
            source,
        })?;
        let engines: Vec<EngineDefinition> =
            serde_json::from_slice(&bytes).map_err(|source| ProviderError::Parse {
                path: path.clone(),
                source,
            })?;

        info!("Loaded {} engines from {}", engines.len(), path.display());
        Ok(EngineCatalog::new(engines))
    }

    /// Resolve an engine's icon against the install directory
    pub fn resolve_icon(base_path: &Path, relative: &str) -> IconHandle {
        IconHandle::resolve(base_path, relative)
    }
}
