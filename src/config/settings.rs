//! Settings structures for the web search provider

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the bundled engine catalog
pub const CATALOG_FILE_NAME: &str = "search-engines.json";

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub catalog: CatalogSettings,
    pub display: DisplaySettings,
    pub store: StoreSettings,
    pub launcher: LauncherSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (WEBSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("WEBSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("WEBSEARCH_UUID") {
            self.general.uuid = Some(val);
        }
        if let Ok(val) = std::env::var("WEBSEARCH_DATA_DIR") {
            self.catalog.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("WEBSEARCH_SCALE_FACTOR") {
            if let Ok(scale) = val.parse() {
                self.display.scale_factor = scale;
            }
        }
        if let Ok(val) = std::env::var("WEBSEARCH_STORE_PATH") {
            self.store.path = Some(PathBuf::from(val));
        }
    }

    /// Full path of the engine catalog
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog.data_dir.join(&self.catalog.file_name)
    }

    /// Settings store location, falling back to the user config directory
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("web-search-provider/settings.json")
        })
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Provider identifier; a random one is generated per process when unset
    pub uuid: Option<String>,
    /// Enable debug logging
    pub debug: bool,
}

/// Where the engine catalog lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Install directory holding the catalog and the engine icons
    pub data_dir: PathBuf,
    /// Catalog file name inside the install directory
    pub file_name: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: CATALOG_FILE_NAME.to_string(),
        }
    }
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Integer scale factor applied to result icons
    pub scale_factor: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { scale_factor: 1 }
    }
}

/// Persistent settings store location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub path: Option<PathBuf>,
}

/// URL launcher settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Command used to open URLs instead of the platform default
    pub command: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("web-search-provider"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.display.scale_factor, 1);
        assert!(!settings.general.debug);
        assert!(settings.general.uuid.is_none());
        assert!(settings.catalog_path().ends_with(CATALOG_FILE_NAME));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "general:\n  uuid: websearch@example.com\ndisplay:\n  scale_factor: 2\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.general.uuid.as_deref(), Some("websearch@example.com"));
        assert_eq!(settings.display.scale_factor, 2);
        assert_eq!(settings.catalog.file_name, CATALOG_FILE_NAME);
    }

    #[test]
    fn test_store_path_override() {
        let mut settings = Settings::default();
        settings.store.path = Some(PathBuf::from("/tmp/ws.json"));
        assert_eq!(settings.store_path(), PathBuf::from("/tmp/ws.json"));
    }
}
