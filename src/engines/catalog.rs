//! Engine definitions and the catalog they are selected from

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A configured web search engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDefinition {
    /// Display name
    pub name: String,
    /// URL prefix; the encoded query is appended verbatim
    pub url: String,
    /// Icon path relative to the install directory
    pub icon: String,
}

impl EngineDefinition {
    pub fn new(name: impl Into<String>, url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    /// Build the search URL for a list of terms
    pub fn search_url(&self, terms: &[String]) -> String {
        let query = terms.join(" ");
        format!("{}{}", self.url, urlencoding::encode(&query))
    }
}

/// Ordered list of engines, as loaded from the catalog file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineCatalog {
    engines: Vec<EngineDefinition>,
}

impl EngineCatalog {
    pub fn new(engines: Vec<EngineDefinition>) -> Self {
        Self { engines }
    }

    /// Select the engine at `index`.
    ///
    /// The index comes straight from the settings store, so negative or
    /// too-large values are reported instead of trusted.
    pub fn select_by_index(&self, index: i64) -> Result<&EngineDefinition> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.engines.get(i))
            .ok_or(ProviderError::IndexOutOfRange {
                index,
                len: self.engines.len(),
            })
    }

    /// Engine names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineDefinition> {
        self.engines.iter()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

/// Reference to an icon file, resolved lazily by whoever renders it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle {
    path: PathBuf,
}

impl IconHandle {
    /// Join the install directory with an engine's relative icon path
    pub fn resolve(base_path: &Path, relative: &str) -> Self {
        Self {
            path: base_path.join(relative),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for IconHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
