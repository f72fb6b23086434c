//! web-search-provider: send launcher queries to a web search engine
//!
//! Registers one search provider with a host search controller. Every
//! query yields a single "Web Search" result; activating it opens the
//! configured engine's URL with the query appended.

pub mod config;
pub mod engines;
pub mod error;
pub mod extension;
pub mod host;
pub mod prefs;
pub mod provider;
pub mod search;

pub use config::Settings;
pub use engines::{CatalogLoader, EngineCatalog, EngineDefinition};
pub use error::{ProviderError, Result};
pub use extension::{ExtensionMetadata, WebSearchExtension};
pub use provider::{SearchProvider, WebSearchProvider};
pub use search::{Cancellable, ProviderRegistry, SearchController};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
