//! Search engine catalog
//!
//! Engine definitions are read from a JSON file shipped in the install
//! directory and selected by the index stored in the settings store.

mod catalog;
mod loader;

pub use catalog::{EngineCatalog, EngineDefinition, IconHandle};
pub use loader::CatalogLoader;
