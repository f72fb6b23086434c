//! Search provider contract and the web search implementation
//!
//! A provider is driven by the host in a fixed order:
//! - get_initial_result_set / get_subsearch_result_set: result ids
//! - filter_results: truncate to what the host will show
//! - get_result_metas: names, descriptions and icons
//! - activate_result: the user picked a result

mod traits;
mod types;
mod web_search;

pub use traits::SearchProvider;
pub use types::*;
pub use web_search::{WebSearchProvider, WEB_SEARCH_RESULT};
