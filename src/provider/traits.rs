//! Search provider contract consumed by the host search controller

use super::types::{AppInfo, ResultActor, ResultId, ResultMeta};
use crate::error::Result;
use crate::search::Cancellable;
use async_trait::async_trait;

/// A source of search results registered with a host controller.
///
/// The host drives every search through the same sequence:
/// initial (or subsearch) result set, filter, result metas, and finally
/// activation of the result the user picked.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable provider identifier
    fn id(&self) -> &str;

    /// Application that owns the provider, if any
    fn app_info(&self) -> Option<AppInfo> {
        None
    }

    /// Whether the provider-level launch action is offered
    fn can_launch_search(&self) -> bool {
        false
    }

    /// Called when the user activates one of this provider's results
    fn activate_result(&self, result: &str, terms: &[String]);

    /// Called when the provider itself is activated
    fn launch_search(&self, _terms: &[String]) {}

    /// Custom visual for a result, `None` for the host default
    fn create_result_object(&self, _meta: &ResultMeta) -> Option<ResultActor> {
        None
    }

    /// Metadata for each identifier
    async fn get_result_metas(
        &self,
        results: &[ResultId],
        cancellable: &Cancellable,
    ) -> Result<Vec<ResultMeta>>;

    /// Start a new search
    async fn get_initial_result_set(
        &self,
        terms: &[String],
        cancellable: &Cancellable,
    ) -> Result<Vec<ResultId>>;

    /// Refine a previous search with expanded terms
    async fn get_subsearch_result_set(
        &self,
        previous: &[ResultId],
        terms: &[String],
        cancellable: &Cancellable,
    ) -> Result<Vec<ResultId>>;

    /// Truncate to at most `max_results`, keeping order
    fn filter_results(&self, mut results: Vec<ResultId>, max_results: usize) -> Vec<ResultId> {
        results.truncate(max_results);
        results
    }
}
