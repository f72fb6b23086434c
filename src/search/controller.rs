//! Host-side search controller driving registered providers

use super::cancellable::Cancellable;
use super::session::{SearchSession, SessionState};
use crate::error::ProviderError;
use crate::provider::{ResultId, ResultMeta, SearchProvider};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Number of results shown per provider
pub const MAX_RESULTS: usize = 5;

/// Registration surface a provider's owner talks to
pub trait SearchController: Send + Sync {
    fn add_provider(&self, provider: Arc<dyn SearchProvider>);

    /// Returns false if no provider had that id
    fn remove_provider(&self, id: &str) -> bool;
}

/// Results one provider delivered for a search
#[derive(Debug, Clone)]
pub struct ProviderResults {
    pub provider_id: String,
    pub results: Vec<ResultId>,
    pub metas: Vec<ResultMeta>,
}

/// Reference controller: keeps the providers and runs one search at a time.
///
/// Starting a search cancels the previous one; a superseded search delivers
/// nothing.
pub struct ProviderRegistry {
    providers: RwLock<Vec<Arc<dyn SearchProvider>>>,
    session: Mutex<Option<SearchSession>>,
    max_results: usize,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(Vec::new()),
            session: Mutex::new(None),
            max_results: MAX_RESULTS,
        }
    }

    /// Set the per-provider result limit
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Ids of registered providers, in registration order
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|p| p.id().to_string())
            .collect()
    }

    fn snapshot_providers(&self) -> Vec<Arc<dyn SearchProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn get(&self, id: &str) -> Option<Arc<dyn SearchProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.id() == id)
            .cloned()
    }

    /// Start a new session, cancelling the running one.
    ///
    /// Returns the new session's id, its cancellable and the previous
    /// session's per-provider results.
    fn start_session(
        &self,
        terms: Vec<String>,
    ) -> (Uuid, Cancellable, Option<SearchSession>) {
        let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let mut previous = current.take();
        if let Some(ref mut prev) = previous {
            if prev.state() == SessionState::Started {
                debug!("Superseding search {}", prev.id());
            }
            prev.cancel();
        }

        let session = SearchSession::new(terms);
        let id = session.id();
        let cancellable = session.cancellable().clone();
        *current = Some(session);
        (id, cancellable, previous)
    }

    /// Run a new search across all providers
    pub async fn search(&self, terms: Vec<String>) -> Vec<ProviderResults> {
        info!("Searching {:?}", terms);
        let (session_id, cancellable, _) = self.start_session(terms.clone());

        let providers = self.snapshot_providers();
        let futures = providers.iter().map(|provider| {
            let cancellable = cancellable.clone();
            let terms = terms.clone();
            async move {
                let ids = provider.get_initial_result_set(&terms, &cancellable).await?;
                self.describe(provider.as_ref(), ids, &cancellable).await
            }
        });

        let outcomes = join_all(futures).await;
        self.finish(session_id, &providers, outcomes)
    }

    /// Refine the last search with new terms
    pub async fn refine(&self, terms: Vec<String>) -> Vec<ProviderResults> {
        let has_previous = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        if !has_previous {
            return self.search(terms).await;
        }

        info!("Refining search with {:?}", terms);
        let (session_id, cancellable, previous) = self.start_session(terms.clone());

        let providers = self.snapshot_providers();
        let futures = providers.iter().map(|provider| {
            let cancellable = cancellable.clone();
            let terms = terms.clone();
            let previous_ids: Vec<ResultId> = previous
                .as_ref()
                .map(|s| s.results_for(provider.id()).to_vec())
                .unwrap_or_default();
            async move {
                self.subsearch(provider.as_ref(), &previous_ids, &terms, &cancellable)
                    .await
            }
        });

        let outcomes = join_all(futures).await;
        self.finish(session_id, &providers, outcomes)
    }

    async fn subsearch(
        &self,
        provider: &dyn SearchProvider,
        previous: &[ResultId],
        terms: &[String],
        cancellable: &Cancellable,
    ) -> Result<(Vec<ResultId>, Vec<ResultMeta>), ProviderError> {
        let ids = provider
            .get_subsearch_result_set(previous, terms, cancellable)
            .await?;
        self.describe(provider, ids, cancellable).await
    }

    async fn describe(
        &self,
        provider: &dyn SearchProvider,
        ids: Vec<ResultId>,
        cancellable: &Cancellable,
    ) -> Result<(Vec<ResultId>, Vec<ResultMeta>), ProviderError> {
        let shown = provider.filter_results(ids.clone(), self.max_results);
        let metas = provider.get_result_metas(&shown, cancellable).await?;
        Ok((ids, metas))
    }

    fn finish(
        &self,
        session_id: Uuid,
        providers: &[Arc<dyn SearchProvider>],
        outcomes: Vec<Result<(Vec<ResultId>, Vec<ResultMeta>), ProviderError>>,
    ) -> Vec<ProviderResults> {
        let mut delivered = Vec::new();
        for (provider, outcome) in providers.iter().zip(outcomes) {
            match outcome {
                Ok((results, metas)) => delivered.push(ProviderResults {
                    provider_id: provider.id().to_string(),
                    results,
                    metas,
                }),
                Err(e) if e.is_cancelled() => {
                    debug!("Provider {} cancelled", provider.id());
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.id(), e);
                }
            }
        }

        let mut current = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(session) = current.as_mut().filter(|s| s.id() == session_id) else {
            debug!("Dropping results of superseded search {}", session_id);
            return Vec::new();
        };

        let ids = delivered
            .iter()
            .map(|r| (r.provider_id.clone(), r.results.clone()))
            .collect::<HashMap<_, _>>();
        if !session.complete(ids) {
            debug!("Dropping results of cancelled search {}", session_id);
            return Vec::new();
        }

        delivered
    }

    /// Cancel the running search, if any
    pub fn cancel(&self) {
        if let Some(session) = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.cancel();
        }
    }

    /// Terms of the current session
    pub fn terms(&self) -> Vec<String> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.terms().to_vec())
            .unwrap_or_default()
    }

    /// State of the current session
    pub fn state(&self) -> Option<SessionState> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.state())
    }

    /// Activate a result with the current session's terms
    pub fn activate(&self, provider_id: &str, result: &str) -> bool {
        let Some(provider) = self.get(provider_id) else {
            warn!("No provider {}", provider_id);
            return false;
        };
        provider.activate_result(result, &self.terms());
        true
    }

    /// Provider-level launch with the current session's terms
    pub fn launch(&self, provider_id: &str) -> bool {
        match self.get(provider_id) {
            Some(provider) if provider.can_launch_search() => {
                provider.launch_search(&self.terms());
                true
            }
            _ => false,
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController for ProviderRegistry {
    fn add_provider(&self, provider: Arc<dyn SearchProvider>) {
        info!("Registered provider {}", provider.id());
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(provider);
    }

    fn remove_provider(&self, id: &str) -> bool {
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        let before = providers.len();
        providers.retain(|p| p.id() != id);
        let removed = providers.len() != before;
        if removed {
            info!("Removed provider {}", id);
        }
        removed
    }
}
