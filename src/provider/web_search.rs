//! Provider that turns the search terms into a web search URL

use super::traits::SearchProvider;
use super::types::{ResultIcon, ResultId, ResultMeta};
use crate::error::{ProviderError, Result};
use crate::extension::ConfigSlot;
use crate::host::{DisplayContext, UrlLauncher};
use crate::search::Cancellable;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The single placeholder result this provider ever returns
pub const WEB_SEARCH_RESULT: &str = "Web Search";

/// Search provider backed by the active engine in a [`ConfigSlot`]
pub struct WebSearchProvider {
    id: String,
    config: ConfigSlot,
    launcher: Arc<dyn UrlLauncher>,
    display: Arc<dyn DisplayContext>,
}

impl WebSearchProvider {
    pub fn new(
        id: impl Into<String>,
        config: ConfigSlot,
        launcher: Arc<dyn UrlLauncher>,
        display: Arc<dyn DisplayContext>,
    ) -> Self {
        Self {
            id: id.into(),
            config,
            launcher,
            display,
        }
    }
}

#[async_trait]
impl SearchProvider for WebSearchProvider {
    fn id(&self) -> &str {
        &self.id
    }

    // Launching happens per result; the provider-level action stays a no-op.
    fn can_launch_search(&self) -> bool {
        true
    }

    fn activate_result(&self, _result: &str, terms: &[String]) {
        let Some(config) = self.config.snapshot() else {
            warn!("Ignoring activation of {} while disabled", self.id);
            return;
        };

        let url = config.engine.search_url(terms);
        info!("Opening {} with {}", url, config.engine.name);

        if let Err(e) = self.launcher.open(&url) {
            warn!("Failed to open {}: {}", url, e);
        }
    }

    fn launch_search(&self, terms: &[String]) {
        debug!("launchSearch({:?}) ignored", terms);
    }

    async fn get_result_metas(
        &self,
        results: &[ResultId],
        cancellable: &Cancellable,
    ) -> Result<Vec<ResultMeta>> {
        debug!("getResultMetas({:?})", results);

        let config = self.config.require()?;
        let scale = self.display.scale_factor();

        let fired = Arc::new(AtomicBool::new(false));
        let handler = {
            let fired = fired.clone();
            cancellable.connect(move || fired.store(true, Ordering::SeqCst))
        };

        let description = format!("Search with {}", config.engine.name);
        let mut metas = Vec::with_capacity(results.len());
        for id in results {
            let gicon = config.icon.clone();
            metas.push(ResultMeta::new(
                id.clone(),
                config.engine.name.clone(),
                description.clone(),
                Arc::new(move |size: u32| ResultIcon::square(gicon.clone(), size.saturating_mul(scale))),
            ));
            // Give a superseding search the chance to cancel us
            tokio::task::yield_now().await;
        }

        cancellable.disconnect(handler);

        // One decision point covering both the listener and the flag itself
        if fired.load(Ordering::SeqCst) || cancellable.is_cancelled() {
            debug!("getResultMetas cancelled after {} items", metas.len());
            return Err(ProviderError::OperationCancelled);
        }

        Ok(metas)
    }

    async fn get_initial_result_set(
        &self,
        terms: &[String],
        _cancellable: &Cancellable,
    ) -> Result<Vec<ResultId>> {
        debug!("getInitialResultSet({:?})", terms);
        Ok(vec![WEB_SEARCH_RESULT.to_string()])
    }

    async fn get_subsearch_result_set(
        &self,
        _previous: &[ResultId],
        terms: &[String],
        cancellable: &Cancellable,
    ) -> Result<Vec<ResultId>> {
        if cancellable.is_cancelled() {
            return Err(ProviderError::OperationCancelled);
        }

        self.get_initial_result_set(terms, cancellable).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{EngineDefinition, IconHandle};
    use crate::extension::ActiveConfig;
    use crate::host::FixedScale;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        urls: Mutex<Vec<String>>,
    }

    impl UrlLauncher for RecordingLauncher {
        fn open(&self, url: &str) -> Result<()> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct FailingLauncher;

    impl UrlLauncher for FailingLauncher {
        fn open(&self, url: &str) -> Result<()> {
            Err(ProviderError::Launch {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no opener"),
            })
        }
    }

    fn loaded_slot() -> ConfigSlot {
        let engine = EngineDefinition::new("Example", "https://example.com/search?q=", "icons/example.svg");
        let icon = IconHandle::resolve(Path::new("/ext"), &engine.icon);
        let slot = ConfigSlot::new();
        slot.set(ActiveConfig { engine, icon });
        slot
    }

    fn provider_with(
        slot: ConfigSlot,
        launcher: Arc<dyn UrlLauncher>,
        scale: u32,
    ) -> WebSearchProvider {
        WebSearchProvider::new("web-search@test", slot, launcher, Arc::new(FixedScale(scale)))
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_contract_flags() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        assert_eq!(provider.id(), "web-search@test");
        assert!(provider.app_info().is_none());
        assert!(provider.can_launch_search());

        let ids = tokio_test::block_on(
            provider.get_initial_result_set(&terms(&["x"]), &Cancellable::new()),
        )
        .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_initial_result_set_is_single_placeholder() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let cancellable = Cancellable::new();

        for query in [vec!["a"], vec!["cat", "videos"], vec!["ünïcødé", "&", "?"]] {
            let ids = provider
                .get_initial_result_set(&terms(&query), &cancellable)
                .await
                .unwrap();
            assert_eq!(ids, vec![WEB_SEARCH_RESULT.to_string()]);
        }
    }

    #[tokio::test]
    async fn test_subsearch_matches_initial() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let cancellable = Cancellable::new();
        let t = terms(&["rust", "lang"]);

        let initial = provider.get_initial_result_set(&t, &cancellable).await.unwrap();
        let previous = vec!["something else".to_string(), "more".to_string()];
        let sub = provider
            .get_subsearch_result_set(&previous, &t, &cancellable)
            .await
            .unwrap();

        assert_eq!(initial, sub);
    }

    #[tokio::test]
    async fn test_subsearch_fails_fast_when_cancelled() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let cancellable = Cancellable::new();
        cancellable.cancel();

        let err = provider
            .get_subsearch_result_set(&[], &terms(&["x"]), &cancellable)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_filter_results() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let ids: Vec<ResultId> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        assert_eq!(provider.filter_results(ids.clone(), 5), ids);
        assert_eq!(provider.filter_results(ids.clone(), 3), ids);
        assert_eq!(
            provider.filter_results(ids.clone(), 2),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(provider.filter_results(ids, 0).is_empty());
    }

    #[tokio::test]
    async fn test_result_metas() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 2);
        let cancellable = Cancellable::new();

        let metas = provider
            .get_result_metas(&[WEB_SEARCH_RESULT.to_string()], &cancellable)
            .await
            .unwrap();

        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].id, WEB_SEARCH_RESULT);
        assert_eq!(metas[0].name, "Example");
        assert_eq!(metas[0].description, "Search with Example");

        let icon = metas[0].create_icon(16);
        assert_eq!(icon.width, 32);
        assert_eq!(icon.height, 32);
        assert_eq!(icon.icon_size, 32);
        assert_eq!(icon.gicon.path(), Path::new("/ext/icons/example.svg"));
    }

    #[tokio::test]
    async fn test_result_metas_ignore_id_values() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let ids = vec!["x".to_string(), "y".to_string()];

        let metas = provider.get_result_metas(&ids, &Cancellable::new()).await.unwrap();

        assert_eq!(metas.len(), 2);
        assert!(metas.iter().all(|m| m.name == "Example"));
    }

    #[tokio::test]
    async fn test_result_metas_rejects_cancelled_token() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let cancellable = Cancellable::new();
        cancellable.cancel();

        let err = provider
            .get_result_metas(&[WEB_SEARCH_RESULT.to_string()], &cancellable)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_result_metas_cancelled_mid_iteration() {
        let provider = Arc::new(provider_with(
            loaded_slot(),
            Arc::new(RecordingLauncher::default()),
            1,
        ));
        let cancellable = Cancellable::new();
        let ids: Vec<ResultId> = (0..64).map(|i| i.to_string()).collect();

        let task = {
            let provider = provider.clone();
            let cancellable = cancellable.clone();
            tokio::spawn(async move { provider.get_result_metas(&ids, &cancellable).await })
        };
        for _ in 0..8 {
            if cancellable.handler_count() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }

        // The listener is attached while the metas are being built
        assert_eq!(cancellable.handler_count(), 1);
        cancellable.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_result_metas_detach_listener() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 1);
        let cancellable = Cancellable::new();

        provider
            .get_result_metas(&[WEB_SEARCH_RESULT.to_string()], &cancellable)
            .await
            .unwrap();

        assert_eq!(cancellable.handler_count(), 0);
    }

    #[tokio::test]
    async fn test_result_icon_size_saturates() {
        let provider = provider_with(loaded_slot(), Arc::new(RecordingLauncher::default()), 2);
        let metas = provider
            .get_result_metas(&[WEB_SEARCH_RESULT.to_string()], &Cancellable::new())
            .await
            .unwrap();

        let icon = metas[0].create_icon(u32::MAX / 2 + 1);
        assert_eq!(icon.icon_size, u32::MAX);
        assert_eq!(icon.width, u32::MAX);
    }

    #[tokio::test]
    async fn test_result_metas_require_config() {
        let provider = provider_with(ConfigSlot::new(), Arc::new(RecordingLauncher::default()), 1);
        let err = provider
            .get_result_metas(&[WEB_SEARCH_RESULT.to_string()], &Cancellable::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotEnabled));
    }

    #[test]
    fn test_activate_opens_encoded_url_once() {
        let launcher = Arc::new(RecordingLauncher::default());
        let provider = provider_with(loaded_slot(), launcher.clone(), 1);

        provider.activate_result("ignored", &terms(&["cat", "videos"]));

        let urls = launcher.urls.lock().unwrap();
        assert_eq!(*urls, vec!["https://example.com/search?q=cat%20videos".to_string()]);
    }

    #[test]
    fn test_activate_swallows_launcher_failure() {
        let provider = provider_with(loaded_slot(), Arc::new(FailingLauncher), 1);
        provider.activate_result(WEB_SEARCH_RESULT, &terms(&["x"]));
    }

    #[test]
    fn test_activate_while_disabled_does_nothing() {
        let launcher = Arc::new(RecordingLauncher::default());
        let provider = provider_with(ConfigSlot::new(), launcher.clone(), 1);

        provider.activate_result(WEB_SEARCH_RESULT, &terms(&["x"]));

        assert!(launcher.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_launch_search_and_result_object_are_noops() {
        let launcher = Arc::new(RecordingLauncher::default());
        let provider = provider_with(loaded_slot(), launcher.clone(), 1);

        provider.launch_search(&terms(&["x"]));
        let meta = ResultMeta::new(
            WEB_SEARCH_RESULT,
            "Example",
            "Search with Example",
            Arc::new(|size| ResultIcon::square(IconHandle::resolve(Path::new("/"), "x"), size)),
        );

        assert!(provider.create_result_object(&meta).is_none());
        assert!(launcher.urls.lock().unwrap().is_empty());
    }
}
