//! Active configuration shared between the extension and its provider

use crate::engines::{EngineDefinition, IconHandle};
use crate::error::{ProviderError, Result};
use std::sync::{Arc, PoisonError, RwLock};

/// The selected engine and its resolved icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConfig {
    pub engine: EngineDefinition,
    pub icon: IconHandle,
}

/// Whether a configuration has been loaded for the current enable cycle
#[derive(Debug, Clone, Default)]
pub enum ConfigState {
    #[default]
    Unloaded,
    Loaded(Arc<ActiveConfig>),
}

/// Shared slot holding the [`ConfigState`].
///
/// Readers take an `Arc` snapshot so a concurrent `clear` never leaves them
/// with a half-updated config.
#[derive(Debug, Clone, Default)]
pub struct ConfigSlot {
    state: Arc<RwLock<ConfigState>>,
}

impl ConfigSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            ConfigState::Loaded(_)
        )
    }

    /// Current config, if loaded
    pub fn snapshot(&self) -> Option<Arc<ActiveConfig>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            ConfigState::Loaded(config) => Some(config.clone()),
            ConfigState::Unloaded => None,
        }
    }

    /// Current config, or `NotEnabled`
    pub fn require(&self) -> Result<Arc<ActiveConfig>> {
        self.snapshot().ok_or(ProviderError::NotEnabled)
    }

    pub fn set(&self, config: ActiveConfig) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) =
            ConfigState::Loaded(Arc::new(config));
    }

    pub fn clear(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = ConfigState::Unloaded;
    }
}
