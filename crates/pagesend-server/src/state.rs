//! Shared relay state.

use std::sync::Arc;

use pagesend_core::{AppConfig, SettingsFile};
use pagesend_payload::{PageSnapshot, ProviderRegistry};
use pagesend_trigger::{
    Collaborators, FixedSnapshot, LogNotifier, MenuRegistrar, NoPrompt, TriggerHandler,
};

use crate::relay::{DeferredOpener, RelayMenuSink};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: AppConfig,
    pub settings: Arc<SettingsFile>,
    pub registry: ProviderRegistry,
    pub menus: MenuRegistrar,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let settings = Arc::new(SettingsFile::new(&config.settings_file));
        Self {
            config,
            settings,
            registry: ProviderRegistry::builtin(),
            menus: MenuRegistrar::new(Arc::new(RelayMenuSink)),
        }
    }

    /// Handler for one relayed trigger. The snapshot comes with the request
    /// and the extension opens the window from the response.
    pub fn trigger_handler(&self, snapshot: Option<PageSnapshot>) -> TriggerHandler {
        let collaborators = Collaborators {
            settings: self.settings.clone(),
            snapshots: Arc::new(FixedSnapshot(snapshot)),
            opener: Arc::new(DeferredOpener),
            notifier: Arc::new(LogNotifier),
            prompt: Arc::new(NoPrompt),
        };
        TriggerHandler::with_registry(collaborators, self.registry.clone())
    }
}
