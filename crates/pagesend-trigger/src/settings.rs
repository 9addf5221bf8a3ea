//! Settings read path: normalize on read, repair storage when needed.

use async_trait::async_trait;
use pagesend_core::{normalize, Result, Settings, SettingsFile, StoredSettings};
use tracing::{info, warn};

use crate::collaborators::SettingsStore;

#[async_trait]
impl SettingsStore for SettingsFile {
    async fn get(&self) -> Result<StoredSettings> {
        self.read()
    }

    async fn set(&self, settings: &Settings) -> Result<()> {
        self.write(settings)
    }
}

/// Read and normalize settings without writing anything back. Read
/// failures are logged and yield defaults.
pub async fn current_settings(store: &dyn SettingsStore) -> Settings {
    match store.get().await {
        Ok(stored) => normalize(&stored).settings,
        Err(e) => {
            warn!("Failed to read settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

/// Read and normalize settings, writing the corrected values back exactly
/// when normalization changed something. Never fails: read errors yield
/// defaults without a write, write errors are logged.
pub async fn ensure_settings(store: &dyn SettingsStore) -> Settings {
    let stored = match store.get().await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Failed to read settings, using defaults: {}", e);
            return Settings::default();
        }
    };

    let normalized = normalize(&stored);
    if normalized.changed {
        match store.set(&normalized.settings).await {
            Ok(()) => info!(
                "Repaired stored settings: provider={} openMode={}",
                normalized.settings.provider, normalized.settings.open_mode
            ),
            Err(e) => warn!("Failed to persist normalized settings: {}", e),
        }
    }

    normalized.settings
}
