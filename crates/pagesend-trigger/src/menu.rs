//! Context-menu registration, serialized so at most one runs at a time.

use std::sync::Arc;

use pagesend_core::{Provider, Result, Settings};
use pagesend_payload::ActionKind;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::collaborators::MenuSink;
use crate::types::{MenuContext, MenuEntry};

/// Entries for every action, labelled with the provider's display name.
pub fn menu_entries(provider: Provider) -> Vec<MenuEntry> {
    let name = provider.display_name();
    ActionKind::all()
        .iter()
        .map(|action| {
            let title = match action {
                ActionKind::Summary => format!("Summarize with {}", name),
                ActionKind::Translate => format!("Translate with {}", name),
                ActionKind::Rewrite => format!("Rewrite with {}", name),
                ActionKind::Followup => format!("Ask {} a follow-up", name),
            };
            MenuEntry {
                id: format!("pagesend-{}", action.name()),
                action: *action,
                title,
                contexts: vec![MenuContext::Page, MenuContext::Selection],
            }
        })
        .collect()
}

/// Re-registers the full menu on demand. Callers queue on an async lock, so
/// a registration never interleaves with another.
pub struct MenuRegistrar {
    sink: Arc<dyn MenuSink>,
    registered: Mutex<Vec<MenuEntry>>,
}

impl MenuRegistrar {
    pub fn new(sink: Arc<dyn MenuSink>) -> Self {
        Self {
            sink,
            registered: Mutex::new(Vec::new()),
        }
    }

    /// Remove every entry and create the set for `settings`. Idempotent.
    pub async fn register(&self, settings: &Settings) -> Result<Vec<MenuEntry>> {
        let mut registered = self.registered.lock().await;
        debug!("Registering context menus for {}", settings.provider);

        self.sink.remove_all().await?;
        registered.clear();

        for entry in menu_entries(settings.provider) {
            self.sink.create(&entry).await?;
            registered.push(entry);
        }

        info!("Registered {} context menu entries", registered.len());
        Ok(registered.clone())
    }

    /// Entries from the last registration (partial if it failed midway).
    pub async fn entries(&self) -> Vec<MenuEntry> {
        self.registered.lock().await.clone()
    }
}
