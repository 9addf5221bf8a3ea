//! Collaborators for relayed triggers, where the extension itself owns
//! windows and menus and only needs the pipeline's decisions.

use async_trait::async_trait;
use pagesend_core::Result;
use pagesend_trigger::{MenuEntry, MenuSink, OpenRequest, WindowOpener};
use tracing::debug;

/// Accepts every open request; the response carries it back to the
/// extension, which creates the popup or tab.
pub struct DeferredOpener;

#[async_trait]
impl WindowOpener for DeferredOpener {
    async fn open(&self, request: &OpenRequest) -> Result<()> {
        debug!("Deferring {} open of {} to extension", request.open_mode, request.provider);
        Ok(())
    }
}

/// Menu sink for the relay. Entries are served from `/api/menus` and the
/// extension mirrors them into `chrome.contextMenus`.
pub struct RelayMenuSink;

#[async_trait]
impl MenuSink for RelayMenuSink {
    async fn remove_all(&self) -> Result<()> {
        debug!("Clearing relayed menu entries");
        Ok(())
    }

    async fn create(&self, entry: &MenuEntry) -> Result<()> {
        debug!("Menu entry {}: {}", entry.id, entry.title);
        Ok(())
    }
}
