//! Opens provider pages in the system browser (CLI use).

use async_trait::async_trait;
use pagesend_core::{Error, Result};
use pagesend_trigger::{OpenRequest, WindowOpener};
use tracing::info;

/// Hands the URL to the system browser. The desktop has no popup geometry
/// to apply, so both open modes open a browser tab.
pub struct SystemBrowserOpener;

#[async_trait]
impl WindowOpener for SystemBrowserOpener {
    async fn open(&self, request: &OpenRequest) -> Result<()> {
        let url = request.url.clone();
        info!("Opening {} in the system browser", request.provider);
        tokio::task::spawn_blocking(move || opener::open_browser(&url))
            .await
            .map_err(|e| Error::Internal(e.to_string()))?
            .map_err(|e| Error::Open(e.to_string()))
    }
}
