//! Collaborator traits for the platform surfaces the pipeline depends on.
//!
//! All of them may fail independently; the pipeline decides per trait
//! whether a failure falls back silently, is logged, or becomes a
//! notification.

use async_trait::async_trait;
use pagesend_core::{Result, Settings, StoredSettings};
use pagesend_payload::{PageSnapshot, TabInfo};

use crate::types::{MenuEntry, Notification, OpenRequest};

/// Key-value storage for `{provider, openMode}`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Raw stored values, possibly partial or invalid.
    async fn get(&self) -> Result<StoredSettings>;

    async fn set(&self, settings: &Settings) -> Result<()>;
}

/// Probes the active page for its selection, text length, title, and URL.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// `Ok(None)` when the page gave no answer.
    async fn snapshot(&self, tab: &TabInfo) -> Result<Option<PageSnapshot>>;
}

/// Shows the provider page in a popup or a tab.
#[async_trait]
pub trait WindowOpener: Send + Sync {
    async fn open(&self, request: &OpenRequest) -> Result<()>;
}

/// Best-effort toast surface.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Collects the follow-up question from the user.
#[async_trait]
pub trait QuestionPrompt: Send + Sync {
    /// `Ok(None)` when the user cancelled.
    async fn ask(&self, tab: &TabInfo) -> Result<Option<String>>;
}

/// Context-menu registration surface.
#[async_trait]
pub trait MenuSink: Send + Sync {
    async fn remove_all(&self) -> Result<()>;

    async fn create(&self, entry: &MenuEntry) -> Result<()>;
}

/// Snapshot source for hosts that cannot probe pages; every extraction
/// counts as failed and the tab metadata is used.
pub struct NoSnapshot;

#[async_trait]
impl SnapshotSource for NoSnapshot {
    async fn snapshot(&self, _tab: &TabInfo) -> Result<Option<PageSnapshot>> {
        Ok(None)
    }
}

/// Snapshot source answering with a snapshot captured up front.
pub struct FixedSnapshot(pub Option<PageSnapshot>);

#[async_trait]
impl SnapshotSource for FixedSnapshot {
    async fn snapshot(&self, _tab: &TabInfo) -> Result<Option<PageSnapshot>> {
        Ok(self.0.clone())
    }
}

/// Prompt for hosts without an interactive surface; always cancelled.
pub struct NoPrompt;

#[async_trait]
impl QuestionPrompt for NoPrompt {
    async fn ask(&self, _tab: &TabInfo) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Notifier that only logs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        tracing::info!("{}: {}", notification.title, notification.message);
        Ok(())
    }
}
