//! Trigger handler: snapshot, select, build URL, open, notify.

use std::sync::Arc;

use pagesend_core::{Provider, Settings};
use pagesend_payload::{
    select_payload, ActionKind, ActionRequest, PageSnapshot, ProviderRegistry, TargetLanguage,
};
use tracing::{debug, info, warn};

use crate::collaborators::*;
use crate::settings::{current_settings, ensure_settings};
use crate::types::*;

const NOTIFICATION_TITLE: &str = "PageSend";

/// The platform surfaces one handler talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub settings: Arc<dyn SettingsStore>,
    pub snapshots: Arc<dyn SnapshotSource>,
    pub opener: Arc<dyn WindowOpener>,
    pub notifier: Arc<dyn Notifier>,
    pub prompt: Arc<dyn QuestionPrompt>,
}

/// Runs the trigger pipeline. Cheap to build per trigger.
pub struct TriggerHandler {
    collaborators: Collaborators,
    registry: ProviderRegistry,
}

impl TriggerHandler {
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_registry(collaborators, ProviderRegistry::builtin())
    }

    pub fn with_registry(collaborators: Collaborators, registry: ProviderRegistry) -> Self {
        Self {
            collaborators,
            registry,
        }
    }

    /// Handle one trigger end to end. Never fails: every problem ends as
    /// a fallback, a log line, or a single notification.
    pub async fn handle(&self, trigger: &Trigger) -> TriggerOutcome {
        let settings = ensure_settings(self.collaborators.settings.as_ref()).await;
        let action = trigger.action();

        let payload = self.select(trigger, action).await;
        let Some(payload) = payload else {
            let notification = Notification::new(
                NOTIFICATION_TITLE,
                no_payload_message(action, settings.provider),
            );
            info!("Nothing to send for {} trigger ({})", action, trigger.tab.url);
            self.notify(&notification).await;
            return TriggerOutcome::NoPayload { notification };
        };

        let url = self
            .registry
            .build_provider_url(settings.provider, &payload);
        let request = OpenRequest::new(url, settings.provider, settings.open_mode, payload);

        match self.collaborators.opener.open(&request).await {
            Ok(()) => {
                info!(
                    "Opened {} ({}) for {} trigger",
                    settings.provider, settings.open_mode, action
                );
                TriggerOutcome::Opened { request }
            }
            Err(e) => {
                warn!("Could not open {}: {}", settings.provider, e);
                let notification = Notification::new(
                    NOTIFICATION_TITLE,
                    format!("Could not open {}.", settings.provider.display_name()),
                );
                self.notify(&notification).await;
                TriggerOutcome::OpenFailed {
                    request,
                    notification,
                }
            }
        }
    }

    /// Payload and URL the trigger would produce. Reads settings without
    /// repairing them and never opens or notifies.
    pub async fn preview(&self, trigger: &Trigger) -> Preview {
        let settings: Settings = current_settings(self.collaborators.settings.as_ref()).await;
        let action = trigger.action();
        let payload = self.select(trigger, action).await;
        let url = payload
            .as_deref()
            .map(|p| self.registry.build_provider_url(settings.provider, p));
        Preview {
            action,
            provider: settings.provider,
            payload,
            url,
        }
    }

    async fn select(&self, trigger: &Trigger, action: ActionKind) -> Option<String> {
        let snapshot = self.snapshot(trigger).await;
        let request = self.action_request(trigger, action).await;
        select_payload(&snapshot, &trigger.tab, &request)
    }

    /// Probe the page unless it is restricted. Any failure becomes a failed
    /// snapshot; a context-menu selection fills in an empty one.
    async fn snapshot(&self, trigger: &Trigger) -> PageSnapshot {
        let mut snapshot = if trigger.tab.is_restricted() {
            debug!("Skipping extraction on restricted page {}", trigger.tab.url);
            PageSnapshot::failed()
        } else {
            match self.collaborators.snapshots.snapshot(&trigger.tab).await {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => {
                    debug!("No snapshot for {}", trigger.tab.url);
                    PageSnapshot::failed()
                }
                Err(e) => {
                    debug!("Snapshot failed for {}: {}", trigger.tab.url, e);
                    PageSnapshot::failed()
                }
            }
        };

        let menu_selection = trigger
            .selection_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(selection) = menu_selection {
            if !snapshot.extraction_succeeded {
                snapshot = PageSnapshot {
                    extraction_succeeded: true,
                    ..PageSnapshot::failed()
                };
            }
            if snapshot.selection_text.trim().is_empty() {
                snapshot.selection_text = selection.to_string();
            }
        }

        snapshot
    }

    async fn action_request(&self, trigger: &Trigger, action: ActionKind) -> ActionRequest {
        match action {
            ActionKind::Summary => ActionRequest::Summary,
            ActionKind::Rewrite => ActionRequest::Rewrite,
            ActionKind::Translate => ActionRequest::Translate {
                language: TargetLanguage::resolve(
                    trigger.language.as_deref(),
                    trigger.ui_locale.as_deref(),
                ),
            },
            ActionKind::Followup => {
                let question = match &trigger.question {
                    Some(question) => question.clone(),
                    None => match self.collaborators.prompt.ask(&trigger.tab).await {
                        Ok(answer) => answer.unwrap_or_default(),
                        Err(e) => {
                            warn!("Follow-up prompt failed: {}", e);
                            String::new()
                        }
                    },
                };
                ActionRequest::Followup { question }
            }
        }
    }

    async fn notify(&self, notification: &Notification) {
        if let Err(e) = self.collaborators.notifier.notify(notification).await {
            warn!("Failed to show notification: {}", e);
        }
    }
}

fn no_payload_message(action: ActionKind, provider: Provider) -> String {
    match action {
        ActionKind::Followup => format!("Type a question to ask {}.", provider.display_name()),
        ActionKind::Translate => "Nothing to translate, or no target language.".to_string(),
        _ => format!("Nothing on this page to send to {}.", provider.display_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pagesend_core::{Error, OpenMode, Result, StoredSettings};
    use pagesend_payload::TabInfo;
    use parking_lot::Mutex;
    use serde_json::json;

    struct MemoryStore(Mutex<StoredSettings>);

    #[async_trait]
    impl SettingsStore for MemoryStore {
        async fn get(&self) -> Result<StoredSettings> {
            Ok(self.0.lock().clone())
        }

        async fn set(&self, settings: &Settings) -> Result<()> {
            self.0.lock().extend(settings.to_stored());
            Ok(())
        }
    }

    struct FailingSnapshots;

    #[async_trait]
    impl SnapshotSource for FailingSnapshots {
        async fn snapshot(&self, _tab: &TabInfo) -> Result<Option<PageSnapshot>> {
            Err(Error::Extraction("script injection blocked".into()))
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<OpenRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl WindowOpener for RecordingOpener {
        async fn open(&self, request: &OpenRequest) -> Result<()> {
            if self.fail {
                return Err(Error::Open("window limit".into()));
            }
            self.opened.lock().push(request.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<Notification>>);

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &Notification) -> Result<()> {
            self.0.lock().push(notification.clone());
            Err(Error::Notify("toasts disabled".into()))
        }
    }

    struct AnswerPrompt(&'static str);

    #[async_trait]
    impl QuestionPrompt for AnswerPrompt {
        async fn ask(&self, _tab: &TabInfo) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    struct Harness {
        handler: TriggerHandler,
        opener: Arc<RecordingOpener>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(
        settings: serde_json::Value,
        snapshots: Arc<dyn SnapshotSource>,
        opener: RecordingOpener,
        prompt: Arc<dyn QuestionPrompt>,
    ) -> Harness {
        let opener = Arc::new(opener);
        let notifier = Arc::new(RecordingNotifier::default());
        let collaborators = Collaborators {
            settings: Arc::new(MemoryStore(Mutex::new(
                settings.as_object().cloned().unwrap_or_default(),
            ))),
            snapshots,
            opener: opener.clone(),
            notifier: notifier.clone(),
            prompt,
        };
        Harness {
            handler: TriggerHandler::new(collaborators),
            opener,
            notifier,
        }
    }

    fn page(selection: &str, page_len: usize) -> Arc<dyn SnapshotSource> {
        Arc::new(FixedSnapshot(Some(PageSnapshot {
            selection_text: selection.into(),
            page_text_length: page_len,
            title: "Doc".into(),
            url: "https://x.test/a".into(),
            extraction_succeeded: true,
        })))
    }

    fn tab() -> TabInfo {
        TabInfo::new("https://x.test/a", "Doc")
    }

    #[tokio::test]
    async fn test_toolbar_opens_popup_with_selection() {
        let h = harness(
            json!({ "provider": "claude" }),
            page("Hello world", 100),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let outcome = h.handler.handle(&Trigger::new(TriggerSource::Toolbar, tab())).await;
        assert!(outcome.is_opened());

        let opened = h.opener.opened.lock();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].url, "https://claude.ai/new?q=Hello%20world");
        assert_eq!(opened[0].open_mode, OpenMode::Popup);
        assert_eq!(opened[0].window, Some(WindowSize::popup()));
    }

    #[tokio::test]
    async fn test_tab_mode_has_no_window_size() {
        let h = harness(
            json!({ "openMode": "tab" }),
            page("", 5000),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let outcome = h.handler.handle(&Trigger::new(TriggerSource::Shortcut, tab())).await;
        match outcome {
            TriggerOutcome::Opened { request } => {
                assert_eq!(request.payload, "https://x.test/a");
                assert_eq!(request.window, None);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_falls_back_to_tab() {
        let h = harness(
            json!({}),
            Arc::new(FailingSnapshots),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let outcome = h.handler.handle(&Trigger::new(TriggerSource::Toolbar, tab())).await;
        assert!(outcome.is_opened());
        assert_eq!(
            h.opener.opened.lock()[0].payload,
            "summarize this page: Doc https://x.test/a"
        );
        assert!(h.notifier.0.lock().is_empty());
    }

    #[tokio::test]
    async fn test_restricted_page_skips_extraction() {
        let h = harness(
            json!({}),
            page("should not be used", 100),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let trigger = Trigger::new(TriggerSource::Toolbar, TabInfo::new("chrome://extensions", "Extensions"));
        h.handler.handle(&trigger).await;
        assert_eq!(
            h.opener.opened.lock()[0].payload,
            "summarize this page: Extensions chrome://extensions"
        );
    }

    #[tokio::test]
    async fn test_context_menu_selection_fills_snapshot() {
        let h = harness(
            json!({}),
            Arc::new(NoSnapshot),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let mut trigger =
            Trigger::new(TriggerSource::ContextMenu, tab()).with_action(ActionKind::Translate);
        trigger.selection_text = Some("Guten Tag".into());
        trigger.ui_locale = Some("en-GB".into());

        h.handler.handle(&trigger).await;
        assert_eq!(
            h.opener.opened.lock()[0].payload,
            "translate the following into English: Guten Tag"
        );
    }

    #[tokio::test]
    async fn test_no_payload_notifies_once() {
        let h = harness(
            json!({}),
            Arc::new(NoSnapshot),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let trigger = Trigger::new(TriggerSource::Toolbar, TabInfo::default());
        let outcome = h.handler.handle(&trigger).await;
        assert!(matches!(outcome, TriggerOutcome::NoPayload { .. }));
        assert!(h.opener.opened.lock().is_empty());
        assert_eq!(h.notifier.0.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_followup_uses_prompt_answer() {
        let h = harness(
            json!({}),
            page("", 100),
            RecordingOpener::default(),
            Arc::new(AnswerPrompt("What is this?")),
        );

        let trigger = Trigger::new(TriggerSource::ContextMenu, tab()).with_action(ActionKind::Followup);
        h.handler.handle(&trigger).await;
        assert_eq!(
            h.opener.opened.lock()[0].payload,
            "Context: Doc https://x.test/a\n\nQuestion: What is this?"
        );
    }

    #[tokio::test]
    async fn test_followup_cancelled_prompt_is_no_payload() {
        let h = harness(
            json!({}),
            page("selected", 100),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let trigger = Trigger::new(TriggerSource::ContextMenu, tab()).with_action(ActionKind::Followup);
        let outcome = h.handler.handle(&trigger).await;
        assert!(matches!(outcome, TriggerOutcome::NoPayload { .. }));
    }

    #[tokio::test]
    async fn test_open_failure_notifies_without_retry() {
        let h = harness(
            json!({ "openMode": "popup" }),
            page("Hello", 100),
            RecordingOpener {
                fail: true,
                ..Default::default()
            },
            Arc::new(NoPrompt),
        );

        let outcome = h.handler.handle(&Trigger::new(TriggerSource::Toolbar, tab())).await;
        match &outcome {
            TriggerOutcome::OpenFailed { request, notification } => {
                assert_eq!(request.open_mode, OpenMode::Popup);
                assert_eq!(notification.message, "Could not open ChatGPT.");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(h.notifier.0.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_preview_does_not_open() {
        let h = harness(
            json!({ "provider": "grok" }),
            page("Hello world", 100),
            RecordingOpener::default(),
            Arc::new(NoPrompt),
        );

        let preview = h.handler.preview(&Trigger::new(TriggerSource::Toolbar, tab())).await;
        assert_eq!(preview.payload.as_deref(), Some("Hello world"));
        assert_eq!(preview.url.as_deref(), Some("https://grok.com/?q=Hello%20world"));
        assert!(h.opener.opened.lock().is_empty());
    }
}
