//! Trigger pipeline types: matching the extension's message shapes.

use pagesend_core::{OpenMode, Provider};
use pagesend_payload::{ActionKind, TabInfo};
use serde::{Deserialize, Serialize};

/// Popup window width in pixels.
pub const POPUP_WIDTH: u32 = 960;
/// Popup window height in pixels.
pub const POPUP_HEIGHT: u32 = 800;

/// Where a trigger came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerSource {
    Toolbar,
    Shortcut,
    ContextMenu,
}

/// A single user trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub source: TriggerSource,
    /// Toolbar and shortcut triggers leave this empty and mean summary.
    #[serde(default)]
    pub action: Option<ActionKind>,
    pub tab: TabInfo,
    /// Selection reported by the context-menu click, if any.
    #[serde(default)]
    pub selection_text: Option<String>,
    /// Explicit translation target (`fr`, `zh-CN`).
    #[serde(default)]
    pub language: Option<String>,
    /// Browser UI locale, the fallback translation target.
    #[serde(default)]
    pub ui_locale: Option<String>,
    /// Follow-up question collected before the trigger was sent.
    #[serde(default)]
    pub question: Option<String>,
}

impl Trigger {
    pub fn new(source: TriggerSource, tab: TabInfo) -> Self {
        Self {
            source,
            action: None,
            tab,
            selection_text: None,
            language: None,
            ui_locale: None,
            question: None,
        }
    }

    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    pub fn action(&self) -> ActionKind {
        self.action.unwrap_or_default()
    }
}

/// Window geometry for popup mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn popup() -> Self {
        Self {
            width: POPUP_WIDTH,
            height: POPUP_HEIGHT,
        }
    }
}

/// What the window opener is asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub url: String,
    pub provider: Provider,
    pub open_mode: OpenMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowSize>,
    pub payload: String,
}

impl OpenRequest {
    pub fn new(url: String, provider: Provider, open_mode: OpenMode, payload: String) -> Self {
        let window = match open_mode {
            OpenMode::Popup => Some(WindowSize::popup()),
            OpenMode::Tab => None,
        };
        Self {
            url,
            provider,
            open_mode,
            window,
            payload,
        }
    }
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub created_at: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// How a trigger ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TriggerOutcome {
    Opened {
        #[serde(flatten)]
        request: OpenRequest,
    },
    NoPayload {
        notification: Notification,
    },
    OpenFailed {
        #[serde(flatten)]
        request: OpenRequest,
        notification: Notification,
    },
}

impl TriggerOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, Self::Opened { .. })
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Opened { .. } => None,
            Self::NoPayload { notification } | Self::OpenFailed { notification, .. } => {
                Some(notification)
            }
        }
    }
}

/// Payload and URL a trigger would produce, without opening anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub action: ActionKind,
    pub provider: Provider,
    pub payload: Option<String>,
    pub url: Option<String>,
}

/// Page/selection contexts a menu entry is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Page,
    Selection,
}

/// One context-menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: String,
    pub action: ActionKind,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}
