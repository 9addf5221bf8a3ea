//! Requested actions and their extras.

use serde::{Deserialize, Serialize};

use crate::language::TargetLanguage;

/// What the user asked the provider to do with the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    Summary,
    Translate,
    Rewrite,
    Followup,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[Self::Summary, Self::Translate, Self::Rewrite, Self::Followup]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Translate => "translate",
            Self::Rewrite => "rewrite",
            Self::Followup => "followup",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "summary" | "summarize" => Some(Self::Summary),
            "translate" => Some(Self::Translate),
            "rewrite" => Some(Self::Rewrite),
            "followup" | "follow-up" => Some(Self::Followup),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An action together with the extras it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Summary,
    /// `language` is `None` when no target could be resolved.
    Translate { language: Option<TargetLanguage> },
    Rewrite,
    /// `question` is the user's text as entered, possibly blank.
    Followup { question: String },
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Summary => ActionKind::Summary,
            Self::Translate { .. } => ActionKind::Translate,
            Self::Rewrite => ActionKind::Rewrite,
            Self::Followup { .. } => ActionKind::Followup,
        }
    }
}
