//! Page snapshots, tab metadata, and length classification.

use serde::{Deserialize, Serialize};

/// Longest text sent verbatim in a provider query, in characters.
pub const MAX_QUERY_LENGTH: usize = 1500;

/// Pages with more body text than this are handed to the provider by URL.
pub const LONG_PAGE_THRESHOLD: usize = 4000;

/// URL prefixes of pages the extension cannot script.
const RESTRICTED_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "edge://",
    "about:",
    "view-source:",
    "devtools://",
    "moz-extension://",
    "https://chrome.google.com/webstore",
    "https://chromewebstore.google.com",
];

/// Text extracted from the active page at trigger time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    #[serde(default)]
    pub selection_text: String,
    #[serde(default)]
    pub page_text_length: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_true")]
    pub extraction_succeeded: bool,
}

fn default_true() -> bool {
    true
}

impl PageSnapshot {
    /// Snapshot standing in for an extraction that failed or was skipped.
    pub fn failed() -> Self {
        Self {
            selection_text: String::new(),
            page_text_length: 0,
            title: String::new(),
            url: String::new(),
            extraction_succeeded: false,
        }
    }
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self::failed()
    }
}

/// Tab metadata, available even when the page itself cannot be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl TabInfo {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// Browser-internal pages where content extraction must be skipped.
    pub fn is_restricted(&self) -> bool {
        let url = self.url.trim().to_lowercase();
        RESTRICTED_PREFIXES
            .iter()
            .any(|prefix| url.starts_with(prefix))
    }
}

/// Classification of a snapshot against the length thresholds, with the
/// effective URL and title resolved against the tab fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSignals<'a> {
    /// Trimmed selection; empty when extraction failed.
    pub selection: &'a str,
    pub has_selection: bool,
    pub selection_is_short: bool,
    pub selection_is_long: bool,
    pub page_is_long: bool,
    pub page_text_length: usize,
    pub url: &'a str,
    pub title: &'a str,
    /// Selection cut to `MAX_QUERY_LENGTH` characters, trimmed.
    pub truncated_selection: &'a str,
}

impl<'a> PageSignals<'a> {
    pub fn classify(snapshot: &'a PageSnapshot, tab: &'a TabInfo) -> Self {
        let (selection, page_text_length, page_url, page_title) = if snapshot.extraction_succeeded {
            (
                snapshot.selection_text.trim(),
                snapshot.page_text_length,
                snapshot.url.trim(),
                snapshot.title.trim(),
            )
        } else {
            ("", 0, "", "")
        };

        let selection_chars = selection.chars().count();
        let has_selection = selection_chars > 0;
        let selection_is_short = has_selection && selection_chars <= MAX_QUERY_LENGTH;
        let selection_is_long = has_selection && selection_chars > MAX_QUERY_LENGTH;
        let page_is_long =
            (!has_selection && page_text_length > LONG_PAGE_THRESHOLD) || selection_is_long;

        let url = if page_url.is_empty() {
            tab.url.trim()
        } else {
            page_url
        };
        let title = if page_title.is_empty() {
            tab.title.trim()
        } else {
            page_title
        };

        let truncated_selection = if selection_is_short {
            selection
        } else {
            truncate_chars(selection, MAX_QUERY_LENGTH).trim()
        };

        Self {
            selection,
            has_selection,
            selection_is_short,
            selection_is_long,
            page_is_long,
            page_text_length,
            url,
            title,
            truncated_selection,
        }
    }

    /// Whether anything at all could be sent.
    pub fn has_any_signal(&self) -> bool {
        self.has_selection
            || !self.url.is_empty()
            || !self.title.is_empty()
            || self.page_text_length > 0
    }
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
