//! Payload selection policy.
//!
//! Given what the page offered (selection, body length, URL, title) pick the
//! text to send for each action:
//!
//! - a short selection is sent as-is (or wrapped in the action's phrase);
//! - otherwise the page is handed over by URL so the provider can fetch it;
//! - without a URL, a long selection is cut to `MAX_QUERY_LENGTH`;
//! - the title is the last resort.
//!
//! Phrases are folded onto one line; a bare selection is sent untouched.
//!
//! The wording of the phrases is presentation; which source wins and the
//! length thresholds are what callers rely on.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::action::ActionRequest;
use crate::language::TargetLanguage;
use crate::snapshot::{PageSignals, PageSnapshot, TabInfo};

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\r\n|[\r\n\u{2028}\u{2029}]").unwrap());

/// Decide what to send for `request`. `None` means there is nothing usable
/// and the trigger should end with a notification.
pub fn select_payload(
    snapshot: &PageSnapshot,
    tab: &TabInfo,
    request: &ActionRequest,
) -> Option<String> {
    let signals = PageSignals::classify(snapshot, tab);

    let payload = match request {
        ActionRequest::Followup { question } => followup(&signals, question),
        _ if !signals.has_any_signal() => None,
        ActionRequest::Summary => summary(&signals),
        ActionRequest::Translate { language } => language
            .as_ref()
            .and_then(|lang| translate(&signals, lang)),
        ActionRequest::Rewrite => rewrite(&signals),
    };

    debug!(
        action = %request.kind(),
        has_selection = signals.has_selection,
        selection_is_long = signals.selection_is_long,
        page_is_long = signals.page_is_long,
        selected = payload.is_some(),
        "Payload selection"
    );

    payload
}

fn summary(s: &PageSignals<'_>) -> Option<String> {
    if s.selection_is_short {
        return Some(s.selection.to_string());
    }

    if s.page_is_long {
        if !s.url.is_empty() {
            return Some(s.url.to_string());
        }
        if !s.truncated_selection.is_empty() {
            return Some(s.truncated_selection.to_string());
        }
        return titled("summarize:", s.title);
    }

    // Not long means nothing was selected.
    if !s.url.is_empty() {
        return Some(with_title("summarize this page:", s.title, s.url));
    }
    titled("summarize:", s.title)
}

fn translate(s: &PageSignals<'_>, lang: &TargetLanguage) -> Option<String> {
    let name = &lang.display_name;

    if s.selection_is_short {
        return Some(single_line(&format!(
            "translate the following into {}: {}",
            name, s.selection
        )));
    }
    if !s.url.is_empty() {
        return Some(with_title(
            &format!("translate this page into {}:", name),
            s.title,
            s.url,
        ));
    }
    if !s.truncated_selection.is_empty() {
        return Some(single_line(&format!(
            "translate the following into {} (long content; partial excerpt): {}",
            name, s.truncated_selection
        )));
    }
    if !s.title.is_empty() {
        return Some(single_line(&format!(
            "translate this title into {}: {}",
            name, s.title
        )));
    }
    Some(format!("translate this page into {}", name))
}

fn rewrite(s: &PageSignals<'_>) -> Option<String> {
    if s.selection_is_short {
        return Some(single_line(&format!(
            "rewrite and polish the following: {}",
            s.selection
        )));
    }
    if !s.url.is_empty() {
        return Some(with_title(
            "rewrite and polish the content of this page:",
            s.title,
            s.url,
        ));
    }
    if !s.truncated_selection.is_empty() {
        return Some(single_line(&format!(
            "rewrite and polish the following (long content; partial excerpt): {}",
            s.truncated_selection
        )));
    }
    titled("rewrite and polish:", s.title)
}

fn followup(s: &PageSignals<'_>, question: &str) -> Option<String> {
    let question = question.trim();
    if question.is_empty() {
        return None;
    }

    let context = if s.has_selection {
        format!("Context:\n{}", s.truncated_selection)
    } else if !s.url.is_empty() {
        with_title("Context:", s.title, s.url)
    } else if !s.title.is_empty() {
        single_line(&format!("Context: {}", s.title))
    } else {
        return Some(question.to_string());
    };

    Some(format!("{}\n\nQuestion: {}", context, question))
}

/// `"{prefix} {title} {url}"`, leaving out an empty title.
fn with_title(prefix: &str, title: &str, url: &str) -> String {
    if title.is_empty() {
        single_line(&format!("{} {}", prefix, url))
    } else {
        single_line(&format!("{} {} {}", prefix, title, url))
    }
}

fn titled(prefix: &str, title: &str) -> Option<String> {
    (!title.is_empty()).then(|| single_line(&format!("{} {}", prefix, title)))
}

/// Fold line breaks into spaces so the payload fits a single-line query.
fn single_line(text: &str) -> String {
    LINE_BREAK_RE.replace_all(text, " ").into_owned()
}
