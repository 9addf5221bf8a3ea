//! Translation target languages and their display labels.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Known language tags and the names used in translate prompts.
const KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh-CN", "Simplified Chinese"),
    ("zh-TW", "Traditional Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("th", "Thai"),
    ("id", "Indonesian"),
];

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").unwrap());

/// A resolved translation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLanguage {
    pub code: String,
    pub display_name: String,
}

impl TargetLanguage {
    /// Resolve from an explicitly requested code, falling back to the
    /// browser UI locale. `None` when neither is a usable language tag.
    pub fn resolve(requested: Option<&str>, ui_locale: Option<&str>) -> Option<Self> {
        requested
            .and_then(Self::parse)
            .or_else(|| ui_locale.and_then(Self::parse))
    }

    /// Parse a BCP 47-style tag (`fr`, `en_US`, `zh-Hant-TW`).
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('_', "-");
        if !TAG_RE.is_match(&tag) {
            return None;
        }
        let canonical = canonicalize(&tag);
        let (code, display_name) = lookup(&canonical)
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .unwrap_or_else(|| (canonical.clone(), canonical.clone()));
        Some(Self { code, display_name })
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// Lowercase language, titlecase script, uppercase region.
fn canonicalize(tag: &str) -> String {
    tag.split('-')
        .enumerate()
        .map(|(i, part)| match (i, part.len()) {
            (0, _) => part.to_lowercase(),
            (_, 2) => part.to_uppercase(),
            (_, 4) => {
                let lower = part.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => lower,
                }
            }
            _ => part.to_lowercase(),
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn lookup(canonical: &str) -> Option<(&'static str, &'static str)> {
    if let Some(entry) = KNOWN_LANGUAGES.iter().find(|(code, _)| *code == canonical) {
        return Some(*entry);
    }

    let mut parts = canonical.split('-');
    let primary = parts.next()?;
    if primary == "zh" {
        let traditional = parts.any(|p| matches!(p, "Hant" | "TW" | "HK" | "MO"));
        let code = if traditional { "zh-TW" } else { "zh-CN" };
        return KNOWN_LANGUAGES.iter().find(|(c, _)| *c == code).copied();
    }

    KNOWN_LANGUAGES
        .iter()
        .find(|(code, _)| *code == primary)
        .copied()
}
