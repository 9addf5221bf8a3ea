//! User settings: provider and open mode, parsed from untyped stored values.
//!
//! Stored settings are an untyped key-value map (whatever the extension or a
//! previous version wrote). [`normalize`] turns that map into a fully
//! populated [`Settings`], substituting defaults for anything missing or
//! invalid, and reports whether the stored map needs repairing.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub const PROVIDER_KEY: &str = "provider";
pub const OPEN_MODE_KEY: &str = "openMode";

/// Untyped settings exactly as read from storage.
pub type StoredSettings = Map<String, Value>;

/// Supported AI chat providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    #[serde(rename = "chatgpt")]
    ChatGPT,
    Claude,
    Perplexity,
    Grok,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Self::ChatGPT, Self::Claude, Self::Perplexity, Self::Grok]
    }

    /// Canonical stored identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChatGPT => "chatgpt",
            Self::Claude => "claude",
            Self::Perplexity => "perplexity",
            Self::Grok => "grok",
        }
    }

    /// Label shown in menus and notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ChatGPT => "ChatGPT",
            Self::Claude => "Claude",
            Self::Perplexity => "Perplexity",
            Self::Grok => "Grok",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "chatgpt" => Some(Self::ChatGPT),
            "claude" => Some(Self::Claude),
            "perplexity" => Some(Self::Perplexity),
            "grok" => Some(Self::Grok),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where the provider page is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenMode {
    #[default]
    Popup,
    Tab,
}

impl OpenMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Popup => "popup",
            Self::Tab => "tab",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "popup" => Some(Self::Popup),
            "tab" => Some(Self::Tab),
            _ => None,
        }
    }
}

impl std::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fully populated user settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub provider: Provider,
    pub open_mode: OpenMode,
}

impl Settings {
    /// Canonical stored form.
    pub fn to_stored(&self) -> StoredSettings {
        let mut map = Map::new();
        map.insert(PROVIDER_KEY.into(), Value::from(self.provider.name()));
        map.insert(OPEN_MODE_KEY.into(), Value::from(self.open_mode.name()));
        map
    }
}

/// Result of normalizing stored settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub settings: Settings,
    /// True when the stored map differs from the canonical form of `settings`
    /// and should be written back.
    pub changed: bool,
}

/// Parse each field as its enum, substituting the default for anything
/// missing or invalid. Never fails.
pub fn normalize(stored: &StoredSettings) -> Normalized {
    let provider = stored
        .get(PROVIDER_KEY)
        .and_then(Value::as_str)
        .and_then(Provider::from_name)
        .unwrap_or_default();
    let open_mode = stored
        .get(OPEN_MODE_KEY)
        .and_then(Value::as_str)
        .and_then(OpenMode::from_name)
        .unwrap_or_default();

    let settings = Settings {
        provider,
        open_mode,
    };
    let changed = settings
        .to_stored()
        .iter()
        .any(|(key, canonical)| stored.get(key) != Some(canonical));

    if changed {
        debug!("Settings normalized to {}/{}", provider, open_mode);
    }

    Normalized { settings, changed }
}

/// JSON-file key-value settings store (`settings.json`).
///
/// Unknown keys written by other components are preserved on write.
pub struct SettingsFile {
    path: PathBuf,
    io: Mutex<()>,
}

impl SettingsFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            io: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw stored map. A missing file is an empty map.
    pub fn read(&self) -> Result<StoredSettings> {
        let _guard = self.io.lock();
        self.read_unlocked()
    }

    /// Merge `settings` into the stored map and write it back.
    pub fn write(&self, settings: &Settings) -> Result<()> {
        self.update(|stored| stored.extend(settings.to_stored()))
            .map(|_| ())
    }

    /// Read, modify, and write the stored map under one lock, so concurrent
    /// updates never overwrite each other. An unreadable file is replaced.
    pub fn update<F>(&self, apply: F) -> Result<StoredSettings>
    where
        F: FnOnce(&mut StoredSettings),
    {
        let _guard = self.io.lock();
        let mut stored = self.read_unlocked().unwrap_or_else(|e| {
            warn!(
                "Discarding unreadable settings in {}: {}",
                self.path.display(),
                e
            );
            Map::new()
        });
        apply(&mut stored);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Value::Object(stored.clone()))?;
        std::fs::write(&self.path, json)?;
        info!("Saved settings to {}", self.path.display());
        Ok(stored)
    }

    fn read_unlocked(&self) -> Result<StoredSettings> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&data)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Storage(format!(
                "settings file {} holds {} instead of an object",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored(value: Value) -> StoredSettings {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_empty_uses_defaults() {
        let normalized = normalize(&StoredSettings::new());
        assert_eq!(normalized.settings, Settings::default());
        assert_eq!(normalized.settings.provider, Provider::ChatGPT);
        assert_eq!(normalized.settings.open_mode, OpenMode::Popup);
        assert!(normalized.changed);
    }

    #[test]
    fn test_normalize_bogus_provider_keeps_open_mode() {
        let normalized = normalize(&stored(json!({ "provider": "bogus", "openMode": "tab" })));
        assert_eq!(normalized.settings.provider, Provider::ChatGPT);
        assert_eq!(normalized.settings.open_mode, OpenMode::Tab);
        assert!(normalized.changed);
    }

    #[test]
    fn test_normalize_canonical_is_unchanged() {
        let normalized = normalize(&stored(json!({ "provider": "claude", "openMode": "popup" })));
        assert_eq!(normalized.settings.provider, Provider::Claude);
        assert!(!normalized.changed);
    }

    #[test]
    fn test_normalize_non_canonical_spelling() {
        let normalized = normalize(&stored(json!({ "provider": " Grok ", "openMode": "TAB" })));
        assert_eq!(normalized.settings.provider, Provider::Grok);
        assert_eq!(normalized.settings.open_mode, OpenMode::Tab);
        assert!(normalized.changed);
    }

    #[test]
    fn test_normalize_wrong_types() {
        let normalized = normalize(&stored(json!({ "provider": 7, "openMode": null })));
        assert_eq!(normalized.settings, Settings::default());
        assert!(normalized.changed);
    }

    #[test]
    fn test_normalize_ignores_unknown_keys() {
        let normalized = normalize(&stored(json!({
            "provider": "perplexity",
            "openMode": "tab",
            "theme": "dark",
        })));
        assert!(!normalized.changed);
    }

    #[test]
    fn test_settings_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.json"));
        assert!(file.read().unwrap().is_empty());
    }

    #[test]
    fn test_settings_file_write_preserves_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"provider":"bogus","theme":"dark"}"#).unwrap();

        let file = SettingsFile::new(&path);
        let settings = Settings {
            provider: Provider::Claude,
            open_mode: OpenMode::Tab,
        };
        file.write(&settings).unwrap();

        let raw = file.read().unwrap();
        assert_eq!(raw["provider"], "claude");
        assert_eq!(raw["openMode"], "tab");
        assert_eq!(raw["theme"], "dark");
        assert!(!normalize(&raw).changed);
    }

    #[test]
    fn test_settings_file_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = SettingsFile::new(&path).read().unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_settings_file_update_keeps_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = std::sync::Arc::new(SettingsFile::new(dir.path().join("settings.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let file = file.clone();
                std::thread::spawn(move || {
                    file.update(|stored| {
                        stored.insert(format!("key{}", i), json!(i));
                    })
                    .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let raw = file.read().unwrap();
        for i in 0..8 {
            assert_eq!(raw[&format!("key{}", i)], json!(i));
        }
    }

    #[test]
    fn test_settings_file_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let file = SettingsFile::new(&path);
        file.write(&Settings::default()).unwrap();

        let raw = file.read().unwrap();
        assert_eq!(raw["provider"], "chatgpt");
        assert_eq!(raw["openMode"], "popup");
    }
}
