//! Relay configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default relay port when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 3017;

/// Top-level PageSend relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server port.
    pub port: u16,
    /// Root data directory (e.g., `data/`).
    pub data_dir: PathBuf,
    /// Key-value settings file (`data/settings.json`).
    pub settings_file: PathBuf,
}

impl AppConfig {
    /// Create configuration from environment and defaults. Creates the data
    /// directory if needed.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self::new(data_dir, port)
    }

    pub fn new(data_dir: impl AsRef<Path>, port: u16) -> std::io::Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            port,
            settings_file: data_dir.join("settings.json"),
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let config = AppConfig::new(&root, 4000).unwrap();

        assert!(root.is_dir());
        assert_eq!(config.port, 4000);
        assert_eq!(config.settings_file, root.join("settings.json"));
    }
}
