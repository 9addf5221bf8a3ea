//! PageSend Core: settings model and normalization, configuration, errors.

pub mod config;
pub mod error;
pub mod settings;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use settings::{normalize, Normalized, OpenMode, Provider, Settings, SettingsFile, StoredSettings};
