//! Trigger pipeline: toolbar, shortcut, and context-menu triggers all run
//! snapshot → payload selection → provider URL → window opener.
//!
//! Platform surfaces (settings storage, page probing, windows, toasts,
//! menus) are collaborator traits so the extension host, the relay server,
//! or a test can supply them.

pub mod collaborators;
pub mod handler;
pub mod menu;
pub mod settings;
pub mod types;

pub use collaborators::*;
pub use handler::{Collaborators, TriggerHandler};
pub use menu::{menu_entries, MenuRegistrar};
pub use settings::{current_settings, ensure_settings};
pub use types::*;
