//! Payload selection: decides what text a trigger sends to an AI chat
//! provider, and encodes it into the provider's URL.
//!
//! Everything here is pure and synchronous: a page snapshot, the tab's own
//! metadata, and the requested action go in; a payload (or nothing) comes out.

pub mod action;
pub mod language;
pub mod provider;
pub mod selector;
pub mod snapshot;

pub use action::{ActionKind, ActionRequest};
pub use language::TargetLanguage;
pub use provider::{ProviderRegistry, ProviderTarget};
pub use selector::select_payload;
pub use snapshot::{PageSignals, PageSnapshot, TabInfo, LONG_PAGE_THRESHOLD, MAX_QUERY_LENGTH};
