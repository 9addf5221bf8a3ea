//! PageSend relay: the HTTP surface the extension's background script
//! calls to run the trigger pipeline, and the CLI built on the same parts.

pub mod cli;
pub mod opener;
pub mod relay;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
