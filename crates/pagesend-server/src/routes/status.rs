//! Health and provider listing.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/providers", get(list_providers))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ProviderInfo {
    id: &'static str,
    name: &'static str,
    #[serde(rename = "baseUrl")]
    base_url: String,
    default: bool,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_providers(State(state): State<Arc<AppState>>) -> Json<Vec<ProviderInfo>> {
    let default = state.registry.default_target().provider;
    let providers = state
        .registry
        .targets()
        .into_iter()
        .map(|target| ProviderInfo {
            id: target.provider.name(),
            name: target.provider.display_name(),
            base_url: target.base_url.clone(),
            default: target.provider == default,
        })
        .collect();
    Json(providers)
}
