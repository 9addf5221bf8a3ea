//! Settings and context-menu routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use pagesend_core::{normalize, Settings};
use pagesend_trigger::{ensure_settings, MenuEntry};
use tracing::{info, warn};

use super::{bad_request, ApiError};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/menus", get(get_menus))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(ensure_settings(state.settings.as_ref()).await)
}

/// Merge a partial update into the stored map, normalize, persist, and
/// re-register menus for the (possibly new) provider.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Settings>, ApiError> {
    let Some(updates) = body.as_object() else {
        return Err(bad_request("Settings update must be a JSON object"));
    };

    let mut settings = Settings::default();
    let saved = state.settings.update(|stored| {
        stored.extend(updates.clone());
        settings = normalize(stored).settings;
        stored.extend(settings.to_stored());
    });
    if let Err(e) = saved {
        warn!("Failed to save settings: {}", e);
    }
    info!(
        "Settings updated: provider={} openMode={}",
        settings.provider, settings.open_mode
    );

    if let Err(e) = state.menus.register(&settings).await {
        warn!("Failed to re-register context menus: {}", e);
    }

    Ok(Json(settings))
}

async fn get_menus(State(state): State<Arc<AppState>>) -> Json<Vec<MenuEntry>> {
    Json(state.menus.entries().await)
}
