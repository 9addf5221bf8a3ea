//! Trigger routes: run the pipeline for a relayed trigger.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pagesend_payload::PageSnapshot;
use pagesend_trigger::{Preview, Trigger, TriggerOutcome};
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trigger", post(run_trigger))
        .route("/preview", post(preview_trigger))
}

/// Trigger fields plus the snapshot the content script extracted (absent
/// when extraction failed or was skipped).
#[derive(Debug, Deserialize)]
struct TriggerBody {
    #[serde(flatten)]
    trigger: Trigger,
    #[serde(default)]
    snapshot: Option<PageSnapshot>,
}

async fn run_trigger(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TriggerBody>,
) -> Json<TriggerOutcome> {
    let handler = state.trigger_handler(body.snapshot);
    Json(handler.handle(&body.trigger).await)
}

async fn preview_trigger(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TriggerBody>,
) -> Json<Preview> {
    let handler = state.trigger_handler(body.snapshot);
    Json(handler.preview(&body.trigger).await)
}
