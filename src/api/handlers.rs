use std::sync::Arc;
use axum::{extract::State, http::{StatusCode, header}, Json, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, trace};
use crate::AppState;
use crate::models::photo::SessionView;
use crate::scroll::ScrollPosition;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let v = env!("CARGO_PKG_VERSION");
    Json(serde_json::json!({
        "status": "ok",
        "version": v,
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Deserialize)]
pub struct SearchBody {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchAccepted {
    pub accepted: bool,
    pub generation: u64,
}

/// Starts a new search. The first page is fetched in the background; clients
/// poll `/session` for results.
pub async fn search(State(state): State<Arc<AppState>>, Json(body): Json<SearchBody>) -> impl IntoResponse {
    let reply = match state.controller.spawn_search(&body.q) {
        Ok(generation) => {
            info!(q = %body.q, generation, "search requested");
            SearchAccepted { accepted: true, generation }
        }
        Err(_) => SearchAccepted { accepted: false, generation: state.controller.snapshot().generation },
    };
    (StatusCode::ACCEPTED, Json(reply))
}

pub async fn scroll(State(state): State<Arc<AppState>>, Json(pos): Json<ScrollPosition>) -> impl IntoResponse {
    match state.scroll_tx.try_send(pos) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(TrySendError::Full(_)) => {
            trace!("scroll backlog full, sample dropped");
            StatusCode::ACCEPTED
        }
        Err(TrySendError::Closed(_)) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(SessionView::from(state.controller.snapshot()))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let text = state.stats.metrics_text();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text)
}
