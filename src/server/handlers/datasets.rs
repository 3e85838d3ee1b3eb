use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn dataset_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "dataset_stats": state.rag.dataset_stats() }))
}

pub async fn related_topics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "related_topics": state.rag.related_topics() }))
}
