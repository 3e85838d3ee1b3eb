use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::dataset::DatasetKind;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);
    Json(json!({
        "status": "ok",
        "uptime_secs": uptime
    }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let llm = state.rag.llm();
    let reachable = llm.health_check().await.unwrap_or(false);
    if !reachable {
        tracing::warn!("LLM provider '{}' is not reachable", llm.name());
    }

    let datasets = DatasetKind::ALL
        .iter()
        .map(|kind| {
            let dataset = state.rag.datasets().get(*kind);
            (
                kind.to_string(),
                json!({
                    "rows": dataset.len(),
                    "dimension": dataset.dimension(),
                }),
            )
        })
        .collect::<serde_json::Map<_, _>>();

    Ok(Json(json!({
        "datasets": datasets,
        "llm": {
            "provider": llm.name(),
            "chat_model": state.settings.llm.chat_model,
            "embedding_model": state.settings.llm.embedding_model,
            "reachable": reachable
        },
        "top_k": state.rag.options().top_k
    })))
}
