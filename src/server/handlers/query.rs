use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::dataset::DatasetKind;
use crate::server::extract::{ApiForm, ApiJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DatasetQueryBody {
    pub text: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl DatasetQueryBody {
    fn kind(&self) -> Result<DatasetKind, ApiError> {
        self.dataset.parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub query: String,
}

fn default_dataset() -> String {
    DatasetKind::default().to_string()
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    ApiForm(form): ApiForm<SubmitForm>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Received form query ({} chars)", form.query.len());
    let response = state.rag.analyze(&form.query).await?;
    Ok(Json(json!({ "message": response })))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<QueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.rag.analyze(&payload.text).await?;
    Ok(Json(json!({ "response": response })))
}

pub async fn compare(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<QueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.rag.compare(&payload.text).await?;
    Ok(Json(json!({ "response": response })))
}

pub async fn sustainability_insights(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<QueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .rag
        .insights(&payload.text, DatasetKind::Sustainability)
        .await?;
    Ok(Json(json!({ "response": response })))
}

pub async fn christmas_insights(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<QueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .rag
        .insights(&payload.text, DatasetKind::Christmas)
        .await?;
    Ok(Json(json!({ "response": response })))
}

pub async fn retrieve_entries(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<DatasetQueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = payload.kind()?;
    let entries = state
        .rag
        .retrieve_entries(&payload.text, kind, payload.top_n)
        .await?;
    Ok(Json(json!({ "top_entries": entries })))
}

pub async fn compare_demographics(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<QueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.rag.compare_demographics(&payload.text).await?;
    Ok(Json(json!({ "demographic_comparison": response })))
}

pub async fn custom_query(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<DatasetQueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = payload.kind()?;
    let response = state.rag.custom_query(&payload.text, kind).await?;
    Ok(Json(json!({ "custom_response": response })))
}

pub async fn sentiment_analysis(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<DatasetQueryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = payload.kind()?;
    let response = state.rag.sentiment_analysis(&payload.text, kind).await?;
    Ok(Json(json!({ "sentiment_analysis": response })))
}
