use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{config, datasets, health, query};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// Query routes keep their trailing slash so existing clients keep working.
/// The insight routes answer both GET and POST, since older clients send a
/// JSON body with GET.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state);
    Router::new()
        .route("/health", get(health::health))
        .route("/api/status", get(health::get_status))
        .route("/api/config", get(config::get_config))
        .route("/submit/", post(query::submit))
        .route("/analyze/", post(query::analyze))
        .route("/compare/", post(query::compare))
        .route(
            "/sustainability_insights/",
            get(query::sustainability_insights).post(query::sustainability_insights),
        )
        .route(
            "/christmas_insights/",
            get(query::christmas_insights).post(query::christmas_insights),
        )
        .route("/get_dataset_stats/", get(datasets::dataset_stats))
        .route("/retrieve_entries/", post(query::retrieve_entries))
        .route("/compare_demographics/", post(query::compare_demographics))
        .route("/related_topics/", get(datasets::related_topics))
        .route("/custom_query/", post(query::custom_query))
        .route("/sentiment_analysis/", post(query::sentiment_analysis))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let configured = &state.settings.server.cors_allowed_origins;
    let origins = if configured.is_empty() {
        default_local_origins()
    } else {
        configured.clone()
    };

    let allow_origin = AllowOrigin::list(
        origins
            .into_iter()
            .filter_map(|origin| HeaderValue::from_str(&origin).ok())
            .collect::<Vec<_>>(),
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://localhost:8000".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
        "http://127.0.0.1:8000".to_string(),
    ]
}
