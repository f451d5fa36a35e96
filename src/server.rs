//! HTTP binding for the presentation layer.
//!
//! Exposes an axum [`Router`] over a shared, immutable [`CompleteDataSet`]. Handlers hold no
//! state of their own: every request is answered from the dataset and its JSON body.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::execution::ExecutionEngine;
use crate::processing::{self, export_to_vec};
use crate::types::{CompleteDataSet, FilterOptions, FilterSpec};
use crate::view::{self, ViewModel, ViewRequest};

/// Download name used by the export endpoint.
pub const EXPORT_FILENAME: &str = "filtered_data.csv";

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<CompleteDataSet>,
    pub engine:  Arc<ExecutionEngine>,
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the dashboard API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health",         get(health))
        .route("/api/options",        get(options))
        .route("/api/filter/default", get(default_filter))
        .route("/api/view",           post(view_handler))
        .route("/api/export",         post(export_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "groups": state.dataset.groups().len(),
        "rows":   state.dataset.row_count(),
    }))
}

async fn options(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(processing::filter_options(&state.dataset))
}

async fn default_filter(State(state): State<AppState>) -> Json<FilterSpec> {
    Json(processing::default_filter(&state.dataset))
}

async fn view_handler(
    State(state): State<AppState>,
    Json(request): Json<ViewRequest>,
) -> Result<Json<ViewModel>, ServerError> {
    // The scan runs on the engine's rayon pool; keep it off the async workers.
    let model = tokio::task::spawn_blocking(move || {
        let rows = state.engine.filter_parallel(&state.dataset, &request.filter);
        view::render(&state.dataset, request.chart, &rows)
    })
    .await?;
    Ok(Json(model))
}

async fn export_handler(
    State(state): State<AppState>,
    Json(spec): Json<FilterSpec>,
) -> Result<Response, ServerError> {
    let rows = processing::filter(&state.dataset, &spec);
    let body = export_to_vec(rows)?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILENAME}\"");
    Ok(
        (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response(),
    )
}
