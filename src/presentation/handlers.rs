// HTTP request handlers
use crate::domain::dashboard::ViewState;
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_dashboard;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ViewQuery {
    pub mode: Option<String>,
    pub tab: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard page. The view state comes from the query string only.
pub async fn dashboard_page(
    Query(query): Query<ViewQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let view = ViewState::from_params(query.mode.as_deref(), query.tab.as_deref());
    let snapshot = state.page_service.snapshot().await;

    let status = if snapshot.has_data {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Html(render_dashboard(&snapshot, view, &state.title)))
}

/// The generated page data as JSON
pub async fn dashboard_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.page_service.snapshot().await;
    let status = if snapshot.has_data {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json((*snapshot.data).clone()))
}
