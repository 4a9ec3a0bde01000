// GET handlers: version, api/widget

use axum::{extract::State, response::IntoResponse};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/widget — the widget exactly as last rendered by the poller.
pub(super) async fn widget_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.surface.view())
}
