// HTTP + WebSocket routes serving the widget view

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::surface::WidgetSurface;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) surface: Arc<WidgetSurface>,
}

pub fn app(surface: Arc<WidgetSurface>) -> Router {
    let state = AppState { surface };
    Router::new()
        .route("/", get(|| async { "homeserver-status: ok" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/widget", get(http::widget_handler)) // GET /api/widget
        .route("/ws/widget", get(ws::ws_widget)) // WS /ws/widget
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
