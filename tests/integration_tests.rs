// Integration tests: widget HTTP endpoints fed by a real poll

mod common;

use axum_test::TestServer;
use common::{Reply, StubEndpoint, full_payload, test_settings};
use homeserver_status::models::{PresentationState, WidgetView};
use homeserver_status::poller::StatusPoller;
use homeserver_status::routes;
use homeserver_status::surface::{StatusSurface, WidgetSurface};
use std::sync::Arc;

fn test_surface() -> Arc<WidgetSurface> {
    Arc::new(WidgetSurface::new(10))
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = TestServer::new(routes::app(test_surface())).unwrap();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("homeserver-status: ok");
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = TestServer::new(routes::app(test_surface())).unwrap();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("homeserver-status")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_widget_endpoint_before_first_poll() {
    let server = TestServer::new(routes::app(test_surface())).unwrap();
    let response = server.get("/api/widget").await;
    response.assert_status_ok();
    let view: WidgetView = response.json();
    assert_eq!(view, WidgetView::default());
}

#[tokio::test]
async fn test_widget_endpoint_reflects_polls() {
    let stub = StubEndpoint::new(Reply::Json(full_payload()));
    let surface = test_surface();
    let widget: Arc<dyn StatusSurface> = surface.clone();
    let poller = StatusPoller::new(widget, test_settings(stub.serve().await))
        .unwrap()
        .unwrap();
    let server = TestServer::new(routes::app(surface)).unwrap();

    poller.poll_once().await;
    let view: WidgetView = server.get("/api/widget").await.json();
    assert_eq!(view.state, PresentationState::Online);
    assert_eq!(view.cpu, "12.3%");
    assert_eq!(view.badge.map(|b| b.label).as_deref(), Some("LIVE"));

    stub.set(Reply::Status(500));
    poller.poll_once().await;
    let json: serde_json::Value = server.get("/api/widget").await.json();
    assert_eq!(json["state"], "offline");
    assert_eq!(json["badge"]["label"], "OFFLINE");
    assert_eq!(json["cpu"], "—");
    assert_eq!(json["lastUpdated"], "Server offline");
    assert_eq!(json["footerOffline"], true);
}

// --- WebSocket tests (require http_transport + ws feature) ---
// Receive until we get a valid view (server may send Ping first).

async fn receive_view(ws: &mut axum_test::TestWebSocket) -> WidgetView {
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        let text = ws.receive_text().await;
        if let Ok(view) = serde_json::from_str::<WidgetView>(&text) {
            return view;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for a widget view"
        );
    }
}

#[tokio::test]
async fn test_ws_widget_sends_current_view_then_updates() {
    let stub = StubEndpoint::new(Reply::Json(full_payload()));
    let surface = test_surface();
    let widget: Arc<dyn StatusSurface> = surface.clone();
    let poller = StatusPoller::new(widget, test_settings(stub.serve().await))
        .unwrap()
        .unwrap();
    let server = TestServer::builder()
        .http_transport()
        .build(routes::app(surface.clone()))
        .unwrap();

    let mut ws = server
        .get_websocket("/ws/widget")
        .await
        .into_websocket()
        .await;
    let first = receive_view(&mut ws).await;
    assert_eq!(first, surface.view());
    assert!(first.badge.is_none());

    poller.poll_once().await;
    let second = receive_view(&mut ws).await;
    assert_eq!(second.state, PresentationState::Online);
    assert_eq!(second.cpu, "12.3%");
    assert_eq!(second, surface.view());
}
