// Shared test helpers: a local stand-in for the homeserver stats endpoint

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use homeserver_status::poller::PollerSettings;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub answers on the next request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Raw(&'static str),
    Slow(Duration, Value),
}

#[derive(Clone)]
pub struct StubEndpoint {
    reply: Arc<Mutex<Reply>>,
    hits: Arc<AtomicUsize>,
    last_accept: Arc<Mutex<Option<String>>>,
    last_user_agent: Arc<Mutex<Option<String>>>,
}

impl StubEndpoint {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply)),
            hits: Arc::new(AtomicUsize::new(0)),
            last_accept: Arc::new(Mutex::new(None)),
            last_user_agent: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_accept(&self) -> Option<String> {
        self.last_accept.lock().unwrap().clone()
    }

    pub fn last_user_agent(&self) -> Option<String> {
        self.last_user_agent.lock().unwrap().clone()
    }

    /// Serves the stub on an ephemeral localhost port; returns the endpoint URL.
    pub async fn serve(&self) -> String {
        let app = Router::new()
            .route("/api/homeserver", get(handler))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/homeserver")
    }
}

async fn handler(State(stub): State<StubEndpoint>, headers: HeaderMap) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    *stub.last_accept.lock().unwrap() = header_str(header::ACCEPT);
    *stub.last_user_agent.lock().unwrap() = header_str(header::USER_AGENT);

    let reply = stub.reply.lock().unwrap().clone();
    match reply {
        Reply::Json(v) => Json(v).into_response(),
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "status": "error", "error": "boom" })),
        )
            .into_response(),
        Reply::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Reply::Slow(delay, v) => {
            tokio::time::sleep(delay).await;
            Json(v).into_response()
        }
    }
}

/// The payload shape the real backend returns.
pub fn full_payload() -> Value {
    json!({
        "uptime": 3665,
        "current_uptime": 3665,
        "total_uptime": 3665,
        "downtime": 0.0,
        "cpu_percent": 12.34,
        "ram_percent": 50.0,
        "disk_percent": 9.99,
        "timestamp": "2026-10-17T10:00:00+00:00",
        "status": "online"
    })
}

/// Fast settings for tests: short interval and timeout.
pub fn test_settings(endpoint: String) -> PollerSettings {
    PollerSettings {
        endpoint,
        interval: Duration::from_millis(50),
        timeout: Duration::from_millis(300),
    }
}

/// URL of a localhost port with nothing listening.
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/homeserver")
}
