// HTTP client for the homeserver stats endpoint

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::instrument;

use crate::error::PollError;
use crate::models::ServerStatusSnapshot;
use crate::version;

/// Issues bounded-timeout GETs against one fixed status URL.
pub struct StatusClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl StatusClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(version::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("http client: {}", e))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET + parse. The whole exchange, body included, is bounded by the timeout.
    #[instrument(skip(self), fields(endpoint = %self.endpoint, operation = "fetch_status"))]
    pub async fn fetch(&self) -> Result<ServerStatusSnapshot, PollError> {
        // reqwest enforces the timeout per request; the outer bound also covers body parsing.
        match tokio::time::timeout(self.timeout, self.fetch_inner()).await {
            Ok(result) => result,
            Err(_) => Err(PollError::Timeout(self.timeout)),
        }
    }

    async fn fetch_inner(&self) -> Result<ServerStatusSnapshot, PollError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Protocol(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        ServerStatusSnapshot::from_json(&body)
    }

    fn classify(&self, e: reqwest::Error) -> PollError {
        if e.is_timeout() {
            PollError::Timeout(self.timeout)
        } else {
            PollError::Transport(e.to_string())
        }
    }
}
