// Poll failure taxonomy

use std::time::Duration;
use thiserror::Error;

/// Why a single poll failed. Every variant degrades the widget the same way.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("unexpected HTTP status {0}")]
    Protocol(u16),
    #[error("invalid status payload: {0}")]
    Parse(String),
}

impl PollError {
    /// Short label for the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::Timeout(_) => "timeout",
            PollError::Protocol(_) => "protocol",
            PollError::Parse(_) => "parse",
        }
    }
}
