// Status endpoint payload

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::PollError;

/// One parsed result of a successful poll.
///
/// Every metric is optional: `None` leaves its display untouched. A present but
/// non-numeric metric is kept as `Some(NaN)` so it renders as the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerStatusSnapshot {
    #[serde(default, deserialize_with = "lenient_number")]
    pub uptime: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cpu_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub ram_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub disk_percent: Option<f64>,
    /// Server-side ISO timestamp; informational only.
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    /// Server-reported status word (`"online"`); informational only.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl ServerStatusSnapshot {
    /// Parse a response body. The payload must be a JSON object; unknown fields are ignored.
    pub fn from_json(body: &[u8]) -> Result<Self, PollError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| PollError::Parse(e.to_string()))?;
        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(map))
                .map_err(|e| PollError::Parse(e.to_string())),
            other => Err(PollError::Parse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Overlay `newer` onto `self`: metrics present in `newer` win, absent ones are kept.
    pub fn merge_from(&mut self, newer: &ServerStatusSnapshot) {
        let pairs = [
            (&mut self.uptime, newer.uptime),
            (&mut self.cpu_percent, newer.cpu_percent),
            (&mut self.ram_percent, newer.ram_percent),
            (&mut self.disk_percent, newer.disk_percent),
        ];
        for (slot, value) in pairs {
            if value.is_some() {
                *slot = value;
            }
        }
        self.timestamp = newer.timestamp.clone();
        self.status = newer.status.clone();
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Some(_) => Some(f64::NAN),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
