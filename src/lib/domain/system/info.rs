//! Canonical view of the backend's system counters.

use crate::domain::containers::models::record::GenericRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend field name and the canonical name it is published under.
const COUNTER_FIELDS: [(&str, &str); 5] = [
    ("Containers", "containers"),
    ("ContainersRunning", "containers_running"),
    ("ContainersPaused", "containers_paused"),
    ("ContainersStopped", "containers_stopped"),
    ("Images", "images"),
];
const VERSION_FIELD: (&str, &str) = ("ServerVersion", "server_version");

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SystemInfoSummary {
    pub containers: i64,
    pub containers_running: i64,
    pub containers_paused: i64,
    pub containers_stopped: i64,
    pub images: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Every other key the backend reported, copied verbatim.
    #[serde(flatten)]
    pub extra: GenericRecord,
}

impl SystemInfoSummary {
    fn empty() -> Self {
        Self {
            containers: 0,
            containers_running: 0,
            containers_paused: 0,
            containers_stopped: 0,
            images: 0,
            server_version: None,
            timestamp: Utc::now(),
            extra: GenericRecord::new(),
        }
    }

    fn counter_mut(&mut self, canonical: &str) -> Option<&mut i64> {
        match canonical {
            "containers" => Some(&mut self.containers),
            "containers_running" => Some(&mut self.containers_running),
            "containers_paused" => Some(&mut self.containers_paused),
            "containers_stopped" => Some(&mut self.containers_stopped),
            "images" => Some(&mut self.images),
            _ => None,
        }
    }
}

/// Never fails: a payload that is not a keyed record yields all-zero counters.
pub fn normalize_system_info(payload: Value) -> SystemInfoSummary {
    let mut summary = SystemInfoSummary::empty();
    let Value::Object(mut record) = payload else {
        return summary;
    };

    for (backend_name, canonical) in COUNTER_FIELDS {
        let value = record
            .get(backend_name)
            .or_else(|| record.get(canonical))
            .map(coerce_integer)
            .unwrap_or(0);
        if let Some(counter) = summary.counter_mut(canonical) {
            *counter = value;
        }
        record.remove(canonical);
    }

    let (backend_name, canonical) = VERSION_FIELD;
    summary.server_version = record
        .get(backend_name)
        .or_else(|| record.get(canonical))
        .and_then(Value::as_str)
        .map(str::to_string);
    record.remove(canonical);
    record.remove("timestamp");

    summary.extra = record;
    summary
}

/// Integers pass through, floats are truncated, numeric strings are parsed.
/// Anything else counts as 0.
fn coerce_integer(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().map(truncate))
            .unwrap_or(0),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(truncate))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn truncate(float: f64) -> i64 {
    if float.is_finite() { float.trunc() as i64 } else { 0 }
}
