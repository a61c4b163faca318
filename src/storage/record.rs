//! Persisted timer record layout and lenient decoding

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::state::{Timer, TimerId};

/// One stored timer as it appears on disk. Optional fields fall back to defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimerRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    duration: u64,
    #[serde(default)]
    remaining_time: Option<u64>,
    #[serde(default)]
    is_running: Option<bool>,
    #[serde(default)]
    created_at: Option<i64>,
}

impl TimerRecord {
    fn into_timer(self) -> Option<Timer> {
        let remaining_time = self.remaining_time.unwrap_or(self.duration);
        Timer::restore(
            TimerId::from(self.id),
            self.title,
            self.description.unwrap_or_default(),
            self.duration,
            remaining_time,
            self.is_running.unwrap_or(false),
            self.created_at.unwrap_or(0),
        )
    }
}

/// Serialize the full collection as a JSON array
pub fn encode_timers(timers: &[Timer]) -> Result<String, serde_json::Error> {
    serde_json::to_string(timers)
}

/// Decode a stored collection.
///
/// Anything that is not a JSON array yields an empty collection. Individual
/// records that cannot be read are skipped, and only the first record for a
/// given id is kept.
pub fn decode_timers(raw: &str) -> Vec<Timer> {
    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(other) => {
            warn!("Stored timers are not an array (found {}), starting empty", json_kind(&other));
            return Vec::new();
        }
        Err(e) => {
            warn!("Stored timers are not valid JSON, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut timers = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let timer = match serde_json::from_value::<TimerRecord>(record) {
            Ok(record) => record.into_timer(),
            Err(e) => {
                warn!("Skipping unreadable timer record #{}: {}", index, e);
                continue;
            }
        };

        let Some(timer) = timer else {
            warn!("Skipping timer record #{} with zero duration", index);
            continue;
        };

        if !seen.insert(timer.id().clone()) {
            warn!("Skipping duplicate timer id {}", timer.id());
            continue;
        }
        timers.push(timer);
    }

    timers
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
