use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use serde_json::{json, Value};

use crate::utils::{iso_timestamp, SERVICE_NAME};

/// Append-only JSONL event log: one JSON object per line, every event stamped
/// with `type`, `timestamp` and `service`. Logging failures are warned and
/// swallowed — observability must never break a fill.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: PathBuf) -> Self {
        EventLog { path }
    }

    pub fn append(&self, event_type: &str, payload: Value) {
        let mut event = match payload {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("payload".into(), other);
                map
            }
        };
        event.insert("type".into(), json!(event_type));
        event.insert("timestamp".into(), json!(iso_timestamp()));
        event.insert("service".into(), json!(SERVICE_NAME));

        if let Err(e) = self.write_line(&Value::Object(event)) {
            warn!("could not append event {} to {:?}: {}", event_type, self.path, e);
        }
    }

    fn write_line(&self, event: &Value) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(event)?)?;
        Ok(())
    }
}
