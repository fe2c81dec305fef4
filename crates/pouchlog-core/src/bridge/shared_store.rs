//! JSON-file shared store read by the widget process.
//!
//! Stands in for app-group key-value storage: a single JSON object holding
//! the projection keys (`todayCount`, `lastUpdated`, limit and label
//! fields) plus the inbound `pendingLogs` queue. Writes go through a temp
//! file and rename so another process never observes a torn file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::error::BridgeError;
use crate::storage::{data_dir, Settings};

pub const KEY_TODAY_COUNT: &str = "todayCount";
pub const KEY_LAST_UPDATED: &str = "lastUpdated";
pub const KEY_LIMIT_ENABLED: &str = "dailyLimitEnabled";
pub const KEY_LIMIT_VALUE: &str = "dailyLimitValue";
pub const KEY_UNIT_SINGULAR: &str = "unitLabelSingular";
pub const KEY_UNIT_PLURAL: &str = "unitLabelPlural";
pub const KEY_PENDING_LOGS: &str = "pendingLogs";

/// Handle on the shared widget store file.
#[derive(Debug, Clone)]
pub struct SharedStore {
    path: PathBuf,
}

impl SharedStore {
    /// Open the store at `~/.config/pouchlog/widget.json`.
    pub fn open_default() -> Result<Self, BridgeError> {
        let dir = data_dir().map_err(|e| BridgeError::ReadFailed {
            path: PathBuf::from("~/.config/pouchlog"),
            message: e.to_string(),
        })?;
        Ok(Self::at(dir.join("widget.json")))
    }

    /// Open the store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store object. A missing file is an empty object.
    pub fn read(&self) -> Result<Map<String, Value>, BridgeError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(BridgeError::ReadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => Ok(Map::new()),
        }
    }

    fn write(&self, map: &Map<String, Value>) -> Result<(), BridgeError> {
        let content = serde_json::to_string_pretty(&Value::Object(map.clone())).map_err(|e| {
            BridgeError::WriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| BridgeError::WriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    /// Push today's total into the store, preserving every other key.
    pub fn write_projection(&self, today_count: i64, now: DateTime<Utc>) -> Result<(), BridgeError> {
        let mut map = self.read()?;
        map.insert(KEY_TODAY_COUNT.into(), json!(today_count));
        map.insert(
            KEY_LAST_UPDATED.into(),
            json!(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        self.write(&map)
    }

    /// Mirror limit configuration and unit labels into the store.
    pub fn sync_settings(&self, settings: &Settings) -> Result<(), BridgeError> {
        let mut map = self.read()?;
        map.insert(KEY_LIMIT_ENABLED.into(), json!(settings.limit.enabled));
        map.insert(KEY_LIMIT_VALUE.into(), json!(settings.limit.daily_limit));
        map.insert(KEY_UNIT_SINGULAR.into(), json!(settings.units.singular));
        map.insert(KEY_UNIT_PLURAL.into(), json!(settings.units.plural));
        self.write(&map)
    }

    /// Append a raw value to the inbound queue.
    ///
    /// This is the write the external widget/shortcut process performs; it
    /// is exposed here so the CLI and tests can exercise the inbound path.
    pub fn queue_raw(&self, value: Value) -> Result<(), BridgeError> {
        let mut map = self.read()?;
        let queue = map
            .entry(KEY_PENDING_LOGS.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match queue {
            Value::Array(items) => items.push(value),
            other => *other = Value::Array(vec![value]),
        }
        self.write(&map)
    }

    /// Queue a well-formed pending log the way the widget does.
    pub fn queue_pending(&self, epoch_secs: f64, quantity: i64, source: &str) -> Result<(), BridgeError> {
        self.queue_raw(json!({
            "timestamp": epoch_secs,
            "quantity": quantity,
            "source": source,
        }))
    }

    /// The queued entries, without consuming them. Absent queue is empty.
    pub fn pending(&self) -> Result<Vec<Value>, BridgeError> {
        Ok(match self.read()?.remove(KEY_PENDING_LOGS) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }

    /// Atomically clear the inbound queue. No-op when already absent.
    pub fn clear_pending(&self) -> Result<(), BridgeError> {
        let mut map = self.read()?;
        if map.remove(KEY_PENDING_LOGS).is_none() {
            return Ok(());
        }
        self.write(&map)
    }

    /// Today's count as last projected, if any.
    pub fn today_count(&self) -> Result<Option<i64>, BridgeError> {
        Ok(self.read()?.get(KEY_TODAY_COUNT).and_then(Value::as_i64))
    }
}
