//! Request snapshots — one pretty-printed JSON file per (request id, stage).
//!
//! Snapshots sit next to `plugin.log` and are only written in request-logging
//! mode. Each file holds `timestamp`, `requestId`, `stage`, then the caller's
//! fields in the order they were added.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::LogResult;
use crate::fs;
use crate::normalizer::Normalizer;
use crate::payload::{ErrorValue, MapRef, Payload};
use crate::types::{timestamp_now, Level};
use crate::writer::PluginLogger;

/// Named fields of one snapshot, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Fields(IndexMap<String, Payload>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Payload>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace; a replaced name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Payload>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Payload)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Payload>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Make a stage label safe to embed in a filename.
pub fn sanitize_stage(stage: &str) -> String {
    stage
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `request-<id>-<stage>.json` inside `log_dir`.
pub fn snapshot_path(log_dir: &Path, request_id: u64, stage: &str) -> PathBuf {
    let stage = sanitize_stage(stage);
    log_dir.join(format!("request-{request_id}-{stage}.json"))
}

/// Build the snapshot document. Caller fields overwrite injected keys in place.
pub fn snapshot_document(request_id: u64, stage: &str, fields: &Fields) -> Value {
    let mut doc = Map::new();
    doc.insert("timestamp".to_string(), Value::String(timestamp_now()));
    doc.insert("requestId".to_string(), Value::from(request_id));
    doc.insert("stage".to_string(), Value::String(stage.to_string()));

    let mut normalizer = Normalizer::new();
    for (name, value) in fields.iter() {
        doc.insert(name.to_string(), normalizer.normalize(value));
    }
    Value::Object(doc)
}

impl PluginLogger {
    /// Write a snapshot of one pipeline stage, in request-logging mode only.
    ///
    /// Success is noted with an `info` record; failure with an `error` record
    /// naming the file. Nothing is returned and nothing escapes.
    pub fn log_request(&self, stage: &str, fields: Fields) {
        if !self.config.mode.request_logging_enabled() {
            return;
        }

        let request_id = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let path = snapshot_path(&self.config.log_dir, request_id, stage);

        match self.try_log_request(&path, request_id, stage, &fields) {
            Ok(()) => {
                self.log(
                    Level::Info,
                    &format!("Logged {stage} to {}", path.display()),
                    None,
                );
            }
            Err(err) => {
                tracing::debug!(error = %err, path = %path.display(), "snapshot write failed");
                let data = MapRef::new();
                data.insert("error", ErrorValue::from_error(&err).with_name("LogError"));
                self.log(
                    Level::Error,
                    &format!("Failed to write request log {}", path.display()),
                    Some(&data.into()),
                );
            }
        }
    }

    fn try_log_request(
        &self,
        path: &Path,
        request_id: u64,
        stage: &str,
        fields: &Fields,
    ) -> LogResult<()> {
        fs::ensure_dir(&self.config.log_dir)?;
        let doc = snapshot_document(request_id, stage, fields);
        let pretty = serde_json::to_string_pretty(&doc)?;
        fs::write_file(path, &pretty)
    }
}
