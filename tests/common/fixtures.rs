//! Temporary log directories, loggers built on them, and payload graphs with
//! awkward shapes.

use plugin_log::{ErrorValue, ListRef, LogMode, LoggerConfig, MapRef, Payload, PluginLogger};
use std::path::{Path, PathBuf};

/// A logger writing under its own temporary directory. The directory is
/// removed when the fixture is dropped.
pub struct LogFixture {
    pub tmp: tempfile::TempDir,
    pub logger: PluginLogger,
}

impl LogFixture {
    /// Logger without the startup record, so line counts start at zero.
    pub fn quiet_start(mode: LogMode) -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let config = LoggerConfig::new(mode, tmp.path().join("logs"));
        Self {
            logger: PluginLogger::silent(config),
            tmp,
        }
    }

    /// Logger built the normal way, startup record included.
    pub fn announced(mode: LogMode) -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let config = LoggerConfig::new(mode, tmp.path().join("logs"));
        Self {
            logger: PluginLogger::new(config),
            tmp,
        }
    }

    pub fn log_dir(&self) -> &Path {
        self.logger.log_dir()
    }

    pub fn snapshot(&self, id: u64, stage: &str) -> PathBuf {
        self.log_dir().join(format!("request-{id}-{stage}.json"))
    }

    /// Every record in `plugin.log`, parsed. Missing file means no records.
    pub fn records(&self) -> Vec<serde_json::Value> {
        read_records(&self.logger.log_file())
    }
}

pub fn read_records(path: &Path) -> Vec<serde_json::Value> {
    match std::fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is one JSON record"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("snapshot exists");
    serde_json::from_str(&text).expect("snapshot is valid JSON")
}

/// `{ name, children: [ {name, parent: <root>} ] }` — a parent/child cycle.
pub fn parent_child_cycle() -> MapRef {
    let root = MapRef::new();
    root.insert("name", "root");
    let child = MapRef::new();
    child.insert("name", "child");
    child.insert("parent", root.clone());
    let children = ListRef::new();
    children.push(child);
    root.insert("children", children);
    root
}

/// An error whose cause is a structured value rather than text.
pub fn error_with_structured_cause() -> ErrorValue {
    let cause = MapRef::new();
    cause.insert("status", 429);
    cause.insert("retryAfter", Payload::from(vec![Payload::from(1), Payload::from(2.5)]));
    ErrorValue::new("RateLimitError", "too many requests").with_cause(cause)
}

/// `levels` single-element lists wrapped around a text leaf.
pub fn nested_lists(levels: usize) -> Payload {
    let mut payload = Payload::from("leaf");
    for _ in 0..levels {
        payload = Payload::from(vec![payload]);
    }
    payload
}
