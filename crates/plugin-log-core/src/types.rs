//! Record types shared by the writers.
//!
//! A [`LogRecord`] is never kept around: it is built, serialized to a single
//! JSON line and dropped.

use serde::Serialize;

/// Severity tag attached to every log line.
///
/// The four tags are fixed; there is no numeric threshold. Whether a tag is
/// written is decided by [`LogMode::allows`](crate::config::LogMode::allows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// One line of `plugin.log`.
///
/// Field order here is the key order on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord<'a> {
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub level: Level,
    pub message: &'a str,
    /// Normalized payload; absent when the caller supplied none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl<'a> LogRecord<'a> {
    pub fn new(level: Level, message: &'a str, data: Option<serde_json::Value>) -> Self {
        Self {
            timestamp: timestamp_now(),
            level,
            message,
            data,
        }
    }
}

/// Current time formatted like `2024-01-15T10:00:00.123Z`.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
