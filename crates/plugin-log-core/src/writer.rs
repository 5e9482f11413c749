//! Log writer — the line-oriented half of the logger.
//!
//! [`PluginLogger`] is owned by the host and passed to call sites. Every
//! public call returns `()`: a record is either appended to `plugin.log` or
//! silently dropped. The fallible path is [`PluginLogger::try_log`]; its
//! errors are reported through `tracing` and go no further.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{LogMode, LoggerConfig};
use crate::error::LogResult;
use crate::fs;
use crate::normalizer::normalize;
use crate::payload::{MapRef, Payload};
use crate::types::{Level, LogRecord};

/// Diagnostic logger context.
///
/// The mode is fixed at construction. The request counter only ever grows and
/// lives exactly as long as the logger.
#[derive(Debug)]
pub struct PluginLogger {
    pub(crate) config: LoggerConfig,
    pub(crate) request_counter: AtomicU64,
}

impl PluginLogger {
    /// Build a logger. When the mode is verbose, one `info` record announcing
    /// it is written immediately.
    pub fn new(config: LoggerConfig) -> Self {
        let logger = Self::silent(config);
        logger.announce();
        logger
    }

    /// Build a logger without the startup record.
    pub fn silent(config: LoggerConfig) -> Self {
        Self {
            config,
            request_counter: AtomicU64::new(0),
        }
    }

    fn announce(&self) {
        let mode = self.config.mode;
        if mode.request_logging_enabled() {
            let data = MapRef::new();
            data.insert("logDir", self.config.log_dir.display().to_string());
            self.log(Level::Info, "Request logging enabled", Some(&data.into()));
        } else if mode.debug_enabled() {
            self.log(Level::Info, "Debug logging enabled", None);
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn mode(&self) -> LogMode {
        self.config.mode
    }

    pub fn log_dir(&self) -> &Path {
        &self.config.log_dir
    }

    pub fn log_file(&self) -> PathBuf {
        self.config.log_file()
    }

    /// Number of snapshot ids handed out so far.
    pub fn requests_logged(&self) -> u64 {
        self.request_counter.load(Ordering::Relaxed)
    }

    /// Append one record to the line log if the gate lets `level` through.
    ///
    /// Never fails and never panics on I/O: errors are dropped after a
    /// `tracing` debug event.
    pub fn log(&self, level: Level, message: &str, payload: Option<&Payload>) {
        if !self.config.mode.allows(level) {
            tracing::trace!(%level, "log record rejected by gate");
            return;
        }
        if let Err(err) = self.try_log(level, message, payload) {
            tracing::debug!(error = %err, %level, "dropped log record");
        }
    }

    /// The fallible body of [`log`](Self::log), without the gate.
    pub fn try_log(&self, level: Level, message: &str, payload: Option<&Payload>) -> LogResult<()> {
        fs::ensure_dir(&self.config.log_dir)?;
        let record = LogRecord::new(level, message, payload.map(normalize));
        let line = serde_json::to_string(&record)?;
        fs::append_line(&self.config.log_file(), &line)
    }

    /// Debug record; skipped outright unless debug mode is on.
    pub fn debug(&self, message: &str, payload: Option<&Payload>) {
        if self.config.mode.debug_enabled() {
            self.log(Level::Debug, message, payload);
        }
    }

    pub fn info(&self, message: &str, payload: Option<&Payload>) {
        self.log(Level::Info, message, payload);
    }

    /// Warning record; always written.
    pub fn warn(&self, message: &str, payload: Option<&Payload>) {
        self.log(Level::Warn, message, payload);
    }

    pub fn error(&self, message: &str, payload: Option<&Payload>) {
        self.log(Level::Error, message, payload);
    }
}
