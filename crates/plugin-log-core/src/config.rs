//! Logger configuration.
//!
//! [`LogMode`] is the gate: two booleans fixed when the logger is built.
//! [`LoggerConfig`] adds where records go. [`LoggerConfig::load`] layers an
//! optional TOML file over built-in defaults; [`LoggerConfig::defaults`]
//! returns the same defaults without touching the filesystem (useful in
//! tests). Nothing in this module reads environment variables; the host
//! decides the mode and hands it in.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::LogResult;
use crate::types::Level;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[logging]
file_name = "plugin.log"
"#;

/// Log directory relative to the user's home directory.
pub const LOG_DIR_SEGMENTS: [&str; 3] = [".opencode", "logs", "codex-plugin"];

// ---------------------------------------------------------------------------
// Mode / gate
// ---------------------------------------------------------------------------

/// Verbosity mode. `debug` is implied by `request_logging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogMode {
    request_logging: bool,
    debug: bool,
}

impl LogMode {
    /// Only `warn` and `error` records are written.
    pub const QUIET: LogMode = LogMode {
        request_logging: false,
        debug: false,
    };

    pub fn new(request_logging: bool, debug: bool) -> Self {
        Self {
            request_logging,
            debug: debug || request_logging,
        }
    }

    /// Debug records on, snapshots off.
    pub fn debug() -> Self {
        Self::new(false, true)
    }

    /// Everything on, including per-request snapshot files.
    pub fn request_logging() -> Self {
        Self::new(true, true)
    }

    pub fn request_logging_enabled(&self) -> bool {
        self.request_logging
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Whether the logger announces itself on construction.
    pub fn is_verbose(&self) -> bool {
        self.request_logging || self.debug
    }

    /// Gate decision for one log call.
    pub fn allows(&self, level: Level) -> bool {
        match level {
            Level::Debug => self.debug,
            Level::Info => self.request_logging || self.debug,
            Level::Warn | Level::Error => true,
        }
    }
}

// ---------------------------------------------------------------------------
// File config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct FileConfig {
    #[serde(default)]
    logging: LoggingSection,
}

/// `[logging]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Overrides the home-relative default directory. A leading `~/` is
    /// resolved against the home directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String { "plugin.log".to_string() }

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            log_dir: None,
            file_name: default_file_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger config
// ---------------------------------------------------------------------------

/// Everything a [`PluginLogger`](crate::writer::PluginLogger) needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub mode: LogMode,
    pub log_dir: PathBuf,
    /// Name of the line log inside `log_dir`.
    pub file_name: String,
}

impl LoggerConfig {
    pub fn new(mode: LogMode, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            log_dir: log_dir.into(),
            file_name: default_file_name(),
        }
    }

    /// Quiet mode, logging under `./.opencode/logs/codex-plugin`.
    pub fn defaults() -> Self {
        Self::new(LogMode::QUIET, default_log_dir(Path::new(".")))
    }

    /// Layer `config_file` (if it exists) over the built-in defaults.
    pub fn load(home: &Path, config_file: Option<&Path>, mode: LogMode) -> LogResult<Self> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));
        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let file: FileConfig = builder.build()?.try_deserialize()?;

        let log_dir = match file.logging.log_dir {
            Some(dir) => expand_home(home, &dir),
            None => default_log_dir(home),
        };

        Ok(Self {
            mode,
            log_dir,
            file_name: file.logging.file_name,
        })
    }

    pub fn with_mode(mut self, mode: LogMode) -> Self {
        self.mode = mode;
        self
    }

    /// Full path of the append-only line log.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.opencode/logs/codex-plugin`.
pub fn default_log_dir(home: &Path) -> PathBuf {
    LOG_DIR_SEGMENTS
        .iter()
        .fold(home.to_path_buf(), |dir, segment| dir.join(segment))
}

fn expand_home(home: &Path, dir: &Path) -> PathBuf {
    match dir.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => dir.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(LogMode::QUIET, [false, false, true, true])]
    #[case::debug(LogMode::debug(), [true, true, true, true])]
    #[case::request(LogMode::request_logging(), [true, true, true, true])]
    fn gate_table(#[case] mode: LogMode, #[case] expected: [bool; 4]) {
        let actual = [Level::Debug, Level::Info, Level::Warn, Level::Error].map(|l| mode.allows(l));
        assert_eq!(actual, expected);
    }

    #[test]
    fn request_logging_implies_debug() {
        let mode = LogMode::new(true, false);
        assert!(mode.debug_enabled());
        assert!(mode.request_logging_enabled());
    }

    #[test]
    fn debug_does_not_imply_request_logging() {
        let mode = LogMode::new(false, true);
        assert!(mode.debug_enabled());
        assert!(!mode.request_logging_enabled());
    }

    #[test]
    fn defaults_load() {
        let cfg = LoggerConfig::defaults();
        assert_eq!(cfg.mode, LogMode::QUIET);
        assert_eq!(cfg.file_name, "plugin.log");
        assert!(cfg.log_dir.ends_with(".opencode/logs/codex-plugin"));
    }

    #[test]
    fn load_without_file_uses_home_default() {
        let cfg = LoggerConfig::load(Path::new("/home/u"), None, LogMode::debug()).unwrap();
        assert_eq!(cfg.log_dir, PathBuf::from("/home/u/.opencode/logs/codex-plugin"));
        assert_eq!(cfg.log_file(), PathBuf::from("/home/u/.opencode/logs/codex-plugin/plugin.log"));
        assert_eq!(cfg.mode, LogMode::debug());
    }

    #[test]
    fn load_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let cfg = LoggerConfig::load(dir.path(), Some(&missing), LogMode::QUIET).unwrap();
        assert_eq!(cfg.file_name, "plugin.log");
    }

    #[test]
    fn load_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[logging]\nlog_dir = \"~/custom/logs\"\nfile_name = \"diag.log\"\n",
        )
        .unwrap();
        let cfg = LoggerConfig::load(Path::new("/home/u"), Some(&path), LogMode::QUIET).unwrap();
        assert_eq!(cfg.log_dir, PathBuf::from("/home/u/custom/logs"));
        assert_eq!(cfg.file_name, "diag.log");
    }
}
