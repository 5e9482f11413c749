//! Host startup — turns the process environment into a [`PluginLogger`].
//!
//! This is the only place that reads environment variables:
//!
//! | Variable | `"1"` means |
//! |---|---|
//! | `ENABLE_PLUGIN_REQUEST_LOGGING` | request logging (implies debug) |
//! | `DEBUG_CODEX_PLUGIN` | debug logging |
//!
//! Any other value, or an unset variable, leaves the flag off.

use std::path::PathBuf;

use plugin_log_core::{LogMode, LoggerConfig, PluginLogger};

pub const REQUEST_LOGGING_VAR: &str = "ENABLE_PLUGIN_REQUEST_LOGGING";
pub const DEBUG_VAR: &str = "DEBUG_CODEX_PLUGIN";

/// Read the mode from the process environment.
pub fn mode_from_env() -> LogMode {
    mode_from_lookup(|key| std::env::var(key).ok())
}

/// Read the mode through `lookup`, so tests need not touch the real
/// environment.
pub fn mode_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LogMode {
    let flag = |key: &str| lookup(key).as_deref() == Some("1");
    LogMode::new(flag(REQUEST_LOGGING_VAR), flag(DEBUG_VAR))
}

/// Load the logger config for this process: built-in defaults, then
/// `config.toml` if present, then the environment-derived mode.
pub fn load_config() -> anyhow::Result<LoggerConfig> {
    let config = LoggerConfig::load(&home_dir(), Some(&config_path()), mode_from_env())?;
    Ok(config)
}

/// [`load_config`], falling back to the default log directory when the
/// config file cannot be read or parsed.
pub fn load_config_or_defaults() -> LoggerConfig {
    load_config().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring unreadable plugin-log config");
        LoggerConfig::new(mode_from_env(), plugin_log_core::config::default_log_dir(&home_dir()))
    })
}

/// Build the process logger. A broken config file falls back to defaults
/// rather than disabling logging.
pub fn init() -> PluginLogger {
    PluginLogger::new(load_config_or_defaults())
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("plugin-log")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[rstest]
    #[case::unset(&[], LogMode::QUIET)]
    #[case::debug_only(&[(DEBUG_VAR, "1")], LogMode::debug())]
    #[case::request_only(&[(REQUEST_LOGGING_VAR, "1")], LogMode::request_logging())]
    #[case::both(&[(REQUEST_LOGGING_VAR, "1"), (DEBUG_VAR, "1")], LogMode::request_logging())]
    #[case::not_one(&[(REQUEST_LOGGING_VAR, "true"), (DEBUG_VAR, "0")], LogMode::QUIET)]
    fn mode_table(#[case] vars: &[(&str, &str)], #[case] expected: LogMode) {
        assert_eq!(mode_from_lookup(lookup(vars)), expected);
    }

    #[test]
    fn config_path_ends_with_app_dir() {
        assert!(config_path().ends_with("plugin-log/config.toml"));
    }
}
