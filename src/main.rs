use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plugin_log::{startup, Fields, Level, Payload, PluginLogger};

#[derive(Parser)]
#[command(name = "plugin-log", about = "Write plugin diagnostic records and request snapshots")]
struct Cli {
    /// Log directory (overrides the config file and the home-relative default).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Print plugin-log's own tracing diagnostics to stderr.
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append one record to plugin.log (subject to the level gate).
    Log {
        level: Level,
        message: String,
        /// JSON payload; anything that is not valid JSON is logged as text.
        #[arg(long)]
        data: Option<String>,
    },
    /// Write a request snapshot (request-logging mode only).
    Snapshot {
        stage: String,
        /// `name=<json>`; repeatable. Non-JSON values are stored as text.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))
}

fn parse_payload(raw: &str) -> Payload {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Payload::from)
        .unwrap_or_else(|_| Payload::from(raw))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let mut config = startup::load_config_or_defaults();
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }
    tracing::debug!(log_dir = %config.log_dir.display(), mode = ?config.mode, "logger configured");
    let logger = PluginLogger::new(config);

    match cli.command {
        Command::Log {
            level,
            message,
            data,
        } => {
            let payload = data.as_deref().map(parse_payload);
            logger.log(level, &message, payload.as_ref());
        }
        Command::Snapshot { stage, fields } => {
            let fields: Fields = fields
                .iter()
                .map(|(name, value)| (name.as_str(), parse_payload(value)))
                .collect();
            logger.log_request(&stage, fields);
        }
    }

    Ok(())
}
