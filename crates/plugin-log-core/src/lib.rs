//! plugin-log-core — best-effort diagnostic logging for a host plugin.
//!
//! The crate covers three jobs:
//!
//! - deciding whether a log call produces output ([`config::LogMode`])
//! - turning arbitrary values, cycles and errors included, into JSON
//!   ([`normalizer`])
//! - appending to files while swallowing every I/O failure ([`writer`],
//!   [`snapshot`])
//!
//! # Layout
//!
//! ```text
//! PluginLogger::log ──────────► gate ──► normalize ──► plugin.log
//! PluginLogger::log_request ──► gate ──► normalize ──► request-<id>-<stage>.json
//!                                                  └─► plugin.log (info / error)
//! ```
//!
//! Everything is synchronous. No environment variables are read here; the
//! host builds a [`LoggerConfig`] and owns the resulting [`PluginLogger`].

pub mod config;
pub mod error;
pub mod fs;
pub mod normalizer;
pub mod payload;
pub mod snapshot;
pub mod types;
pub mod writer;

pub use config::{LogMode, LoggerConfig};
pub use error::{LogError, LogResult};
pub use normalizer::{normalize, Normalizer, CIRCULAR_MARKER, MAX_DEPTH, MAX_DEPTH_MARKER};
pub use payload::{ErrorValue, ListRef, MapRef, Payload};
pub use snapshot::Fields;
pub use types::{Level, LogRecord};
pub use writer::PluginLogger;
