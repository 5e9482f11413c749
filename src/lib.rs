//! plugin-log — diagnostic logging for a host plugin process.
//!
//! The logger itself lives in [`plugin_log_core`] and is re-exported here.
//! This crate adds the host side: [`startup`] reads the environment and the
//! optional config file, and the `plugin-log` binary exposes the two write
//! paths to shell scripts.
//!
//! ```no_run
//! use plugin_log::{startup, Fields, Payload};
//!
//! let logger = startup::init();
//! logger.debug("transforming request", None);
//! logger.log_request(
//!     "before-transform",
//!     Fields::new().with("model", "gpt-5").with("stream", true),
//! );
//! logger.warn("falling back", Some(&Payload::from("no cache")));
//! ```

pub mod startup;

pub use plugin_log_core::*;
