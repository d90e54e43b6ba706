//! Structured logging for the chem light controller and CLI.
//!
//! Two output modes, both on stderr so stdout stays reserved for rendered
//! geomessages:
//! - human-readable console lines for interactive use
//! - JSONL for log shippers and agents
//!
//! # Usage
//!
//! ```no_run
//! use cl_core::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//! tracing::info!(target: cl_core::logging::event_names::CONFIG_LOADED, "ready");
//! ```
//!
//! The controller never returns errors from its send operations, so the log
//! stream is the only place failed sends become visible. Failed sends are
//! emitted at ERROR under the `chemlight.send` / `chemlight.remove` targets,
//! with the error's `code` and `category` as fields.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Event targets used across the crate.
pub mod event_names {
    pub const SEND: &str = "chemlight.send";
    pub const REMOVE: &str = "chemlight.remove";
    pub const CONFIG_LOADED: &str = "chemlight.config";
    pub const CONFIG_ERROR: &str = "chemlight.config.error";
}

/// Filter directives for a level: our crates and event targets only, so
/// dependency chatter stays out of the stream.
pub fn filter_directives(level: LogLevel) -> String {
    format!(
        "cl_core={0},cl_geomessage={0},chemlight={0}",
        level
    )
}

/// Install the global subscriber.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::new(filter_directives(config.level));

    match config.format {
        LogFormat::Human => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(std::io::stderr().is_terminal());

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
                    .is_ok()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
                    .is_ok()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
    }
}
