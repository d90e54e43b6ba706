//! Logging configuration.
//!
//! Sources, lowest precedence first:
//! - `RUST_LOG` (coarse level only)
//! - `CHEMLIGHT_LOG` / `CHEMLIGHT_LOG_FORMAT`
//! - CLI flags (`--log-level`, `--log-format`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level override variable.
pub const LOG_LEVEL_ENV: &str = "CHEMLIGHT_LOG";
/// Format override variable.
pub const LOG_FORMAT_ENV: &str = "CHEMLIGHT_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console lines (default).
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Minimum level to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        };
        f.write_str(s)
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Include timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Create config from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Create config from a variable lookup and CLI overrides.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(level) = lookup(LOG_LEVEL_ENV).and_then(|v| v.parse().ok()) {
            config.level = level;
        } else if let Some(val) = lookup("RUST_LOG") {
            // Coarse: the most verbose level named anywhere wins.
            for (needle, level) in [
                ("trace", LogLevel::Trace),
                ("debug", LogLevel::Debug),
                ("warn", LogLevel::Warn),
                ("error", LogLevel::Error),
            ] {
                if val.contains(needle) {
                    config.level = level;
                    break;
                }
            }
        }

        if let Some(format) = lookup(LOG_FORMAT_ENV).and_then(|v| v.parse().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}
