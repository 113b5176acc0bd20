use std::io;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,storage=info";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize tracing subscriber with sensible defaults, writing to stderr
/// so stdout stays free for command output.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,storage=info`
pub fn init_logging_default() {
    init_logging_with(LogFormat::Compact, None);
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, same fallback filter as the compact format
pub fn init_logging_json() {
    init_logging_with(LogFormat::Json, None);
}

/// Initialize tracing with an explicit format and fallback filter.
///
/// `RUST_LOG` still takes precedence over `filter`. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_logging_with(format: LogFormat, filter: Option<&str>) {
    let env_filter = env_filter(filter.unwrap_or(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(env_filter).with_target(false).with_writer(io::stderr);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
