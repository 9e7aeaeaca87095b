//! Tracing/logging initialization.
//!
//! Logs always go to stderr so they never interleave with interactive output
//! on stdout. `RUST_LOG` overrides the level derived from verbosity.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines.
    Text,
    /// JSON lines with timestamps.
    #[default]
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace.
    pub verbosity: u8,
}

impl LogConfig {
    pub fn level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Text => builder.compact().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        let mut config = LogConfig::default();
        assert_eq!(config.level(), LevelFilter::WARN);
        config.verbosity = 1;
        assert_eq!(config.level(), LevelFilter::INFO);
        config.verbosity = 2;
        assert_eq!(config.level(), LevelFilter::DEBUG);
        config.verbosity = 5;
        assert_eq!(config.level(), LevelFilter::TRACE);
    }

    #[test]
    fn init_twice_is_a_no_op() {
        init(&LogConfig {
            format: LogFormat::Text,
            verbosity: 0,
        });
        init(&LogConfig::default());
    }
}
