//! Tracing/logging (shared setup).

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};

/// Initialize process-wide logging with defaults (JSON, `warn`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(&LogConfig::default());
}

/// Initialize process-wide logging with an explicit configuration.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init_with(config: &LogConfig) {
    self::tracing::init(config);
}
