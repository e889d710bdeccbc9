//! Tracing and logging setup shared by estatebooks binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat, ParseLogFormatError};

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init(&LogConfig::from_env());
}

/// Initialize process-wide logging with explicit settings.
pub fn init_with(config: &LogConfig) {
    self::tracing::init(config);
}
