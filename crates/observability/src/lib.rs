//! Process-wide tracing setup shared by every salesdesk host.

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LOG_FORMAT_VAR, LogFormat, ParseLogFormatError, init_with};
