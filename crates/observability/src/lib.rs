//! Tracing and logging (shared setup).

/// Initialize process-wide logging in the given format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::LogFormat;
