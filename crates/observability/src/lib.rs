//! Process-wide tracing/logging setup, shared by every binary that wires
//! the saga together.

pub mod tracing;

/// Initialize process-wide observability. Safe to call multiple times;
/// subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide observability with an explicit default filter
/// directive, used only when `RUST_LOG` isn't already set.
pub fn init_with_filter(default_filter: &str) {
    tracing::init_with_filter(default_filter);
}

