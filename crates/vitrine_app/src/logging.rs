//! Tracing setup for hosts

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a `fmt` subscriber filtered by `RUST_LOG`, or `info` when unset
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    init_tracing_with("info")
}

/// Like [`init_tracing`] with a different fallback filter
pub fn init_tracing_with(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}
