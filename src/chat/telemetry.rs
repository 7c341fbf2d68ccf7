//! Tracing setup helper for embedders.

/// Initialize tracing for manual runs and embedding frontends.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}
