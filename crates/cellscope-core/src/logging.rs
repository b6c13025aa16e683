#![forbid(unsafe_code)]

//! Logging shim over `tracing`.
//!
//! With the `tracing` feature enabled this module re-exports the `tracing`
//! event macros. Without it, no-op substitutes with the same names are
//! exported at the crate root, so call sites stay unconditional and compile
//! away entirely.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

/// Install a JSON-formatted subscriber filtered by `RUST_LOG`.
///
/// Intended for production hosts; tests and embedders that want their own
/// subscriber should not call this.
#[cfg(feature = "tracing-json")]
pub fn init_json() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[cfg(not(feature = "tracing"))]
mod noop {
    /// No-op stand-in for `tracing::trace!`.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {{}};
    }

    /// No-op stand-in for `tracing::debug!`.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {{}};
    }

    /// No-op stand-in for `tracing::info!`.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {{}};
    }

    /// No-op stand-in for `tracing::warn!`.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {{}};
    }

    /// No-op stand-in for `tracing::error!`.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {{}};
    }
}
