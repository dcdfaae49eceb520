//! Structured logging bootstrap.
//!
//! The crate logs through `tracing` with a `singleton` field naming the type.
//! Libraries do not install subscribers on their own; binaries, demos and tests
//! call [`init_logging`] once.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a fmt subscriber filtered by `RUST_LOG`, or by `default_filter` when
/// `RUST_LOG` is unset. Returns `false` if a global subscriber already exists.
pub fn init_logging(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("singleton_lifecycle=debug");
        assert!(!init_logging("singleton_lifecycle=debug"));
    }
}
