//! Tracing initialization for hosts that want Conform's default filter.

use tracing_subscriber::EnvFilter;

/// Initialize a global tracing subscriber honoring `CONFORM_LOG`
/// (falling back to `RUST_LOG`, then `warn`).
///
/// Returns quietly if a global subscriber is already set, so embedding
/// hosts keep their own.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("CONFORM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        // Second call finds a subscriber already installed and returns
        // quietly instead of panicking.
        init_tracing();
        init_tracing();
        tracing::debug!("subscriber installed");
    }
}
