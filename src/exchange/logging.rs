//! Tracing setup for binaries built on this crate.
//!
//! The filter comes from `EXCHANGE_LOG`, falling back to `RUST_LOG`, then to
//! `warn` (or `debug` with `--verbose`). Output goes to stderr so it never
//! mixes with command output.
//!
//! - `EXCHANGE_LOG=debug` - every overlay transition
//! - `EXCHANGE_LOG=exchange::overlay=trace` - history traversals as well

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_ENV: &str = "EXCHANGE_LOG";

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter(verbose));

    let _ = tracing_subscriber::registry().with(layer).try_init();
}
