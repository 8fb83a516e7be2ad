//! Tracing subscriber construction.
//!
//! The subscriber is built here and installed once by `main`. Tests can
//! scope one to a closure with `tracing::subscriber::with_default` instead of
//! touching global state.

use tracing::Subscriber;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Build the fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` is used, falling
/// back to `info` if it does not parse.
pub fn subscriber(default_filter: &str) -> impl Subscriber + Send + Sync + use<> {
    tfmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339())
        .finish()
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
