//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Logs go to stderr so
/// they never interleave with report output on stdout. Subsequent calls are
/// ignored.
pub fn init_tracing(default_level: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    });
}
