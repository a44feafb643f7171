//! Logging setup for the spotctl binary
//!
//! Logs go to stderr so stdout stays clean for JSON output. The level is
//! controlled via `RUST_LOG`; without it only warnings are shown, or
//! everything from spotctl at debug level with `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "spotctl=debug,warn"
    } else {
        "spotctl=warn,warn"
    }
}

/// Initialize the logging system
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
