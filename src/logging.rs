// ===========================================================================
// logging - Diagnostic Output
// ===========================================================================

use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is not set
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "firesave=warn",
        1 => "firesave=debug",
        _ => "firesave=trace",
    }
}

/// Install the stderr subscriber. RUST_LOG overrides the verbosity flag.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .with_writer(io::stderr);

    // Ignore a second init (tests may have installed one)
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
