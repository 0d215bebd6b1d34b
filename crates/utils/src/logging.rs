use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. Output goes to stderr so machine-readable
/// stdout stays clean. `RUST_LOG` wins over `verbosity` when set.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    tracing::debug!(level = default_level, "logging initialised");
}
