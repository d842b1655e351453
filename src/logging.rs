use tracing_subscriber::EnvFilter;

/// Initialise logging. With `debug` the default level is `debug` and
/// `RUST_LOG` may override it; otherwise the level is fixed at `info`.
/// Calling this twice is harmless.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
