use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber, writing to stderr so stdout stays
/// free for rendered frames.
///
/// `RUST_LOG` is only honored when `debug` is set; otherwise the level is
/// pinned to `info`. Safe to call more than once.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
