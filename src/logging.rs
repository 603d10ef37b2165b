use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Without `debug` the level is pinned to
/// `info` so a stray `RUST_LOG` cannot turn on verbose output; with `debug`
/// `RUST_LOG` may override the level.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        // RUST_LOG is ignored here so an inherited env var cannot flood the UI log.
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
