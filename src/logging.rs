// src/logging.rs
use tracing_subscriber::EnvFilter;

/// Set up the fmt subscriber at `debug` or `info`.
pub fn init(debug: bool) {
    // A stray `RUST_LOG` in the user's environment must not turn on verbose
    // output unless debug logging was asked for.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
