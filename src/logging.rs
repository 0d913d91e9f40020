//! Tracing subscriber setup for the CLI.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` for this
/// crate and `warn` for everything else. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default = if verbose { "lgtm=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
