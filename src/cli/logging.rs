//! Tracing setup for the CLI
//!
//! Diagnostics go to stderr so they never mix with command output.
//!
//! Usage:
//!   listicles --verbose list               # debug events from listicles
//!   RUST_LOG=listicles=trace listicles show X   # includes skipped table rows

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber; `RUST_LOG` wins over `--verbose`
pub fn init(verbose: bool) {
    let default = if verbose { "listicles=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init();
}
