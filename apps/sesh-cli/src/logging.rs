//! Logging initialization for the CLI.
//!
//! Logs go to stderr so stdout stays clean for command output. The default
//! level comes from the `-v`/`-vv` flags; `RUST_LOG` overrides it when set.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with stderr output.
///
/// Verbosity maps to a default filter: 0 is warn, 1 (`-v`) is debug, 2 or
/// more (`-vv`) is trace. An explicit `RUST_LOG` value takes precedence.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Map the `-v` flag count to a default filter directive.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
