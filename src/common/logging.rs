//! Logging and tracing configuration
//!
//! Diagnostics go to stderr so that the report on stdout stays clean and
//! can be piped or diffed.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable. Without it
/// the level for this crate is WARN, raised to DEBUG or TRACE by
/// `verbosity` (the number of `-d` flags given), and WARN for dependencies.
pub fn init_cli(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "apitest=warn,warn",
        1 => "apitest=debug,warn",
        _ => "apitest=trace,info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0), "apitest=warn,warn");
        assert_eq!(default_directive(1), "apitest=debug,warn");
        assert_eq!(default_directive(5), "apitest=trace,info");
    }
}
