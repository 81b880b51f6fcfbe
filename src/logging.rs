//! Tracing setup for the command-line binary.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// The verbosity count from the CLI picks the default level; a `RUST_LOG`
/// value takes precedence when set.
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // init() installs a process-global subscriber, so tests stick to the
    // level mapping.
    #[test]
    fn test_default_directive_mapping() {
        assert_eq!(default_directive(0), "info");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(2), "trace");
        assert_eq!(default_directive(7), "trace");
    }
}
