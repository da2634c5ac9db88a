//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,edge_warm=debug,warm=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the verbosity flag.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A subscriber may already be installed (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "warn");
        assert!(default_filter(true).contains("edge_warm=debug"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
