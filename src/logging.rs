//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`, leaving stdout to command
//! output. `RUST_LOG` takes precedence over the configured default level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter: `RUST_LOG` if set and valid, else `default_level`, else `warn`
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber
///
/// Does nothing if a subscriber is already installed.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_used_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_none() {
            let filter = env_filter("debug");
            assert_eq!(filter.to_string(), "debug");
        }
    }
}
