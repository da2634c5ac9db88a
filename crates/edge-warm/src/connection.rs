//! Queue connection resolution for warm jobs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigProvider, SYNC_CONNECTION};

/// The queue connection a warm job is submitted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConnection(String);

impl ResolvedConnection {
    /// Create a connection from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Connection name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this connection runs jobs immediately in-process.
    ///
    /// Queueing onto it is the same as not queueing at all.
    pub fn is_sync(&self) -> bool {
        self.0 == SYNC_CONNECTION
    }
}

impl fmt::Display for ResolvedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResolvedConnection {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Resolve the connection for warm jobs.
///
/// An explicitly configured warm connection wins over the default queue
/// connection. Blank names count as unset.
pub fn resolve(configured: Option<&str>, default: &str) -> ResolvedConnection {
    match configured.map(str::trim) {
        Some(name) if !name.is_empty() => ResolvedConnection::new(name),
        _ => ResolvedConnection::new(default.trim()),
    }
}

/// Resolves warm job connections from a config provider.
pub struct ConnectionResolver<'a> {
    config: &'a dyn ConfigProvider,
}

impl<'a> ConnectionResolver<'a> {
    /// Create a resolver over a config provider.
    pub fn new(config: &'a dyn ConfigProvider) -> Self {
        Self { config }
    }

    /// Resolve the connection for this invocation.
    pub fn resolve(&self) -> ResolvedConnection {
        resolve(
            self.config.static_caching().queue_connection.as_deref(),
            self.config.default_queue_connection(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StaticCachingConfig, WarmConfig};

    #[test]
    fn test_explicit_connection_wins() {
        assert_eq!(resolve(Some("sqs"), "redis").as_str(), "sqs");
    }

    #[test]
    fn test_falls_back_to_default() {
        assert_eq!(resolve(None, "redis").as_str(), "redis");
    }

    #[test]
    fn test_blank_explicit_connection_is_unset() {
        assert_eq!(resolve(Some("  "), "redis").as_str(), "redis");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        assert_eq!(resolve(Some("sqs"), "redis"), resolve(Some("sqs"), "redis"));
    }

    #[test]
    fn test_sync_detection() {
        assert!(resolve(None, "sync").is_sync());
        assert!(!resolve(None, "redis").is_sync());
        assert!(!resolve(Some("database"), "sync").is_sync());
    }

    #[test]
    fn test_resolver_reads_config() {
        let config = WarmConfig::new()
            .with_static_caching(StaticCachingConfig::with_strategy("half").with_queue_connection("sqs"))
            .with_default_connection("redis");
        assert_eq!(ConnectionResolver::new(&config).resolve().as_str(), "sqs");

        let config = WarmConfig::new().with_default_connection("redis");
        assert_eq!(ConnectionResolver::new(&config).resolve().as_str(), "redis");
    }
}
