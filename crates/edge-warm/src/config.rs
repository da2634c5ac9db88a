//! Static caching and queue configuration.

use serde::{Deserialize, Serialize};

/// Name of the connection that runs jobs immediately in-process.
pub const SYNC_CONNECTION: &str = "sync";

/// Static caching settings relevant to warming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCachingConfig {
    /// Caching strategy (e.g. "half", "full"). Unset disables static caching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Queue connection used for warm jobs, overriding the default connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_connection: Option<String>,

    /// Named queue on the connection for warm jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    /// Accept invalid TLS certificates when visiting pages.
    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StaticCachingConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            queue_connection: None,
            queue: None,
            insecure: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StaticCachingConfig {
    /// Create a config with a strategy set.
    pub fn with_strategy(strategy: impl Into<String>) -> Self {
        Self {
            strategy: Some(strategy.into()),
            ..Default::default()
        }
    }

    /// Set the warm queue connection.
    pub fn with_queue_connection(mut self, connection: impl Into<String>) -> Self {
        self.queue_connection = Some(connection.into());
        self
    }

    /// Set the warm queue name.
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }
}

/// Source of configuration for the warming engine.
pub trait ConfigProvider: Send + Sync {
    /// Static caching settings.
    fn static_caching(&self) -> &StaticCachingConfig;

    /// The system-wide default queue connection.
    fn default_queue_connection(&self) -> &str;

    /// Whether the named connection runs jobs immediately in-process.
    fn is_sync_connection(&self, name: &str) -> bool {
        name == SYNC_CONNECTION
    }
}

/// Plain in-memory configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmConfig {
    /// Static caching settings.
    pub static_caching: StaticCachingConfig,
    /// Default queue connection.
    pub default_queue_connection: String,
}

impl WarmConfig {
    /// Create a config with caching disabled and the sync connection as default.
    pub fn new() -> Self {
        Self {
            static_caching: StaticCachingConfig::default(),
            default_queue_connection: SYNC_CONNECTION.to_string(),
        }
    }

    /// Set the static caching settings.
    pub fn with_static_caching(mut self, static_caching: StaticCachingConfig) -> Self {
        self.static_caching = static_caching;
        self
    }

    /// Set the default queue connection.
    pub fn with_default_connection(mut self, connection: impl Into<String>) -> Self {
        self.default_queue_connection = connection.into();
        self
    }
}

impl Default for WarmConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for WarmConfig {
    fn static_caching(&self) -> &StaticCachingConfig {
        &self.static_caching
    }

    fn default_queue_connection(&self) -> &str {
        &self.default_queue_connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_config_default() {
        let config = WarmConfig::default();
        assert!(config.static_caching.strategy.is_none());
        assert_eq!(config.default_queue_connection(), "sync");
        assert!(config.is_sync_connection("sync"));
        assert!(!config.is_sync_connection("redis"));
    }

    #[test]
    fn test_static_caching_builder_chain() {
        let config = StaticCachingConfig::with_strategy("half")
            .with_queue_connection("sqs")
            .with_queue("warm");

        assert_eq!(config.strategy.as_deref(), Some("half"));
        assert_eq!(config.queue_connection.as_deref(), Some("sqs"));
        assert_eq!(config.queue.as_deref(), Some("warm"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_static_caching_deserialize_defaults() {
        let config: StaticCachingConfig = serde_json::from_str(r#"{"strategy":"full"}"#).unwrap();
        assert_eq!(config.strategy.as_deref(), Some("full"));
        assert!(config.queue_connection.is_none());
        assert!(!config.insecure);
        assert_eq!(config.timeout_secs, 30);
    }
}
