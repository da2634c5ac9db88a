//! CLI configuration.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use edge_warm::{ConfigProvider, StaticCachingConfig, SYNC_CONNECTION};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Site routes to warm.
    #[serde(default)]
    pub site: SiteConfig,

    /// Static caching settings.
    #[serde(default)]
    pub static_caching: StaticCachingConfig,

    /// Queue connections.
    #[serde(default)]
    pub queue: QueueConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

impl ConfigProvider for CliConfig {
    fn static_caching(&self) -> &StaticCachingConfig {
        &self.static_caching
    }

    fn default_queue_connection(&self) -> &str {
        &self.queue.default
    }

    fn is_sync_connection(&self, name: &str) -> bool {
        name == SYNC_CONNECTION
            || self
                .queue
                .connections
                .get(name)
                .is_some_and(|c| c.driver == QueueDriver::Sync)
    }
}

/// Where the routable URLs come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL joined with every route (e.g. "https://example.com").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Routes to warm, in order.
    #[serde(default)]
    pub routes: Vec<String>,

    /// File with one route per line, appended after `routes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes_file: Option<String>,

    /// User agent sent with warm requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("edge-warm/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            routes: Vec::new(),
            routes_file: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Default connection for queued work.
    #[serde(default = "default_connection")]
    pub default: String,

    /// Named connections.
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

fn default_connection() -> String {
    SYNC_CONNECTION.to_string()
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default: default_connection(),
            connections: BTreeMap::new(),
        }
    }
}

/// A queue connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Backend driver.
    pub driver: QueueDriver,

    /// Spool directory (default: `.edge/queue/<connection>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Supported queue drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueDriver {
    /// Run immediately in-process.
    Sync,
    /// Persist jobs as JSON files for an external worker.
    Spool,
}

/// Generate a default edge-warm.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Static cache warming configuration

[site]
base_url = "{base_url}"
routes = ["/"]
# routes_file = "routes.txt"

[static_caching]
strategy = "half"
# queue_connection = "spool"
# queue = "warm"
insecure = false
timeout_secs = 30

[queue]
default = "sync"

[queue.connections.spool]
driver = "spool"
# path = ".edge/queue/spool"
"#,
        base_url = base_url
    )
}
