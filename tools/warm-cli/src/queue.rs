//! Spool-directory queue backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use edge_warm::{Accepted, QueueBackend, ResolvedConnection, SubmissionError, WarmJob};
use serde::{Deserialize, Serialize};

use crate::config::{ConnectionConfig, QueueDriver};

/// Queue used for jobs submitted without a named queue.
pub const DEFAULT_QUEUE: &str = "default";

/// A job as written to the spool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpooledJob {
    /// Job identifier (also the file stem).
    pub id: String,
    /// When the job was accepted (RFC 3339).
    pub queued_at: String,
    /// Delivery attempts made by workers so far.
    pub attempts: u32,
    /// The warm job.
    pub job: WarmJob,
}

/// Persists each submitted job as `<spool>/<queue>/<id>.json`.
///
/// Workers draining the spool are not part of this tool.
pub struct SpoolQueue {
    connections: BTreeMap<String, ConnectionConfig>,
    root: PathBuf,
}

impl SpoolQueue {
    /// Create a spool queue; relative spool paths resolve against `root`.
    pub fn new(connections: BTreeMap<String, ConnectionConfig>, root: impl Into<PathBuf>) -> Self {
        Self {
            connections,
            root: root.into(),
        }
    }

    /// Spool directory of a connection.
    pub fn spool_dir(&self, connection: &str) -> Option<PathBuf> {
        let config = self.connections.get(connection)?;
        let dir = match &config.path {
            Some(path) if Path::new(path).is_absolute() => PathBuf::from(path),
            Some(path) => self.root.join(path),
            None => self.root.join(".edge").join("queue").join(connection),
        };
        Some(dir)
    }
}

#[async_trait]
impl QueueBackend for SpoolQueue {
    async fn submit(
        &self,
        job: WarmJob,
        connection: &ResolvedConnection,
    ) -> Result<Accepted, SubmissionError> {
        let url = job.request.url().to_string();
        let reject = |reason: String| SubmissionError::new(connection.as_str(), &url, reason);

        let config = self
            .connections
            .get(connection.as_str())
            .ok_or_else(|| reject("connection is not configured".to_string()))?;
        if config.driver == QueueDriver::Sync {
            return Err(reject("sync connections do not accept queued jobs".to_string()));
        }

        let dir = self
            .spool_dir(connection.as_str())
            .ok_or_else(|| reject("connection is not configured".to_string()))?
            .join(job.queue.as_deref().unwrap_or(DEFAULT_QUEUE));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| reject(format!("failed to create {}: {}", dir.display(), e)))?;

        let spooled = SpooledJob {
            id: uuid::Uuid::new_v4().to_string(),
            queued_at: Utc::now().to_rfc3339(),
            attempts: 0,
            job,
        };
        let json = serde_json::to_vec_pretty(&spooled).map_err(|e| reject(e.to_string()))?;

        let path = dir.join(format!("{}.json", spooled.id));
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| reject(format!("failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "spooled warm job");

        Ok(Accepted { job_id: spooled.id })
    }
}
