//! Warm jobs: one URL visit each.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::connection::ResolvedConnection;
use crate::error::FetchError;
use crate::request::{WarmRequest, WarmResult};

/// Response of a successful page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
}

/// Performs the request that makes the caching layer render a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page.
    async fn fetch(&self, request: &WarmRequest) -> Result<FetchResponse, FetchError>;
}

/// A unit of warming work.
///
/// Carries the request plus the connection (and optional named queue) it is
/// dispatched to. Re-running a job only re-renders the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmJob {
    /// The request to perform.
    pub request: WarmRequest,
    /// Connection the job runs on; unset until resolved.
    pub connection: Option<ResolvedConnection>,
    /// Named queue on the connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
}

impl WarmJob {
    /// Create an unassigned job.
    pub fn new(request: WarmRequest) -> Self {
        Self {
            request,
            connection: None,
            queue: None,
        }
    }

    /// Assign the job to a connection.
    pub fn on_connection(mut self, connection: ResolvedConnection) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Assign the job to a named queue.
    pub fn on_queue(mut self, queue: Option<String>) -> Self {
        self.queue = queue;
        self
    }

    /// Visit the URL. Failures are folded into the result.
    pub async fn execute(&self, fetcher: &dyn PageFetcher) -> WarmResult {
        match fetcher.fetch(&self.request).await {
            Ok(response) => {
                tracing::debug!(url = %self.request.url(), status = response.status, "warmed");
                WarmResult::ok(response.status)
            }
            Err(e) => {
                tracing::warn!(url = %self.request.url(), error = %e, "failed to warm");
                WarmResult::failed(e.status(), e.to_string())
            }
        }
    }
}

/// In-memory fetcher that records visited URLs.
///
/// Every URL succeeds with 200 unless a failure was registered for it.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    failures: HashMap<String, FetchError>,
    visited: Mutex<Vec<String>>,
}

impl StaticFetcher {
    /// Create a fetcher where every URL succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a URL fail with the given error.
    pub fn with_failure(mut self, url: impl Into<String>, error: FetchError) -> Self {
        self.failures.insert(url.into(), error);
        self
    }

    /// URLs fetched so far, in order.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, request: &WarmRequest) -> Result<FetchResponse, FetchError> {
        self.visited.lock().push(request.url().to_string());
        match self.failures.get(request.url()) {
            Some(error) => Err(error.clone()),
            None => Ok(FetchResponse { status: 200 }),
        }
    }
}
