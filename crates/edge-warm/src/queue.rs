//! Queue backends that accept warm jobs.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::connection::ResolvedConnection;
use crate::error::SubmissionError;
use crate::job::WarmJob;

/// Acknowledgement that a backend took ownership of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// Backend-assigned job identifier.
    pub job_id: String,
}

/// Accepts warm jobs for later execution by an external worker pool.
///
/// Once `submit` returns `Ok`, the job belongs to the backend: retries and
/// failure handling are the backend's concern.
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Submit one job to a connection.
    async fn submit(
        &self,
        job: WarmJob,
        connection: &ResolvedConnection,
    ) -> Result<Accepted, SubmissionError>;
}

/// In-memory backend that records every submitted job.
#[derive(Debug, Default)]
pub struct RecordingQueue {
    jobs: Mutex<Vec<WarmJob>>,
    reject: HashSet<String>,
}

impl RecordingQueue {
    /// Create an empty recording queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject submissions of jobs carrying this URL.
    pub fn rejecting(mut self, url: impl Into<String>) -> Self {
        self.reject.insert(url.into());
        self
    }

    /// Jobs accepted so far, in submission order.
    pub fn jobs(&self) -> Vec<WarmJob> {
        self.jobs.lock().clone()
    }

    /// Number of accepted jobs.
    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Whether no job was accepted.
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

#[async_trait]
impl QueueBackend for RecordingQueue {
    async fn submit(
        &self,
        job: WarmJob,
        connection: &ResolvedConnection,
    ) -> Result<Accepted, SubmissionError> {
        if self.reject.contains(job.request.url()) {
            return Err(SubmissionError::new(
                connection.as_str(),
                job.request.url(),
                "rejected",
            ));
        }

        let mut jobs = self.jobs.lock();
        jobs.push(job);
        Ok(Accepted {
            job_id: jobs.len().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::WarmRequest;

    #[tokio::test]
    async fn test_recording_queue_records_in_order() {
        let queue = RecordingQueue::new();
        let redis = ResolvedConnection::new("redis");

        let first = queue
            .submit(WarmJob::new(WarmRequest::get("/a")), &redis)
            .await
            .unwrap();
        let second = queue
            .submit(WarmJob::new(WarmRequest::get("/b")), &redis)
            .await
            .unwrap();

        assert_eq!(first.job_id, "1");
        assert_eq!(second.job_id, "2");
        let urls: Vec<_> = queue.jobs().iter().map(|j| j.request.url().to_string()).collect();
        assert_eq!(urls, vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn test_recording_queue_rejects() {
        let queue = RecordingQueue::new().rejecting("/b");
        let redis = ResolvedConnection::new("redis");

        let err = queue
            .submit(WarmJob::new(WarmRequest::get("/b")), &redis)
            .await
            .unwrap_err();

        assert_eq!(err.connection, "redis");
        assert_eq!(err.url, "/b");
        assert!(queue.is_empty());
    }
}
