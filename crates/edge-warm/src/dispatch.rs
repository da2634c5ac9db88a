//! Inline vs. queued dispatch of warm requests.

use crate::config::ConfigProvider;
use crate::connection::{ConnectionResolver, ResolvedConnection};
use crate::error::WarmError;
use crate::job::{PageFetcher, WarmJob};
use crate::queue::QueueBackend;
use crate::report::{Progress, Reporter};
use crate::request::WarmRequest;

/// How warm requests are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Fetched one after another in this process.
    Inline,
    /// Submitted as independent jobs to a queue connection.
    Queued,
}

/// The per-invocation decision on how to warm.
#[derive(Debug, Clone)]
pub struct DispatchPlan {
    /// Execution mode.
    pub mode: DispatchMode,
    /// Resolved connection, when queueing was requested.
    pub connection: Option<ResolvedConnection>,
    /// Named queue for submitted jobs.
    pub queue: Option<String>,
    /// Requests in enumeration order.
    pub requests: Vec<WarmRequest>,
    /// Queueing was requested but the connection is synchronous.
    pub downgraded: bool,
}

impl DispatchPlan {
    /// Plan inline warming.
    pub fn inline(requests: Vec<WarmRequest>) -> Self {
        Self {
            mode: DispatchMode::Inline,
            connection: None,
            queue: None,
            requests,
            downgraded: false,
        }
    }

    /// Plan queued warming on a connection.
    ///
    /// A synchronous connection downgrades the plan to inline.
    pub fn queued(requests: Vec<WarmRequest>, connection: ResolvedConnection) -> Self {
        let sync = connection.is_sync();
        Self::on_connection(requests, connection, sync)
    }

    fn on_connection(requests: Vec<WarmRequest>, connection: ResolvedConnection, sync: bool) -> Self {
        Self {
            mode: if sync {
                DispatchMode::Inline
            } else {
                DispatchMode::Queued
            },
            connection: Some(connection),
            queue: None,
            requests,
            downgraded: sync,
        }
    }

    /// Build the plan from configuration and the queue flag.
    pub fn for_config(
        requests: Vec<WarmRequest>,
        queue_requested: bool,
        config: &dyn ConfigProvider,
    ) -> Self {
        if !queue_requested {
            return Self::inline(requests);
        }

        let connection = ConnectionResolver::new(config).resolve();
        let sync = config.is_sync_connection(connection.as_str());
        let mut plan = Self::on_connection(requests, connection, sync);
        plan.queue = config.static_caching().queue.clone();
        plan
    }
}

/// What a completed dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every request was fetched in-process.
    Inline {
        visited: usize,
        succeeded: usize,
        failed: usize,
    },
    /// Every request was accepted by the queue backend.
    Queued {
        submitted: usize,
        connection: ResolvedConnection,
    },
}

/// Executes a dispatch plan.
pub struct Dispatcher<'a> {
    config: &'a dyn ConfigProvider,
    fetcher: &'a dyn PageFetcher,
    queue: &'a dyn QueueBackend,
    reporter: &'a Reporter<'a>,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher.
    pub fn new(
        config: &'a dyn ConfigProvider,
        fetcher: &'a dyn PageFetcher,
        queue: &'a dyn QueueBackend,
        reporter: &'a Reporter<'a>,
    ) -> Self {
        Self {
            config,
            fetcher,
            queue,
            reporter,
        }
    }

    /// Decide the mode for these requests and run them.
    pub async fn dispatch(
        &self,
        requests: Vec<WarmRequest>,
        queue_requested: bool,
    ) -> Result<DispatchOutcome, WarmError> {
        let plan = DispatchPlan::for_config(requests, queue_requested, self.config);
        self.run(plan).await
    }

    /// Run a plan.
    pub async fn run(&self, plan: DispatchPlan) -> Result<DispatchOutcome, WarmError> {
        tracing::debug!(
            mode = ?plan.mode,
            connection = ?plan.connection.as_ref().map(|c| c.as_str()),
            requests = plan.requests.len(),
            "dispatching warm requests"
        );

        match (plan.mode, plan.connection) {
            (DispatchMode::Queued, Some(connection)) => {
                self.run_queued(plan.requests, connection, plan.queue).await
            }
            (_, connection) => {
                if plan.downgraded {
                    if let Some(connection) = &connection {
                        self.reporter.queue_disabled(connection);
                    }
                }
                Ok(self.run_inline(plan.requests).await)
            }
        }
    }

    async fn run_inline(&self, requests: Vec<WarmRequest>) -> DispatchOutcome {
        let total = requests.len();
        self.reporter.visiting(total);
        self.reporter.progress(Progress::Started { total });

        let mut succeeded = 0;
        for request in requests {
            let job = WarmJob::new(request);
            let result = job.execute(self.fetcher).await;
            if result.success {
                succeeded += 1;
            }
            self.reporter.progress(Progress::Visited {
                request: &job.request,
                result: &result,
            });
        }

        self.reporter.progress(Progress::Finished);
        tracing::info!(visited = total, succeeded, "inline warming finished");

        DispatchOutcome::Inline {
            visited: total,
            succeeded,
            failed: total - succeeded,
        }
    }

    async fn run_queued(
        &self,
        requests: Vec<WarmRequest>,
        connection: ResolvedConnection,
        queue: Option<String>,
    ) -> Result<DispatchOutcome, WarmError> {
        self.reporter.adding(requests.len());

        let mut submitted = 0;
        for request in requests {
            let job = WarmJob::new(request)
                .on_connection(connection.clone())
                .on_queue(queue.clone());
            let accepted = self.queue.submit(job, &connection).await?;
            tracing::debug!(job_id = %accepted.job_id, connection = %connection, "queued warm job");
            submitted += 1;
        }

        tracing::info!(submitted, connection = %connection, "warm jobs queued");

        Ok(DispatchOutcome::Queued {
            submitted,
            connection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StaticCachingConfig, WarmConfig};
    use crate::error::FetchError;
    use crate::job::StaticFetcher;
    use crate::queue::RecordingQueue;
    use crate::report::RecordingSink;

    fn requests(paths: &[&str]) -> Vec<WarmRequest> {
        paths
            .iter()
            .map(|p| WarmRequest::for_route(Some("http://localhost"), p))
            .collect()
    }

    fn config(default: &str) -> WarmConfig {
        WarmConfig::new()
            .with_static_caching(StaticCachingConfig::with_strategy("half"))
            .with_default_connection(default)
    }

    #[test]
    fn test_plan_without_queue_flag_is_inline() {
        let plan = DispatchPlan::for_config(requests(&["/a"]), false, &config("redis"));
        assert_eq!(plan.mode, DispatchMode::Inline);
        assert!(plan.connection.is_none());
        assert!(!plan.downgraded);
    }

    #[test]
    fn test_plan_on_sync_connection_is_downgraded() {
        let plan = DispatchPlan::for_config(requests(&["/a"]), true, &config("sync"));
        assert_eq!(plan.mode, DispatchMode::Inline);
        assert!(plan.downgraded);
        assert_eq!(plan.connection.unwrap().as_str(), "sync");
    }

    #[test]
    fn test_plan_on_sync_driver_is_downgraded() {
        struct LocalSync(WarmConfig);

        impl ConfigProvider for LocalSync {
            fn static_caching(&self) -> &StaticCachingConfig {
                self.0.static_caching()
            }

            fn default_queue_connection(&self) -> &str {
                self.0.default_queue_connection()
            }

            fn is_sync_connection(&self, name: &str) -> bool {
                name == "local"
            }
        }

        let plan = DispatchPlan::for_config(requests(&["/a"]), true, &LocalSync(config("local")));
        assert_eq!(plan.mode, DispatchMode::Inline);
        assert!(plan.downgraded);
        assert_eq!(plan.connection.unwrap().as_str(), "local");
    }

    #[test]
    fn test_plan_on_real_connection_is_queued() {
        let config = WarmConfig::new()
            .with_static_caching(StaticCachingConfig::with_strategy("half").with_queue("warm"))
            .with_default_connection("redis");
        let plan = DispatchPlan::for_config(requests(&["/a"]), true, &config);
        assert_eq!(plan.mode, DispatchMode::Queued);
        assert_eq!(plan.queue.as_deref(), Some("warm"));
    }

    #[tokio::test]
    async fn test_inline_visits_in_order() {
        let config = config("sync");
        let fetcher = StaticFetcher::new();
        let queue = RecordingQueue::new();
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let dispatcher = Dispatcher::new(&config, &fetcher, &queue, &reporter);

        let outcome = dispatcher
            .dispatch(requests(&["/c", "/a", "/b"]), false)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Inline {
                visited: 3,
                succeeded: 3,
                failed: 0
            }
        );
        assert_eq!(
            fetcher.visited(),
            vec!["http://localhost/c", "http://localhost/a", "http://localhost/b"]
        );
        assert_eq!(sink.lines(), vec!["Visiting 3 URLs..."]);
        assert_eq!(sink.visited(), 3);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_inline_continues_after_failure() {
        let config = config("sync");
        let fetcher = StaticFetcher::new().with_failure(
            "http://localhost/a",
            FetchError::Connection("refused".to_string()),
        );
        let queue = RecordingQueue::new();
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let dispatcher = Dispatcher::new(&config, &fetcher, &queue, &reporter);

        let outcome = dispatcher
            .dispatch(requests(&["/a", "/b"]), false)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Inline {
                visited: 2,
                succeeded: 1,
                failed: 1
            }
        );
        assert_eq!(fetcher.visited().len(), 2);
        // No per-failure lines.
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_downgrade_notice_once() {
        let config = config("sync");
        let fetcher = StaticFetcher::new();
        let queue = RecordingQueue::new();
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let dispatcher = Dispatcher::new(&config, &fetcher, &queue, &reporter);

        dispatcher
            .dispatch(requests(&["/a", "/b"]), true)
            .await
            .unwrap();

        assert_eq!(sink.count("Queueing will be disabled."), 1);
        assert_eq!(
            sink.lines(),
            vec![
                "The queue connection is set to \"sync\". Queueing will be disabled.",
                "Visiting 2 URLs...",
            ]
        );
        assert!(queue.is_empty());
        assert_eq!(fetcher.visited().len(), 2);
    }

    #[tokio::test]
    async fn test_queued_submits_one_job_per_request() {
        let config = config("redis");
        let fetcher = StaticFetcher::new();
        let queue = RecordingQueue::new();
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let dispatcher = Dispatcher::new(&config, &fetcher, &queue, &reporter);

        let outcome = dispatcher
            .dispatch(requests(&["/about", "/contact"]), true)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Queued {
                submitted: 2,
                connection: ResolvedConnection::new("redis")
            }
        );
        assert_eq!(sink.lines(), vec!["Adding 2 requests..."]);
        assert!(fetcher.visited().is_empty());

        let jobs = queue.jobs();
        let paths: Vec<_> = jobs.iter().map(|j| j.request.path()).collect();
        assert_eq!(paths, vec!["/about", "/contact"]);
        assert!(jobs
            .iter()
            .all(|j| j.connection == Some(ResolvedConnection::new("redis"))));
    }

    #[tokio::test]
    async fn test_queued_fails_fast() {
        let config = config("redis");
        let fetcher = StaticFetcher::new();
        let queue = RecordingQueue::new().rejecting("http://localhost/b");
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let dispatcher = Dispatcher::new(&config, &fetcher, &queue, &reporter);

        let err = dispatcher
            .dispatch(requests(&["/a", "/b", "/c"]), true)
            .await
            .unwrap_err();

        assert!(matches!(err, WarmError::Submission(_)));
        let paths: Vec<_> = queue.jobs().iter().map(|j| j.request.path()).collect();
        assert_eq!(paths, vec!["/a"]);
    }

    #[tokio::test]
    async fn test_empty_requests_both_modes() {
        let fetcher = StaticFetcher::new();
        let queue = RecordingQueue::new();

        let inline_config = config("sync");
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let outcome = Dispatcher::new(&inline_config, &fetcher, &queue, &reporter)
            .dispatch(Vec::new(), false)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Inline {
                visited: 0,
                succeeded: 0,
                failed: 0
            }
        );
        assert!(sink.contains("Visiting 0 URLs..."));

        let queued_config = config("redis");
        let sink = RecordingSink::new();
        let reporter = Reporter::new(&sink);
        let outcome = Dispatcher::new(&queued_config, &fetcher, &queue, &reporter)
            .dispatch(Vec::new(), true)
            .await
            .unwrap();
        assert!(matches!(outcome, DispatchOutcome::Queued { submitted: 0, .. }));
        assert!(sink.contains("Adding 0 requests..."));
    }
}
