//! The warm command: gate, enumerate, filter, dispatch, report.

use crate::config::ConfigProvider;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::WarmError;
use crate::filter::UrlFilter;
use crate::gate::FeatureGate;
use crate::job::PageFetcher;
use crate::queue::QueueBackend;
use crate::report::{ExitStatus, ReportSink, Reporter};
use crate::request::WarmRequest;
use crate::sitemap::SiteMapProvider;

/// Per-invocation options.
#[derive(Debug, Clone, Default)]
pub struct WarmOptions {
    /// Dispatch each URL as a queued job instead of fetching inline.
    pub queue: bool,
    /// Only warm URLs matching these patterns.
    pub include: Vec<String>,
    /// Skip URLs matching these patterns.
    pub exclude: Vec<String>,
    /// Skip URLs deeper than this many path segments.
    pub max_depth: Option<usize>,
    /// Warm at most this many URLs.
    pub max_requests: Option<usize>,
}

impl WarmOptions {
    /// Options for a queued run.
    pub fn queued() -> Self {
        Self {
            queue: true,
            ..Default::default()
        }
    }

    /// Build the URL filter for these options.
    pub fn filter(&self) -> Result<UrlFilter, WarmError> {
        Ok(UrlFilter::new()
            .with_include(&self.include)?
            .with_exclude(&self.exclude)?
            .with_max_depth(self.max_depth)
            .with_max_requests(self.max_requests))
    }
}

/// Warms the static cache with injected collaborators.
pub struct StaticWarmer<'a> {
    config: &'a dyn ConfigProvider,
    sitemap: &'a dyn SiteMapProvider,
    fetcher: &'a dyn PageFetcher,
    queue: &'a dyn QueueBackend,
    sink: &'a dyn ReportSink,
}

impl<'a> StaticWarmer<'a> {
    /// Create a warmer.
    pub fn new(
        config: &'a dyn ConfigProvider,
        sitemap: &'a dyn SiteMapProvider,
        fetcher: &'a dyn PageFetcher,
        queue: &'a dyn QueueBackend,
        sink: &'a dyn ReportSink,
    ) -> Self {
        Self {
            config,
            sitemap,
            fetcher,
            queue,
            sink,
        }
    }

    /// Run the command and report how it ended.
    pub async fn run(&self, options: &WarmOptions) -> ExitStatus {
        let reporter = Reporter::new(self.sink);
        let result = self.warm(options, &reporter).await;
        let status = reporter.finish(&result);
        tracing::debug!(?status, "warm finished");
        status
    }

    /// Run the command without the final report.
    pub async fn warm(
        &self,
        options: &WarmOptions,
        reporter: &Reporter<'_>,
    ) -> Result<DispatchOutcome, WarmError> {
        FeatureGate::new(self.config).check()?;

        let filter = options.filter()?;
        let urls = self.sitemap.routable_urls()?;
        let enumerated = urls.len();
        let requests = filter.apply(urls.into_iter().map(WarmRequest::get).collect());
        tracing::debug!(enumerated, selected = requests.len(), "collected routable URLs");

        Dispatcher::new(self.config, self.fetcher, self.queue, reporter)
            .dispatch(requests, options.queue)
            .await
    }
}
