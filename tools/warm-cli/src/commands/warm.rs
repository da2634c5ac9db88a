//! Warm the static cache.

use std::time::Duration;

use anyhow::Result;
use edge_warm::{ExitStatus, FeatureGate, Reporter, StaticWarmer, WarmOptions};

use super::WarmArgs;
use crate::context::Context;
use crate::fetcher::{BasicAuth, FetchSettings, HttpFetcher};
use crate::queue::SpoolQueue;
use crate::report::TerminalReport;
use crate::sitemap::RouteList;

/// Run the warm command.
pub async fn run(args: WarmArgs, ctx: &Context) -> Result<ExitStatus> {
    let config = &ctx.config;
    let report = TerminalReport::new(ctx.output.clone());

    let status = match FeatureGate::new(config).check() {
        Err(e) => Reporter::new(&report).finish(&Err(e)),
        Ok(()) => {
            let fetcher = HttpFetcher::new(fetch_settings(&args, ctx))?;
            let queue = SpoolQueue::new(config.queue.connections.clone(), ctx.cwd.clone());
            let sitemap = RouteList::new(
                config.site.base_url.clone(),
                config.site.routes.clone(),
                config.site.routes_file.as_deref().map(|p| ctx.resolve_path(p)),
            );

            StaticWarmer::new(config, &sitemap, &fetcher, &queue, &report)
                .run(&options(&args))
                .await
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&report.summary(status.code()));
    }

    Ok(status)
}

fn options(args: &WarmArgs) -> WarmOptions {
    WarmOptions {
        queue: args.queue,
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        max_depth: args.max_depth,
        max_requests: args.max_requests,
    }
}

fn fetch_settings(args: &WarmArgs, ctx: &Context) -> FetchSettings {
    let static_caching = &ctx.config.static_caching;
    FetchSettings {
        timeout: Duration::from_secs(static_caching.timeout_secs),
        insecure: args.insecure || static_caching.insecure,
        user_agent: ctx.config.site.user_agent.clone(),
        auth: args.user.clone().map(|user| BasicAuth {
            user,
            password: args.password.clone(),
        }),
        no_proxy: args.no_proxy,
    }
}
