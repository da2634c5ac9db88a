//! Static cache warming for the edge streaming SSR platform.
//!
//! Visits every routable URL so the static caching layer renders and stores
//! the page ahead of real traffic. Warming either happens inline, one fetch
//! after another, or is fanned out as independent jobs onto a queue
//! connection.
//!
//! - `FeatureGate` - Refuses to warm when static caching is off
//! - `ConnectionResolver` - Picks the queue connection for warm jobs
//! - `UrlFilter` - Narrows the routes to warm
//! - `Dispatcher` - Runs a `DispatchPlan` inline or through a `QueueBackend`
//! - `WarmJob` - Visits a single URL through a `PageFetcher`
//! - `Reporter` - Operator-facing lines and exit status
//! - `StaticWarmer` - Drives the whole command

mod config;
mod connection;
mod dispatch;
mod error;
mod filter;
mod gate;
mod job;
mod queue;
mod report;
mod request;
mod sitemap;
mod warmer;

pub use config::*;
pub use connection::*;
pub use dispatch::*;
pub use error::*;
pub use filter::*;
pub use gate::*;
pub use job::*;
pub use queue::*;
pub use report::*;
pub use request::*;
pub use sitemap::*;
pub use warmer::*;
