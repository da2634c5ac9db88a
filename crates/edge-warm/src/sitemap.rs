//! Sources of routable URLs.

use crate::error::SiteMapError;

/// Enumerates the routable URLs of a site, in a stable order.
pub trait SiteMapProvider: Send + Sync {
    /// List every URL (absolute or path form) that should be warmed.
    fn routable_urls(&self) -> Result<Vec<String>, SiteMapError>;
}

/// A fixed list of routes.
#[derive(Debug, Clone, Default)]
pub struct StaticSiteMap {
    routes: Vec<String>,
}

impl StaticSiteMap {
    /// Create a site map from routes.
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(Into::into).collect(),
        }
    }
}

impl SiteMapProvider for StaticSiteMap {
    fn routable_urls(&self) -> Result<Vec<String>, SiteMapError> {
        Ok(self.routes.clone())
    }
}
