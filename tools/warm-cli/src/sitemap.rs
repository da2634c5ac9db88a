//! Route-list site map.

use std::path::PathBuf;

use edge_warm::{SiteMapError, SiteMapProvider, WarmRequest};

/// Routes from the config file plus an optional routes file.
pub struct RouteList {
    base_url: Option<String>,
    routes: Vec<String>,
    routes_file: Option<PathBuf>,
}

impl RouteList {
    /// Create a route list.
    pub fn new(base_url: Option<String>, routes: Vec<String>, routes_file: Option<PathBuf>) -> Self {
        Self {
            base_url,
            routes,
            routes_file,
        }
    }

    fn file_routes(&self) -> Result<Vec<String>, SiteMapError> {
        let Some(path) = &self.routes_file else {
            return Ok(Vec::new());
        };

        let content = std::fs::read_to_string(path).map_err(|source| SiteMapError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(parse_routes(&content))
    }
}

impl SiteMapProvider for RouteList {
    fn routable_urls(&self) -> Result<Vec<String>, SiteMapError> {
        let routes = self.routes.iter().cloned().chain(self.file_routes()?);
        Ok(routes
            .map(|route| {
                WarmRequest::for_route(self.base_url.as_deref(), &route)
                    .url()
                    .to_string()
            })
            .collect())
    }
}

/// One route per line; blank lines and `#` comments are skipped.
pub fn parse_routes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
