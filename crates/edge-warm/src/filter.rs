//! Route filtering before dispatch.

use std::collections::HashSet;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::WarmError;
use crate::request::WarmRequest;

/// Narrows the set of requests to warm.
///
/// Patterns use `*` as a wildcard and are matched against both the URL path
/// and the full URL. Enumeration order is preserved and duplicates keep their
/// first occurrence.
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
    max_depth: Option<usize>,
    max_requests: Option<usize>,
}

impl UrlFilter {
    /// A filter that keeps everything (apart from duplicates).
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep URLs matching one of these patterns.
    pub fn with_include<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, WarmError> {
        self.include = build_set(patterns)?;
        Ok(self)
    }

    /// Drop URLs matching any of these patterns.
    pub fn with_exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, WarmError> {
        self.exclude = build_set(patterns)?;
        Ok(self)
    }

    /// Drop URLs with more path segments than `depth`.
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Keep at most `max` URLs.
    pub fn with_max_requests(mut self, max: Option<usize>) -> Self {
        self.max_requests = max;
        self
    }

    /// Check a single request against the pattern and depth rules.
    pub fn accepts(&self, request: &WarmRequest) -> bool {
        let path = request.path();

        if let Some(include) = &self.include {
            if !include.is_match(&path) && !include.is_match(request.url()) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude {
            if exclude.is_match(&path) || exclude.is_match(request.url()) {
                return false;
            }
        }

        match self.max_depth {
            Some(max) => path_depth(&path) <= max,
            None => true,
        }
    }

    /// Apply the filter to an ordered list of requests.
    pub fn apply(&self, requests: Vec<WarmRequest>) -> Vec<WarmRequest> {
        let mut seen = HashSet::new();
        let limit = self.max_requests.unwrap_or(usize::MAX);

        requests
            .into_iter()
            .filter(|r| self.accepts(r))
            .filter(|r| seen.insert(r.url().to_string()))
            .take(limit)
            .collect()
    }
}

/// Number of non-empty path segments; `/` has depth 0.
pub fn path_depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<Option<GlobSet>, WarmError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_ref().trim())
            .map_err(|e| WarmError::Pattern(format!("{}: {}", pattern.as_ref(), e)))?;
        builder.add(glob);
    }

    builder
        .build()
        .map(Some)
        .map_err(|e| WarmError::Pattern(e.to_string()))
}
