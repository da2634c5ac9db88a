//! Warm requests and their results.

use std::fmt;

use http::Method;
use serde::{Deserialize, Serialize};

/// A single URL visit that populates the static cache.
///
/// Requests are created once per routable URL and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmRequest {
    url: String,
    #[serde(with = "method_serde")]
    method: Method,
}

impl WarmRequest {
    /// Create a GET request for a URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
        }
    }

    /// Create a request for a route relative to a base URL.
    ///
    /// Without a base URL the route is kept in path form.
    pub fn for_route(base_url: Option<&str>, route: &str) -> Self {
        match base_url {
            Some(base) if !base.is_empty() => Self::get(join_url(base, route)),
            _ => Self::get(normalize_path(route)),
        }
    }

    /// The URL to visit.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP method (always GET).
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path component of the URL, e.g. `/about`.
    pub fn path(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => {
                let end = self.url.find(['?', '#']).unwrap_or(self.url.len());
                normalize_path(&self.url[..end])
            }
        }
    }
}

impl fmt::Display for WarmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Outcome of visiting a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmResult {
    /// Whether the page was rendered successfully.
    pub success: bool,
    /// HTTP status code, if a response was received.
    pub status_code: Option<u16>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WarmResult {
    /// A successful visit.
    pub fn ok(status_code: u16) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            error: None,
        }
    }

    /// A failed visit.
    pub fn failed(status_code: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            error: Some(error.into()),
        }
    }
}

fn join_url(base: &str, route: &str) -> String {
    if route.starts_with("http://") || route.starts_with("https://") {
        return route.to_string();
    }
    format!("{}{}", base.trim_end_matches('/'), normalize_path(route))
}

fn normalize_path(route: &str) -> String {
    if route.starts_with('/') {
        route.to_string()
    } else {
        format!("/{}", route)
    }
}

mod method_serde {
    use http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Method, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Method, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_route_joins_base_url() {
        let req = WarmRequest::for_route(Some("https://example.com/"), "about");
        assert_eq!(req.url(), "https://example.com/about");
        assert_eq!(req.method(), &Method::GET);
    }

    #[test]
    fn test_for_route_without_base_keeps_path() {
        let req = WarmRequest::for_route(None, "contact");
        assert_eq!(req.url(), "/contact");
    }

    #[test]
    fn test_for_route_keeps_absolute_route() {
        let req = WarmRequest::for_route(Some("https://example.com"), "https://cdn.example.com/x");
        assert_eq!(req.url(), "https://cdn.example.com/x");
    }

    #[test]
    fn test_path_of_absolute_url() {
        let req = WarmRequest::get("http://localhost/blog/post?page=2");
        assert_eq!(req.path(), "/blog/post");
    }

    #[test]
    fn test_path_of_path_form() {
        let req = WarmRequest::get("/about?x=1");
        assert_eq!(req.path(), "/about");
    }

    #[test]
    fn test_request_json_shape() {
        let req = WarmRequest::get("http://localhost/about");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["url"], "http://localhost/about");
        assert_eq!(json["method"], "GET");

        let back: WarmRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_warm_result_constructors() {
        assert!(WarmResult::ok(200).success);
        let failed = WarmResult::failed(Some(500), "server error");
        assert!(!failed.success);
        assert_eq!(failed.status_code, Some(500));
        assert_eq!(failed.error.as_deref(), Some("server error"));
    }
}
