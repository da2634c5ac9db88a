//! HTTP page fetcher.

use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use edge_warm::{FetchError, FetchResponse, PageFetcher, WarmRequest};

/// Credentials sent with every warm request.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub user: String,
    pub password: Option<String>,
}

/// Settings for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    /// User agent header.
    pub user_agent: String,
    /// Optional basic auth.
    pub auth: Option<BasicAuth>,
    /// Ignore proxy environment variables.
    pub no_proxy: bool,
}

/// Visits pages over HTTP so the caching layer renders them.
pub struct HttpFetcher {
    client: reqwest::Client,
    auth: Option<BasicAuth>,
}

impl HttpFetcher {
    /// Build a fetcher.
    pub fn new(settings: FetchSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .danger_accept_invalid_certs(settings.insecure);
        if settings.no_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            auth: settings.auth,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &WarmRequest) -> Result<FetchResponse, FetchError> {
        if !request.url().starts_with("http://") && !request.url().starts_with("https://") {
            return Err(FetchError::Request(format!(
                "{} is not an absolute URL; set site.base_url",
                request.url()
            )));
        }

        let mut builder = self.client.request(request.method().clone(), request.url());
        if let Some(auth) = &self.auth {
            builder = builder.basic_auth(&auth.user, auth.password.as_ref());
        }

        let response = builder.send().await.map_err(classify_error)?;
        check_status(response.status().as_u16(), request.url())
    }
}

/// Map an HTTP status to a fetch result.
pub fn check_status(status: u16, url: &str) -> Result<FetchResponse, FetchError> {
    if status >= 400 {
        return Err(FetchError::Http {
            status,
            url: url.to_string(),
        });
    }
    Ok(FetchResponse { status })
}

fn classify_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else if err.is_connect() {
        FetchError::Connection(err.to_string())
    } else {
        FetchError::Request(err.to_string())
    }
}
