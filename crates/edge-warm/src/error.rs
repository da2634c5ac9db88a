//! Warming error types.

use thiserror::Error;

/// Errors that abort a warm run.
#[derive(Error, Debug)]
pub enum WarmError {
    /// No static caching strategy is configured.
    #[error("Static caching is not enabled.")]
    Disabled,

    /// The routable URLs could not be enumerated.
    #[error("Failed to list routable URLs: {0}")]
    SiteMap(#[from] SiteMapError),

    /// A URL filter pattern is invalid.
    #[error("Invalid URL pattern: {0}")]
    Pattern(String),

    /// The queue backend rejected a warm job.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// A queue backend refused to accept a warm job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to queue {url} on connection \"{connection}\": {reason}")]
pub struct SubmissionError {
    /// Connection the job was submitted to.
    pub connection: String,
    /// URL carried by the rejected job.
    pub url: String,
    /// Backend-specific reason.
    pub reason: String,
}

impl SubmissionError {
    /// Create a new submission error.
    pub fn new(
        connection: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            connection: connection.into(),
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// A page could not be fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// Status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The site map could not produce routes.
#[derive(Error, Debug)]
pub enum SiteMapError {
    #[error("Failed to read routes from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
