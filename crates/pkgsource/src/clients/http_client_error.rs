use miette::Diagnostic;
use starbase_styles::{Style, Stylize};
use starbase_utils::fs::FsError;
use std::path::PathBuf;
use thiserror::Error;

/// HTTP(S) client errors.
#[derive(Debug, Diagnostic, Error)]
pub enum HttpClientError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Fs(#[from] Box<FsError>),

    #[diagnostic(code(source::http_client::create_failed))]
    #[error("Failed to create HTTP client.")]
    Client {
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(code(source::http_client::request_failed))]
    #[error("Failed to make HTTP request for {}.", .url.style(Style::Url))]
    Http {
        url: String,
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(code(source::http_client::invalid_cert))]
    #[error("Invalid certificate {}.", .path.style(Style::Path))]
    InvalidCert {
        path: PathBuf,
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(code(source::http_client::invalid_proxy))]
    #[error("Invalid proxy {}.", .url.style(Style::Url))]
    InvalidProxy {
        url: String,
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(code(source::http_client::invalid_response))]
    #[error("Invalid JSON response from {}.", .url.style(Style::Url))]
    InvalidResponse {
        url: String,
        #[source]
        error: Box<serde_json::Error>,
    },

    #[diagnostic(code(source::http_client::not_found))]
    #[error("Resource {} does not exist (404).", .url.style(Style::Url))]
    NotFound { url: String },

    #[diagnostic(code(source::http_client::failed_status))]
    #[error("Request for {} failed with status {status}.", .url.style(Style::Url))]
    Status { url: String, status: u16 },
}

impl HttpClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpClientError::NotFound { .. })
    }
}

impl From<FsError> for HttpClientError {
    fn from(e: FsError) -> HttpClientError {
        HttpClientError::Fs(Box::new(e))
    }
}
