use super::HttpClientError;
use async_trait::async_trait;
use core::ops::Deref;
use pkgsource_api::LoadOptions;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use starbase_utils::fs;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Fetches the raw bytes behind a URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the payload at `url`. A 404 response must be reported
    /// as [`HttpClientError::NotFound`].
    async fn fetch(
        &self,
        url: &str,
        options: Option<&LoadOptions>,
    ) -> Result<Vec<u8>, HttpClientError>;
}

/// An HTTP(S) client that wraps [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn map_error(url: String, error: reqwest::Error) -> HttpClientError {
        HttpClientError::Http {
            error: Box::new(error),
            url,
        }
    }

    /// Send the request and translate unsuccessful statuses into errors.
    /// This is the only place where HTTP statuses are interpreted.
    pub async fn send(url: &str, request: RequestBuilder) -> Result<Response, HttpClientError> {
        let response = request
            .send()
            .await
            .map_err(|error| Self::map_error(url.to_owned(), error))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(HttpClientError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(HttpClientError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    pub async fn get_bytes(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, HttpClientError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = Self::send(url, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|error| Self::map_error(url.to_owned(), error))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ContentFetcher for HttpClient {
    async fn fetch(
        &self,
        url: &str,
        options: Option<&LoadOptions>,
    ) -> Result<Vec<u8>, HttpClientError> {
        match options {
            Some(options) => self.get_bytes(url, &options.headers).await,
            None => self.get_bytes(url, &BTreeMap::default()).await,
        }
    }
}

impl Deref for HttpClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

/// Configures the HTTP(S) client used for making requests.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpOptions {
    /// Allow invalid certificates. This is dangerous and should only be used as a last resort!
    pub allow_invalid_certs: bool,

    /// A list of proxy URLs that all requests should pass through. URLs that start with
    /// `http:` will handle insecure requests, while `https:` will handle secure requests.
    pub proxies: Vec<String>,

    /// A list of proxy URLs that all `https:` requests should pass through.
    pub secure_proxies: Vec<String>,

    /// Absolute path to the root certificate. Supports `.pem` and `.der` files.
    pub root_cert: Option<PathBuf>,

    /// Seconds to wait for a request to complete.
    pub timeout: Option<u64>,
}

/// Create an HTTP(S) client with the provided options and user agent.
pub fn create_http_client_with_options(
    options: &HttpOptions,
    user_agent: &str,
) -> Result<HttpClient, HttpClientError> {
    debug!("Creating HTTP client");

    let mut client_builder = reqwest::Client::builder()
        .user_agent(user_agent)
        .use_rustls_tls();

    if options.allow_invalid_certs {
        trace!("Allowing invalid certificates (I hope you know what you're doing!)");

        client_builder = client_builder.danger_accept_invalid_certs(true);
    }

    if let Some(timeout) = options.timeout {
        trace!(timeout, "Setting request timeout");

        client_builder = client_builder.timeout(Duration::from_secs(timeout));
    }

    if let Some(root_cert) = &options.root_cert {
        trace!(root_cert = ?root_cert, "Adding user provided root certificate");

        let map_cert_error = |error: reqwest::Error| HttpClientError::InvalidCert {
            path: root_cert.to_path_buf(),
            error: Box::new(error),
        };

        match root_cert.extension().and_then(|ext| ext.to_str()) {
            Some("der") => {
                client_builder = client_builder.add_root_certificate(
                    reqwest::Certificate::from_der(&fs::read_file_bytes(root_cert)?)
                        .map_err(map_cert_error)?,
                )
            }
            Some("pem") => {
                client_builder = client_builder.add_root_certificate(
                    reqwest::Certificate::from_pem(&fs::read_file_bytes(root_cert)?)
                        .map_err(map_cert_error)?,
                )
            }
            _ => {
                warn!(
                    root_cert = ?root_cert,
                    "Invalid root certificate type, must be a DER or PEM file",
                );
            }
        };
    }

    let mut insecure_proxies = vec![];
    let mut secure_proxies = options.secure_proxies.iter().collect::<Vec<_>>();

    for proxy in &options.proxies {
        if proxy.starts_with("https:") || (proxy.starts_with("http:") && proxy.contains(":443")) {
            secure_proxies.push(proxy);
        } else if proxy.starts_with("http:") {
            insecure_proxies.push(proxy);
        } else {
            warn!(proxy, "Invalid proxy, only http or https URLs allowed");
        };
    }

    for proxy in insecure_proxies {
        trace!(proxy, "Adding insecure proxy to client");

        client_builder = client_builder.proxy(reqwest::Proxy::http(proxy).map_err(|error| {
            HttpClientError::InvalidProxy {
                url: proxy.to_owned(),
                error: Box::new(error),
            }
        })?);
    }

    for proxy in secure_proxies {
        trace!(proxy, "Adding secure proxy to client");

        client_builder = client_builder.proxy(reqwest::Proxy::https(proxy).map_err(|error| {
            HttpClientError::InvalidProxy {
                url: proxy.to_owned(),
                error: Box::new(error),
            }
        })?);
    }

    let client = client_builder
        .build()
        .map_err(|error| HttpClientError::Client {
            error: Box::new(error),
        })?;

    debug!("Created HTTP client");

    Ok(HttpClient { client })
}
