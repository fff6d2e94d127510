//! In-memory collaborators for exercising loaders without network or git.

use crate::clients::{
    ContentFetcher, GitClient, GitClientError, HttpClientError, MetadataOptions, RegistryClient,
    select_version_document, split_package_spec,
};
use async_trait::async_trait;
use pkgsource_api::{CommitId, GITHUB_RAW_CONTENT_URL, LoadOptions};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// URL a GitHub repository's file is fetched from at `HEAD`.
pub fn raw_github_url(full_name: &str, file: &str) -> String {
    format!("{GITHUB_RAW_CONTENT_URL}/{full_name}/HEAD/{file}")
}

#[derive(Clone, Debug)]
pub enum MockResponse {
    Body(Vec<u8>),
    NotFound,
    Status(u16),
}

/// Serves canned responses per URL and records every request made.
/// URLs without a response are treated as missing.
#[derive(Debug, Default)]
pub struct MockContentFetcher {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<(String, Option<LoadOptions>)>>,
}

impl MockContentFetcher {
    pub fn with_body<U: AsRef<str>, B: AsRef<[u8]>>(mut self, url: U, body: B) -> Self {
        self.responses.insert(
            url.as_ref().to_owned(),
            MockResponse::Body(body.as_ref().to_vec()),
        );
        self
    }

    pub fn with_response<U: AsRef<str>>(mut self, url: U, response: MockResponse) -> Self {
        self.responses.insert(url.as_ref().to_owned(), response);
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Options passed with the most recent request.
    pub fn last_options(&self) -> Option<LoadOptions> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|(_, options)| options.clone())
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(requested, _)| requested == url)
            .count()
    }
}

#[async_trait]
impl ContentFetcher for MockContentFetcher {
    async fn fetch(
        &self,
        url: &str,
        options: Option<&LoadOptions>,
    ) -> Result<Vec<u8>, HttpClientError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_owned(), options.cloned()));

        match self.responses.get(url) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(HttpClientError::Status {
                url: url.to_owned(),
                status: *status,
            }),
            Some(MockResponse::NotFound) | None => Err(HttpClientError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}

/// Serves packuments (or plain version documents) by package name.
#[derive(Debug, Default)]
pub struct MockRegistryClient {
    packages: HashMap<String, JsonValue>,
    requests: Mutex<Vec<(String, MetadataOptions)>>,
}

impl MockRegistryClient {
    pub fn with_package<T: AsRef<str>>(mut self, name: T, document: JsonValue) -> Self {
        self.packages.insert(name.as_ref().to_owned(), document);
        self
    }

    /// Every spec requested so far, along with its options.
    pub fn requests(&self) -> Vec<(String, MetadataOptions)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn fetch_metadata(
        &self,
        spec: &str,
        options: &MetadataOptions,
    ) -> Result<JsonValue, HttpClientError> {
        self.requests
            .lock()
            .unwrap()
            .push((spec.to_owned(), options.clone()));

        let (name, tag) = split_package_spec(spec);

        match self.packages.get(name) {
            Some(document) => Ok(select_version_document(document.clone(), tag)),
            None => Err(HttpClientError::NotFound {
                url: format!("mock://registry/{name}"),
            }),
        }
    }
}

/// Treats registered directories as working copies and
/// answers remote `HEAD` lookups from a table.
#[derive(Debug, Default)]
pub struct MockGitClient {
    checkouts: HashMap<PathBuf, CommitId>,
    remotes: HashMap<String, String>,
    remote_requests: Mutex<Vec<String>>,
}

impl MockGitClient {
    pub fn with_checkout<P: AsRef<Path>, C: AsRef<str>>(mut self, dir: P, revision: C) -> Self {
        self.checkouts
            .insert(dir.as_ref().to_path_buf(), CommitId::raw(revision));
        self
    }

    /// Register the raw `ls-remote` output for a remote URL.
    pub fn with_remote<U: AsRef<str>, O: AsRef<str>>(mut self, url: U, output: O) -> Self {
        self.remotes
            .insert(url.as_ref().to_owned(), output.as_ref().to_owned());
        self
    }

    pub fn remote_requests(&self) -> Vec<String> {
        self.remote_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitClient for MockGitClient {
    async fn is_repository(&self, dir: &Path) -> Result<bool, GitClientError> {
        Ok(self.checkouts.contains_key(dir))
    }

    async fn current_revision(&self, dir: &Path) -> Result<CommitId, GitClientError> {
        self.checkouts
            .get(dir)
            .cloned()
            .ok_or_else(|| GitClientError::Failed {
                command: "git rev-parse HEAD".into(),
                dir: dir.to_path_buf(),
                stderr: "fatal: not a git repository".into(),
            })
    }

    async fn list_remote_head(&self, url: &str) -> Result<String, GitClientError> {
        self.remote_requests.lock().unwrap().push(url.to_owned());

        self.remotes
            .get(url)
            .cloned()
            .ok_or_else(|| GitClientError::Failed {
                command: format!("git ls-remote {url} HEAD"),
                dir: PathBuf::from("."),
                stderr: format!("fatal: repository '{url}' not found"),
            })
    }
}
