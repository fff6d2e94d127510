use super::{HttpClient, HttpClientError};
use async_trait::async_trait;
use reqwest::header;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, trace};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

// https://github.com/npm/registry/blob/main/docs/responses/package-metadata.md
const ABBREVIATED_ACCEPT: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";
const FULL_ACCEPT: &str = "application/json";

#[derive(Clone, Debug, Default)]
pub struct MetadataOptions {
    /// Request the complete document instead of the abbreviated install metadata.
    pub full_metadata: bool,

    /// Identifies the client to the registry.
    pub user_agent: Option<String>,
}

/// Fetches package metadata documents from a package registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetch the metadata for a `name@tag` (or `name@version`) spec. A missing
    /// package must be reported as [`HttpClientError::NotFound`].
    async fn fetch_metadata(
        &self,
        spec: &str,
        options: &MetadataOptions,
    ) -> Result<JsonValue, HttpClientError>;
}

/// Split `name@tag` into its parts, taking scoped names into account.
pub fn split_package_spec(spec: &str) -> (&str, &str) {
    match spec.rfind('@') {
        Some(index) if index > 0 => (&spec[0..index], &spec[index + 1..]),
        _ => (spec, "latest"),
    }
}

/// Client for npm compatible registries.
#[derive(Clone, Debug)]
pub struct NpmRegistryClient {
    pub client: HttpClient,
    pub registry_url: String,
}

impl NpmRegistryClient {
    pub fn new<U: AsRef<str>>(client: HttpClient, registry_url: U) -> Self {
        Self {
            client,
            registry_url: registry_url.as_ref().trim_end_matches('/').to_owned(),
        }
    }

    /// URL of a package's packument. Scoped names keep their `@`
    /// but have their slash escaped.
    pub fn create_packument_url(&self, name: &str) -> String {
        format!("{}/{}", self.registry_url, name.replace('/', "%2f"))
    }
}

/// Pick the version document a tag (or exact version) points to, falling
/// back to the packument itself, which carries the latest repository field.
pub fn select_version_document(packument: JsonValue, tag: &str) -> JsonValue {
    let version = packument
        .get("dist-tags")
        .and_then(|tags| tags.get(tag))
        .and_then(|version| version.as_str())
        .unwrap_or(tag)
        .to_owned();

    match packument
        .get("versions")
        .and_then(|versions| versions.get(&version))
    {
        Some(document) => document.to_owned(),
        None => packument,
    }
}

#[async_trait]
impl RegistryClient for NpmRegistryClient {
    #[instrument(skip(self))]
    async fn fetch_metadata(
        &self,
        spec: &str,
        options: &MetadataOptions,
    ) -> Result<JsonValue, HttpClientError> {
        let (name, tag) = split_package_spec(spec);
        let url = self.create_packument_url(name);

        debug!(package = name, tag, url = &url, "Fetching package metadata");

        let mut request = self.client.get(&url).header(
            header::ACCEPT,
            if options.full_metadata {
                FULL_ACCEPT
            } else {
                ABBREVIATED_ACCEPT
            },
        );

        if let Some(user_agent) = &options.user_agent {
            request = request.header(header::USER_AGENT, user_agent);
        }

        let response = HttpClient::send(&url, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|error| HttpClient::map_error(url.clone(), error))?;

        let packument: JsonValue =
            serde_json::from_slice(&bytes).map_err(|error| HttpClientError::InvalidResponse {
                url: url.clone(),
                error: Box::new(error),
            })?;

        trace!(package = name, tag, "Fetched package metadata");

        Ok(select_version_document(packument, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_specs() {
        assert_eq!(split_package_spec("left-pad@latest"), ("left-pad", "latest"));
        assert_eq!(split_package_spec("left-pad@1.3.0"), ("left-pad", "1.3.0"));
        assert_eq!(split_package_spec("left-pad"), ("left-pad", "latest"));
        assert_eq!(
            split_package_spec("@hapi/hoek@latest"),
            ("@hapi/hoek", "latest")
        );
        assert_eq!(split_package_spec("@hapi/hoek"), ("@hapi/hoek", "latest"));
    }

    #[test]
    fn escapes_scoped_names() {
        let client = NpmRegistryClient::new(HttpClient::default(), "https://registry.example.com/");

        assert_eq!(
            client.create_packument_url("@hapi/hoek"),
            "https://registry.example.com/@hapi%2fhoek"
        );
        assert_eq!(
            client.create_packument_url("left-pad"),
            "https://registry.example.com/left-pad"
        );
    }

    #[test]
    fn selects_tagged_version() {
        let packument = json!({
            "name": "left-pad",
            "dist-tags": { "latest": "1.3.0" },
            "versions": {
                "1.2.0": { "name": "left-pad", "repository": "old/left-pad" },
                "1.3.0": { "name": "left-pad", "repository": "foo/left-pad" },
            },
        });

        assert_eq!(
            select_version_document(packument.clone(), "latest")["repository"],
            "foo/left-pad"
        );
        assert_eq!(
            select_version_document(packument, "1.2.0")["repository"],
            "old/left-pad"
        );
    }

    #[test]
    fn falls_back_to_packument() {
        let packument = json!({ "name": "left-pad", "repository": "foo/left-pad" });

        assert_eq!(select_version_document(packument.clone(), "latest"), packument);
    }
}
