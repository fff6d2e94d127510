use crate::clients::{DEFAULT_REGISTRY_URL, HttpOptions};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{trace, warn};

/// Identifies this library to remote services: `name@version, see homepage`.
pub fn default_user_agent() -> String {
    format!(
        "{}@{}, see {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_HOMEPAGE")
    )
}

/// Settings for the clients a loader factory creates.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoaderConfig {
    /// Base URL of the package registry.
    pub registry_url: String,

    /// The git binary to execute.
    pub git_bin: String,

    /// Value of the `User-Agent` header for registry requests.
    pub user_agent: String,

    pub http: HttpOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_owned(),
            git_bin: "git".to_owned(),
            user_agent: default_user_agent(),
            http: HttpOptions::default(),
        }
    }
}

impl LoaderConfig {
    /// Defaults with `PKGSOURCE_*` environment variable overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("PKGSOURCE_REGISTRY") {
            if !url.is_empty() {
                trace!(url, "Using registry from environment");

                config.registry_url = url;
            }
        }

        if let Ok(bin) = env::var("PKGSOURCE_GIT") {
            if !bin.is_empty() {
                trace!(bin, "Using git binary from environment");

                config.git_bin = bin;
            }
        }

        if let Ok(timeout) = env::var("PKGSOURCE_HTTP_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(timeout) => {
                    config.http.timeout = Some(timeout);
                }
                Err(_) => {
                    warn!(
                        timeout,
                        "Invalid PKGSOURCE_HTTP_TIMEOUT, expected a number of seconds"
                    );
                }
            };
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_the_package() {
        let agent = default_user_agent();

        assert!(agent.starts_with("pkgsource@"));
        assert!(agent.contains(", see https://"));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: LoaderConfig = serde_json::from_str(
            r#"{ "registry-url": "https://npm.example.com", "http": { "timeout": 5 } }"#,
        )
        .unwrap();

        assert_eq!(config.registry_url, "https://npm.example.com");
        assert_eq!(config.git_bin, "git");
        assert_eq!(config.http.timeout, Some(5));
        assert_eq!(config.user_agent, default_user_agent());
    }
}
