use crate::repository_error::RepositoryReferenceError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use url::Url;

pub const GITHUB_HOST: &str = "github.com";
pub const GITHUB_RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

/// The service hosting a repository. Only GitHub is able to serve
/// raw file content, every other host is carried along as-is.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum HostingProvider {
    GitHub,
    Other(String),
}

impl HostingProvider {
    pub fn from_host(host: &str) -> HostingProvider {
        let host = host.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        if host == GITHUB_HOST {
            HostingProvider::GitHub
        } else {
            HostingProvider::Other(host.to_owned())
        }
    }

    pub fn host(&self) -> &str {
        match self {
            HostingProvider::GitHub => GITHUB_HOST,
            HostingProvider::Other(host) => host,
        }
    }

    /// Base URL for non-rendered file content, if the provider has one.
    pub fn raw_content_url(&self) -> Option<&str> {
        match self {
            HostingProvider::GitHub => Some(GITHUB_RAW_CONTENT_URL),
            HostingProvider::Other(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, HostingProvider::GitHub)
    }
}

impl Display for HostingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host())
    }
}

/// A normalized reference to a source repository.
///
/// Accepts `owner/name` shorthand (which always refers to GitHub),
/// npm style `github:owner/name` shorthand, scp style `git@host:owner/name`,
/// and full `https`, `http`, `git`, `ssh`, `git+https`, and `git+ssh` URLs.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(into = "String", try_from = "String")]
pub struct RepositoryReference {
    /// The value this reference was parsed from, as provided.
    pub source: String,

    pub provider: HostingProvider,

    /// Owning user or organization.
    pub owner: String,

    pub name: String,
}

impl RepositoryReference {
    pub fn parse<T: AsRef<str>>(value: T) -> Result<Self, RepositoryReferenceError> {
        Self::try_from(value.as_ref().to_owned())
    }

    /// Owner and name joined with a slash: `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The HTTPS form of the repository, suitable for `git ls-remote`.
    pub fn http_url(&self) -> String {
        format!("https://{}/{}/{}", self.provider.host(), self.owner, self.name)
    }

    /// URL of a file's raw content at the provided revision,
    /// or `None` if the provider can't serve raw content.
    pub fn raw_file_url(&self, revision: &str, file: &str) -> Option<String> {
        self.provider.raw_content_url().map(|base| {
            format!(
                "{base}/{}/{revision}/{}",
                self.full_name(),
                file.trim_start_matches('/')
            )
        })
    }
}

fn expand_shorthand(value: &str) -> String {
    // npm style provider shorthand
    for (prefix, host) in [
        ("github:", GITHUB_HOST),
        ("gitlab:", "gitlab.com"),
        ("bitbucket:", "bitbucket.org"),
    ] {
        if let Some(slug) = value.strip_prefix(prefix) {
            return format!("https://{host}/{slug}");
        }
    }

    if !value.contains(':') && value.split('/').count() == 2 {
        return format!("https://{GITHUB_HOST}/{value}");
    }

    value.to_owned()
}

fn split_host_and_path(value: &str) -> Result<(String, String), RepositoryReferenceError> {
    // scp style: git@github.com:owner/name.git
    if !value.contains("://") {
        let Some((login, path)) = value.split_once(':') else {
            return Err(RepositoryReferenceError::MissingHost {
                value: value.to_owned(),
            });
        };

        let host = login.rsplit('@').next().unwrap_or_default();

        if host.is_empty() {
            return Err(RepositoryReferenceError::MissingHost {
                value: value.to_owned(),
            });
        }

        return Ok((host.to_owned(), path.to_owned()));
    }

    let url = Url::parse(value.strip_prefix("git+").unwrap_or(value)).map_err(|error| {
        RepositoryReferenceError::InvalidUrl {
            value: value.to_owned(),
            error,
        }
    })?;

    match url.scheme() {
        "http" | "https" | "git" | "ssh" => {}
        unknown => return Err(RepositoryReferenceError::UnknownProtocol(unknown.to_owned())),
    };

    let Some(host) = url.host_str() else {
        return Err(RepositoryReferenceError::MissingHost {
            value: value.to_owned(),
        });
    };

    Ok((host.to_owned(), url.path().to_owned()))
}

impl Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.http_url())
    }
}

impl FromStr for RepositoryReference {
    type Err = RepositoryReferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RepositoryReference::try_from(value.to_owned())
    }
}

impl TryFrom<String> for RepositoryReference {
    type Error = RepositoryReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let source = value.trim();

        if source.is_empty() {
            return Err(RepositoryReferenceError::Empty);
        }

        let (host, path) = split_host_and_path(&expand_shorthand(source))?;

        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let owner = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default();
        let name = name.strip_suffix(".git").unwrap_or(name);

        if owner.is_empty() || name.is_empty() {
            return Err(RepositoryReferenceError::MissingSlug {
                value: source.to_owned(),
            });
        }

        Ok(RepositoryReference {
            source: source.to_owned(),
            provider: HostingProvider::from_host(&host),
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl From<RepositoryReference> for String {
    fn from(reference: RepositoryReference) -> Self {
        reference.source
    }
}
