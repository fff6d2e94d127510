use crate::clients::{GitClientError, HttpClientError};
use miette::Diagnostic;
use pkgsource_api::RepositoryReferenceError;
use starbase_styles::{Style, Stylize};
use starbase_utils::fs::FsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating a package's source or reading from it.
#[derive(Debug, Diagnostic, Error)]
pub enum SourceLoaderError {
    #[diagnostic(transparent)]
    #[error(transparent)]
    Fs(#[from] Box<FsError>),

    #[diagnostic(transparent)]
    #[error(transparent)]
    Git(#[from] Box<GitClientError>),

    #[diagnostic(transparent)]
    #[error(transparent)]
    Http(#[from] Box<HttpClientError>),

    #[diagnostic(code(source::loader::invalid_repository))]
    #[error("Invalid repository {}.", .repository.style(Style::Url))]
    InvalidRepository {
        repository: String,
        #[source]
        error: Box<RepositoryReferenceError>,
    },

    #[diagnostic(
        code(source::loader::unsupported_provider),
        help = "Support for other hosts can be requested at https://github.com/pkgsource/pkgsource/issues"
    )]
    #[error(
        "Repository {} is hosted on {}, only GitHub repositories are currently supported.",
        .repository.style(Style::Url),
        .host.style(Style::Id),
    )]
    UnsupportedProvider { repository: String, host: String },

    #[diagnostic(code(source::loader::not_a_repository))]
    #[error("{} is not a git repository.", .path.style(Style::Path))]
    NotARepository { path: PathBuf },

    #[diagnostic(code(source::loader::missing_manifest))]
    #[error(
        "{} does not contain a {}.",
        .path.style(Style::Path),
        "package.json".style(Style::File),
    )]
    MissingManifest { path: PathBuf },

    #[diagnostic(code(source::loader::package_not_found))]
    #[error("Package {} does not exist.", .package.style(Style::Id))]
    PackageNotFound { package: String },

    #[diagnostic(
        code(source::loader::undeterminable_repository),
        help = "The package's manifest must declare a repository field."
    )]
    #[error(
        "Unable to determine the git repository for {}.",
        .package.style(Style::Id),
    )]
    UndeterminableRepository { package: String },

    #[diagnostic(
        code(source::loader::monorepo_not_supported),
        help = "Monorepo support is tracked at https://github.com/pkgsource/pkgsource/issues"
    )]
    #[error(
        "Repository {} does not declare package {} in its root manifest. Monorepos are not supported.",
        .repository.style(Style::Url),
        .package.style(Style::Id),
    )]
    MonorepoNotSupported { repository: String, package: String },

    #[diagnostic(code(source::loader::file_not_found))]
    #[error(
        "{} does not contain a {}.",
        .location.style(Style::Url),
        .file.style(Style::File),
    )]
    FileNotFound { location: String, file: String },

    #[diagnostic(code(source::loader::invalid_json))]
    #[error("Failed to parse {} as JSON.", .file.style(Style::File))]
    InvalidJson {
        file: String,
        #[source]
        error: Box<serde_json::Error>,
    },

    #[diagnostic(code(source::loader::missing_remote_head))]
    #[error("Remote {} did not report a HEAD revision.", .url.style(Style::Url))]
    MissingRemoteHead { url: String },

    #[diagnostic(
        code(source::loader::missing_source),
        help = "Provide a path, a repository, or a package name."
    )]
    #[error("Unable to create a loader, no source was provided.")]
    MissingSource,
}

impl SourceLoaderError {
    /// Whether the requested file is absent from the source.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceLoaderError::FileNotFound { .. })
    }

    /// The system error code equivalent of this error, if any.
    pub fn io_code(&self) -> Option<&'static str> {
        if self.is_not_found() {
            Some("ENOENT")
        } else {
            None
        }
    }
}

impl From<FsError> for SourceLoaderError {
    fn from(e: FsError) -> SourceLoaderError {
        SourceLoaderError::Fs(Box::new(e))
    }
}

impl From<GitClientError> for SourceLoaderError {
    fn from(e: GitClientError) -> SourceLoaderError {
        SourceLoaderError::Git(Box::new(e))
    }
}

impl From<HttpClientError> for SourceLoaderError {
    fn from(e: HttpClientError) -> SourceLoaderError {
        SourceLoaderError::Http(Box::new(e))
    }
}
