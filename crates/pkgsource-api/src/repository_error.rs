/// Errors during repository reference parsing.
#[derive(thiserror::Error, Debug)]
pub enum RepositoryReferenceError {
    #[error("Missing repository, an empty value was provided.")]
    Empty,

    #[error("Invalid repository URL `{value}`.")]
    InvalidUrl {
        value: String,
        #[source]
        error: url::ParseError,
    },

    #[error("Repository `{value}` is missing a host.")]
    MissingHost { value: String },

    #[error("Repository `{value}` requires an owner and a name (owner/name).")]
    MissingSlug { value: String },

    #[error("Unknown repository protocol `{0}`.")]
    UnknownProtocol(String),
}
