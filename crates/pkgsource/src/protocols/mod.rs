mod package;
mod path;
mod repository;

pub use package::*;
pub use path::*;
pub use repository::*;

use crate::loader_error::SourceLoaderError;
use pkgsource_api::{CommitId, FileContent, LoadOptions};

/// A source of truth that files and the current revision can be read from.
pub trait LoaderProtocol {
    /// Resolve the revision the source currently points to.
    async fn get_commit(&self) -> Result<CommitId, SourceLoaderError>;

    /// Read a file relative to the root of the source.
    async fn load_file(
        &self,
        file: &str,
        options: Option<&LoadOptions>,
    ) -> Result<FileContent, SourceLoaderError>;
}

pub(crate) fn decode_content(
    file: &str,
    bytes: Vec<u8>,
    options: Option<&LoadOptions>,
) -> Result<FileContent, SourceLoaderError> {
    let json = options.is_some_and(|options| options.json);

    FileContent::decode(bytes, json).map_err(|error| SourceLoaderError::InvalidJson {
        file: file.to_owned(),
        error: Box::new(error),
    })
}
