use super::{LoaderProtocol, decode_content};
use crate::loader::LoaderContext;
use crate::loader_error::SourceLoaderError;
use pkgsource_api::{CommitId, FileContent, LoadOptions, MANIFEST_NAME};
use starbase_utils::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

/// Reads files from a local git checkout.
#[derive(Clone, Debug)]
pub struct PathLoader {
    pub dir: PathBuf,
    context: LoaderContext,
}

impl PathLoader {
    /// Create a loader for the directory, which must be a git working copy
    /// with a manifest at its root.
    pub async fn new<P: AsRef<Path>>(
        dir: P,
        context: LoaderContext,
    ) -> Result<Self, SourceLoaderError> {
        let dir = dir.as_ref();

        trace!(dir = ?dir, "Creating path loader");

        if !context.git.is_repository(dir).await? {
            return Err(SourceLoaderError::NotARepository {
                path: dir.to_path_buf(),
            });
        }

        if !dir.join(MANIFEST_NAME).exists() {
            return Err(SourceLoaderError::MissingManifest {
                path: dir.to_path_buf(),
            });
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            context,
        })
    }
}

impl LoaderProtocol for PathLoader {
    #[instrument(skip(self), fields(dir = ?self.dir))]
    async fn get_commit(&self) -> Result<CommitId, SourceLoaderError> {
        Ok(self.context.git.current_revision(&self.dir).await?)
    }

    #[instrument(skip(self, options), fields(dir = ?self.dir))]
    async fn load_file(
        &self,
        file: &str,
        options: Option<&LoadOptions>,
    ) -> Result<FileContent, SourceLoaderError> {
        // Files are always relative to the checkout
        let path = self.dir.join(file.trim_start_matches(['/', '\\']));

        if !path.exists() {
            debug!(path = ?path, "File does not exist in directory");

            return Err(SourceLoaderError::FileNotFound {
                location: self.dir.to_string_lossy().into_owned(),
                file: file.to_owned(),
            });
        }

        let bytes = fs::read_file_bytes(&path)?;

        trace!(path = ?path, size = bytes.len(), "Loaded file");

        decode_content(file, bytes, options)
    }
}
