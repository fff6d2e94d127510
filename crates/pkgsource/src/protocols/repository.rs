use super::{LoaderProtocol, decode_content};
use crate::loader::LoaderContext;
use crate::loader_error::SourceLoaderError;
use pkgsource_api::{CommitId, FileContent, LoadOptions, RepositoryReference};
use tracing::{debug, instrument, trace};

/// Reads files from a remote repository through its raw content endpoint.
#[derive(Clone, Debug)]
pub struct RepositoryLoader {
    pub repository: RepositoryReference,
    context: LoaderContext,
}

impl RepositoryLoader {
    /// Parse the repository, which may be a URL or `owner/name` shorthand.
    /// The hosting provider isn't validated until a file is loaded.
    pub fn new<T: AsRef<str>>(
        repository: T,
        context: LoaderContext,
    ) -> Result<Self, SourceLoaderError> {
        let repository = repository.as_ref();

        trace!(repository, "Creating repository loader");

        let repository = RepositoryReference::parse(repository).map_err(|error| {
            SourceLoaderError::InvalidRepository {
                repository: repository.to_owned(),
                error: Box::new(error),
            }
        })?;

        Ok(Self {
            repository,
            context,
        })
    }

    /// URL of the file's raw content at `HEAD`.
    pub fn create_file_url(&self, file: &str) -> Result<String, SourceLoaderError> {
        self.repository.raw_file_url("HEAD", file).ok_or_else(|| {
            SourceLoaderError::UnsupportedProvider {
                repository: self.repository.source.clone(),
                host: self.repository.provider.host().to_owned(),
            }
        })
    }

    async fn fetch(
        &self,
        file: &str,
        url: &str,
        options: Option<&LoadOptions>,
    ) -> Result<Vec<u8>, SourceLoaderError> {
        match self.context.content.fetch(url, options).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.is_not_found() => {
                debug!(url, "File does not exist in repository");

                Err(SourceLoaderError::FileNotFound {
                    location: self.repository.source.clone(),
                    file: file.to_owned(),
                })
            }
            Err(error) => {
                debug!(url, "Failed to load file");

                Err(error.into())
            }
        }
    }
}

impl LoaderProtocol for RepositoryLoader {
    #[instrument(skip(self), fields(repository = %self.repository))]
    async fn get_commit(&self) -> Result<CommitId, SourceLoaderError> {
        let url = self.repository.http_url();
        let output = self.context.git.list_remote_head(&url).await?;

        match output.split_whitespace().next() {
            Some(hash) => {
                trace!(url, hash, "Resolved remote HEAD");

                Ok(CommitId::raw(hash))
            }
            None => Err(SourceLoaderError::MissingRemoteHead { url }),
        }
    }

    #[instrument(skip(self, options), fields(repository = %self.repository))]
    async fn load_file(
        &self,
        file: &str,
        options: Option<&LoadOptions>,
    ) -> Result<FileContent, SourceLoaderError> {
        let url = self.create_file_url(file)?;

        // Customized reads never touch the cache
        if options.is_none() {
            if let Some(bytes) = self.context.cache.get(&url).await {
                trace!(url, "Loaded file from cache");

                return Ok(FileContent::Bytes(bytes));
            }
        }

        debug!(url, "Loading file");

        let bytes = self.fetch(file, &url, options).await?;

        trace!(url, size = bytes.len(), "Loaded file");

        if options.is_none() {
            self.context.cache.set(&url, bytes.clone()).await;
        }

        decode_content(file, bytes, options)
    }
}
