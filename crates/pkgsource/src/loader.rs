use crate::cache::TransportCache;
use crate::clients::{
    ContentFetcher, GitCli, GitClient, NpmRegistryClient, RegistryClient,
    create_http_client_with_options,
};
use crate::config::LoaderConfig;
use crate::loader_error::SourceLoaderError;
use crate::protocols::{LoaderProtocol, PackageLoader, PathLoader, RepositoryLoader};
use pkgsource_api::{CommitId, FileContent, LoadOptions};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Collaborators shared by every loader a factory creates.
#[derive(Clone)]
pub struct LoaderContext {
    pub cache: TransportCache,
    pub content: Arc<dyn ContentFetcher>,
    pub registry: Arc<dyn RegistryClient>,
    pub git: Arc<dyn GitClient>,

    /// Identifies the client to the package registry.
    pub user_agent: String,
}

impl fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderContext")
            .field("cache", &self.cache)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// A loader for one of the supported sources.
#[derive(Clone, Debug)]
pub enum SourceLoader {
    Package(PackageLoader),
    Path(PathLoader),
    Repository(RepositoryLoader),
}

impl LoaderProtocol for SourceLoader {
    async fn get_commit(&self) -> Result<CommitId, SourceLoaderError> {
        match self {
            Self::Package(loader) => loader.get_commit().await,
            Self::Path(loader) => loader.get_commit().await,
            Self::Repository(loader) => loader.get_commit().await,
        }
    }

    async fn load_file(
        &self,
        file: &str,
        options: Option<&LoadOptions>,
    ) -> Result<FileContent, SourceLoaderError> {
        match self {
            Self::Package(loader) => loader.load_file(file, options).await,
            Self::Path(loader) => loader.load_file(file, options).await,
            Self::Repository(loader) => loader.load_file(file, options).await,
        }
    }
}

/// Where to load a package's source from. When more than one source
/// is set, a repository wins over a package name, which wins over a path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoaderRequest {
    pub path: Option<PathBuf>,
    pub repository: Option<String>,
    pub package_name: Option<String>,
}

impl LoaderRequest {
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn from_repository<T: AsRef<str>>(repository: T) -> Self {
        Self {
            repository: Some(repository.as_ref().to_owned()),
            ..Default::default()
        }
    }

    pub fn from_package<T: AsRef<str>>(package_name: T) -> Self {
        Self {
            package_name: Some(package_name.as_ref().to_owned()),
            ..Default::default()
        }
    }
}

/// Creates loaders that share one set of clients and one transport cache.
#[derive(Clone, Debug)]
pub struct LoaderFactory {
    context: LoaderContext,
}

impl LoaderFactory {
    /// Create a factory with production clients. Remote payloads are
    /// cached in the process wide [`TransportCache`].
    pub fn new(config: &LoaderConfig) -> Result<Self, SourceLoaderError> {
        debug!(registry = &config.registry_url, "Creating loader factory");

        let http_client = create_http_client_with_options(&config.http, &config.user_agent)?;

        Ok(Self::with_context(LoaderContext {
            cache: TransportCache::global().clone(),
            content: Arc::new(http_client.clone()),
            registry: Arc::new(NpmRegistryClient::new(http_client, &config.registry_url)),
            git: Arc::new(GitCli::new(&config.git_bin)),
            user_agent: config.user_agent.clone(),
        }))
    }

    pub fn with_context(context: LoaderContext) -> Self {
        Self { context }
    }

    /// Create a factory with the provided collaborators and its own cache.
    pub fn with_clients(
        content: Arc<dyn ContentFetcher>,
        registry: Arc<dyn RegistryClient>,
        git: Arc<dyn GitClient>,
    ) -> Self {
        Self::with_context(LoaderContext {
            cache: TransportCache::new(),
            content,
            registry,
            git,
            user_agent: crate::config::default_user_agent(),
        })
    }

    pub fn context(&self) -> &LoaderContext {
        &self.context
    }

    pub fn cache(&self) -> &TransportCache {
        &self.context.cache
    }

    /// Create a loader for the request's highest priority source.
    /// Empty values are treated as absent.
    #[instrument(skip(self))]
    pub async fn create(&self, request: LoaderRequest) -> Result<SourceLoader, SourceLoaderError> {
        let LoaderRequest {
            path,
            repository,
            package_name,
        } = request;

        if let Some(repository) = repository.filter(|value| !value.is_empty()) {
            debug!(repository, "Loading source from repository");

            return Ok(SourceLoader::Repository(RepositoryLoader::new(
                repository,
                self.context.clone(),
            )?));
        }

        if let Some(package) = package_name.filter(|value| !value.is_empty()) {
            debug!(package, "Loading source from package");

            return Ok(SourceLoader::Package(
                PackageLoader::new(package, self.context.clone()).await?,
            ));
        }

        if let Some(path) = path.filter(|value| !value.as_os_str().is_empty()) {
            debug!(path = ?path, "Loading source from path");

            return Ok(SourceLoader::Path(
                PathLoader::new(path, self.context.clone()).await?,
            ));
        }

        Err(SourceLoaderError::MissingSource)
    }

    /// Forget every cached remote payload.
    pub fn clear_cache(&self) {
        self.context.cache.clear();
    }
}
