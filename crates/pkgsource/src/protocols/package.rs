use super::{LoaderProtocol, RepositoryLoader};
use crate::clients::MetadataOptions;
use crate::loader::LoaderContext;
use crate::loader_error::SourceLoaderError;
use pkgsource_api::{CommitId, FileContent, LoadOptions, MANIFEST_NAME};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, trace};

/// Extract the repository a package's metadata points to. Accepts either
/// a plain string, or an object with a string `url` property.
pub fn extract_repository(
    package: &str,
    metadata: &JsonValue,
) -> Result<String, SourceLoaderError> {
    let repository = match metadata.get("repository") {
        Some(JsonValue::String(repository)) => Some(repository.as_str()),
        Some(JsonValue::Object(repository)) => repository.get("url").and_then(|url| url.as_str()),
        _ => None,
    };

    match repository {
        Some(repository) if !repository.trim().is_empty() => Ok(repository.to_owned()),
        _ => Err(SourceLoaderError::UndeterminableRepository {
            package: package.to_owned(),
        }),
    }
}

/// Reads files from the repository a published package declares,
/// verifying that the repository's manifest belongs to the package.
#[derive(Clone, Debug)]
pub struct PackageLoader {
    pub package: String,
    pub loader: RepositoryLoader,
}

impl PackageLoader {
    pub async fn new<T: AsRef<str>>(
        package: T,
        context: LoaderContext,
    ) -> Result<Self, SourceLoaderError> {
        let package = package.as_ref();

        debug!(package, "Resolving package repository");

        let metadata = context
            .registry
            .fetch_metadata(
                &format!("{package}@latest"),
                &MetadataOptions {
                    full_metadata: true,
                    user_agent: Some(context.user_agent.clone()),
                },
            )
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    SourceLoaderError::PackageNotFound {
                        package: package.to_owned(),
                    }
                } else {
                    error.into()
                }
            })?;

        let repository = extract_repository(package, &metadata)?;

        trace!(package, repository, "Resolved package repository");

        Ok(Self {
            package: package.to_owned(),
            loader: RepositoryLoader::new(repository, context)?,
        })
    }
}

impl LoaderProtocol for PackageLoader {
    async fn get_commit(&self) -> Result<CommitId, SourceLoaderError> {
        self.loader.get_commit().await
    }

    #[instrument(skip(self, options), fields(package = %self.package))]
    async fn load_file(
        &self,
        file: &str,
        options: Option<&LoadOptions>,
    ) -> Result<FileContent, SourceLoaderError> {
        let content = self.loader.load_file(file, options).await?;

        if file == MANIFEST_NAME
            && content.declared_name().as_deref() != Some(self.package.as_str())
        {
            debug!(
                package = self.package,
                declared = ?content.declared_name(),
                "Repository manifest belongs to another package"
            );

            return Err(SourceLoaderError::MonorepoNotSupported {
                repository: self.loader.repository.source.clone(),
                package: self.package.clone(),
            });
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_string_repository() {
        assert_eq!(
            extract_repository("left-pad", &json!({ "repository": "foo/left-pad" })).unwrap(),
            "foo/left-pad"
        );
    }

    #[test]
    fn extracts_object_repository() {
        assert_eq!(
            extract_repository(
                "left-pad",
                &json!({ "repository": { "type": "git", "url": "git+https://github.com/foo/left-pad.git" } })
            )
            .unwrap(),
            "git+https://github.com/foo/left-pad.git"
        );
    }

    #[test]
    fn errors_without_repository() {
        for metadata in [
            json!({}),
            json!({ "repository": { "type": "git" } }),
            json!({ "repository": { "url": 1 } }),
            json!({ "repository": "" }),
        ] {
            assert!(matches!(
                extract_repository("left-pad", &metadata),
                Err(SourceLoaderError::UndeterminableRepository { .. })
            ));
        }
    }
}
