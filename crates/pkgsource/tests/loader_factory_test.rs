use pkgsource::test_utils::*;
use pkgsource::{LoaderConfig, LoaderFactory, LoaderRequest, SourceLoader, SourceLoaderError};
use serde_json::json;
use starbase_sandbox::create_empty_sandbox;
use std::path::PathBuf;
use std::sync::Arc;

fn create_factory(checkout: PathBuf) -> LoaderFactory {
    LoaderFactory::with_clients(
        Arc::new(MockContentFetcher::default()),
        Arc::new(MockRegistryClient::default().with_package(
            "left-pad",
            json!({ "name": "left-pad", "repository": "foo/left-pad" }),
        )),
        Arc::new(MockGitClient::default().with_checkout(checkout, "abc123")),
    )
}

mod loader_factory {
    use super::*;

    #[tokio::test]
    async fn repository_takes_priority() {
        let sandbox = create_empty_sandbox();
        sandbox.create_file("package.json", "{}");

        let factory = create_factory(sandbox.path().to_path_buf());
        let loader = factory
            .create(LoaderRequest {
                path: Some(sandbox.path().to_path_buf()),
                repository: Some("foo/bar".into()),
                package_name: Some("left-pad".into()),
            })
            .await
            .unwrap();

        assert!(matches!(loader, SourceLoader::Repository(_)));
    }

    #[tokio::test]
    async fn package_takes_priority_over_path() {
        let sandbox = create_empty_sandbox();
        sandbox.create_file("package.json", "{}");

        let factory = create_factory(sandbox.path().to_path_buf());
        let loader = factory
            .create(LoaderRequest {
                path: Some(sandbox.path().to_path_buf()),
                repository: None,
                package_name: Some("left-pad".into()),
            })
            .await
            .unwrap();

        assert!(matches!(loader, SourceLoader::Package(_)));
    }

    #[tokio::test]
    async fn falls_back_to_path() {
        let sandbox = create_empty_sandbox();
        sandbox.create_file("package.json", "{}");

        let factory = create_factory(sandbox.path().to_path_buf());
        let loader = factory
            .create(LoaderRequest {
                path: Some(sandbox.path().to_path_buf()),
                repository: Some(String::new()),
                package_name: Some(String::new()),
            })
            .await
            .unwrap();

        assert!(matches!(loader, SourceLoader::Path(_)));
    }

    #[tokio::test]
    async fn errors_without_source() {
        let factory = create_factory(PathBuf::from("/unused"));

        for request in [
            LoaderRequest::default(),
            LoaderRequest {
                path: Some(PathBuf::new()),
                repository: Some(String::new()),
                package_name: Some(String::new()),
            },
        ] {
            assert!(matches!(
                factory.create(request).await.unwrap_err(),
                SourceLoaderError::MissingSource
            ));
        }
    }

    #[tokio::test]
    async fn uses_an_isolated_cache() {
        let one = create_factory(PathBuf::from("/unused"));
        let two = create_factory(PathBuf::from("/unused"));

        one.cache().set("https://example.com/file", vec![1]).await;

        assert!(!two.cache().contains("https://example.com/file"));

        one.clear_cache();

        assert!(one.cache().is_empty());
    }

    #[test]
    fn creates_production_clients() {
        let factory = LoaderFactory::new(&LoaderConfig::default()).unwrap();

        assert!(factory.context().user_agent.starts_with("pkgsource@"));
    }
}
