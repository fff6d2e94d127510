use pkgsource_api::{FileContent, HostingProvider, LoadOptions, RepositoryReference};

mod repository {
    use super::*;

    #[test]
    #[should_panic(expected = "Empty")]
    fn errors_empty() {
        RepositoryReference::parse("  ").unwrap();
    }

    #[test]
    #[should_panic(expected = "MissingSlug")]
    fn errors_missing_name() {
        RepositoryReference::parse("https://github.com/foo").unwrap();
    }

    #[test]
    #[should_panic(expected = "UnknownProtocol(\"ftp\")")]
    fn errors_unknown_protocol() {
        RepositoryReference::parse("ftp://github.com/foo/bar").unwrap();
    }

    #[test]
    #[should_panic(expected = "MissingHost")]
    fn errors_missing_host() {
        RepositoryReference::parse("not-a-repository").unwrap();
    }

    #[test]
    fn displays_as_http_url() {
        assert_eq!(
            RepositoryReference::parse("git@github.com:foo/bar.git")
                .unwrap()
                .to_string(),
            "https://github.com/foo/bar"
        );
    }

    #[test]
    fn keeps_source_as_provided() {
        let reference = RepositoryReference::parse("foo/bar").unwrap();

        assert_eq!(reference.source, "foo/bar");
        assert_eq!(String::from(reference), "foo/bar");
    }

    mod shorthand {
        use super::*;

        #[test]
        fn expands_to_github() {
            let reference = RepositoryReference::parse("foo/left-pad").unwrap();

            assert_eq!(reference.provider, HostingProvider::GitHub);
            assert_eq!(reference.owner, "foo");
            assert_eq!(reference.name, "left-pad");
        }

        #[test]
        fn matches_expanded_url() {
            for slug in ["foo/bar", "pkgjs/detect-node-support", "a/b.js"] {
                let short = RepositoryReference::parse(slug).unwrap();
                let full = RepositoryReference::parse(format!("https://github.com/{slug}")).unwrap();

                assert_eq!(short.provider, full.provider);
                assert_eq!(short.owner, full.owner);
                assert_eq!(short.name, full.name);
                assert_eq!(short.http_url(), full.http_url());
            }
        }

        #[test]
        fn supports_provider_prefixes() {
            let github = RepositoryReference::parse("github:foo/bar").unwrap();

            assert_eq!(github.provider, HostingProvider::GitHub);
            assert_eq!(github.full_name(), "foo/bar");

            let gitlab = RepositoryReference::parse("gitlab:foo/bar").unwrap();

            assert_eq!(gitlab.provider, HostingProvider::Other("gitlab.com".into()));
            assert_eq!(gitlab.http_url(), "https://gitlab.com/foo/bar");
        }
    }

    mod urls {
        use super::*;

        #[test]
        fn parses_https() {
            let reference = RepositoryReference::parse("https://github.com/foo/bar").unwrap();

            assert_eq!(reference.provider, HostingProvider::GitHub);
            assert_eq!(reference.full_name(), "foo/bar");
        }

        #[test]
        fn parses_git_plus_https_with_suffix() {
            let reference =
                RepositoryReference::parse("git+https://github.com/foo/bar.git").unwrap();

            assert_eq!(reference.provider, HostingProvider::GitHub);
            assert_eq!(reference.name, "bar");
        }

        #[test]
        fn parses_git_plus_ssh() {
            let reference =
                RepositoryReference::parse("git+ssh://git@github.com/foo/bar.git").unwrap();

            assert_eq!(reference.full_name(), "foo/bar");
            assert_eq!(reference.http_url(), "https://github.com/foo/bar");
        }

        #[test]
        fn parses_git_protocol() {
            let reference = RepositoryReference::parse("git://github.com/foo/bar.git").unwrap();

            assert_eq!(reference.full_name(), "foo/bar");
        }

        #[test]
        fn parses_scp_style() {
            let reference = RepositoryReference::parse("git@gitlab.com:foo/bar.git").unwrap();

            assert_eq!(reference.provider, HostingProvider::Other("gitlab.com".into()));
            assert_eq!(reference.full_name(), "foo/bar");
        }

        #[test]
        fn ignores_trailing_segments() {
            let reference =
                RepositoryReference::parse("https://github.com/foo/bar/tree/main/packages/baz")
                    .unwrap();

            assert_eq!(reference.full_name(), "foo/bar");
        }

        #[test]
        fn normalizes_www_host() {
            let reference = RepositoryReference::parse("https://www.GitHub.com/foo/bar").unwrap();

            assert_eq!(reference.provider, HostingProvider::GitHub);
        }

        #[test]
        fn keeps_other_hosts() {
            let reference = RepositoryReference::parse("https://bitbucket.org/foo/bar").unwrap();

            assert!(!reference.provider.is_supported());
            assert_eq!(reference.provider.host(), "bitbucket.org");
        }
    }

    mod raw_urls {
        use super::*;

        #[test]
        fn creates_github_raw_url() {
            let reference = RepositoryReference::parse("foo/left-pad").unwrap();

            assert_eq!(
                reference.raw_file_url("HEAD", "index.js").unwrap(),
                "https://raw.githubusercontent.com/foo/left-pad/HEAD/index.js"
            );
        }

        #[test]
        fn supports_nested_files() {
            let reference = RepositoryReference::parse("foo/bar").unwrap();

            assert_eq!(
                reference.raw_file_url("HEAD", "/.github/workflows/ci.yml").unwrap(),
                "https://raw.githubusercontent.com/foo/bar/HEAD/.github/workflows/ci.yml"
            );
        }

        #[test]
        fn none_for_other_providers() {
            let reference = RepositoryReference::parse("https://gitlab.com/foo/bar").unwrap();

            assert_eq!(reference.raw_file_url("HEAD", "package.json"), None);
        }
    }
}

mod content {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_json_when_requested() {
        let content = FileContent::decode(br#"{"name":"left-pad"}"#.to_vec(), true).unwrap();

        assert_eq!(content, FileContent::Json(json!({ "name": "left-pad" })));
    }

    #[test]
    fn keeps_bytes_by_default() {
        let content = FileContent::decode(b"module.exports = 1;".to_vec(), false).unwrap();

        assert_eq!(content.as_bytes().unwrap(), b"module.exports = 1;");
        assert!(content.as_json().is_none());
    }

    #[test]
    fn errors_for_invalid_json() {
        assert!(FileContent::decode(b"{ nope".to_vec(), true).is_err());
    }

    #[test]
    fn extracts_declared_name() {
        assert_eq!(
            FileContent::Json(json!({ "name": "left-pad" })).declared_name(),
            Some("left-pad".into())
        );
        assert_eq!(
            FileContent::Bytes(br#"{"name":"left-pad"}"#.to_vec()).declared_name(),
            Some("left-pad".into())
        );
        assert_eq!(FileContent::Json(json!({ "name": 1 })).declared_name(), None);
        assert_eq!(FileContent::Bytes(b"not json".to_vec()).declared_name(), None);
    }

    #[test]
    fn builds_options() {
        let options = LoadOptions::json().with_header("accept", "application/json");

        assert!(options.json);
        assert_eq!(options.headers.get("accept").unwrap(), "application/json");
        assert_ne!(options, LoadOptions::default());
    }
}
