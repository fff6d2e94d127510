mod cache;
mod clients;
mod config;
mod loader;
mod loader_error;
mod protocols;
pub mod test_utils;

pub use cache::*;
pub use clients::*;
pub use config::*;
pub use loader::*;
pub use loader_error::*;
pub use protocols::*;

pub use pkgsource_api as api;
pub use pkgsource_api::{
    CommitId, FileContent, HostingProvider, LoadOptions, MANIFEST_NAME, RepositoryReference,
    RepositoryReferenceError,
};
