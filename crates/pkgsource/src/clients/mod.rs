mod git_client;
mod git_client_error;
mod http_client;
mod http_client_error;
mod registry_client;

pub use git_client::*;
pub use git_client_error::*;
pub use http_client::*;
pub use http_client_error::*;
pub use registry_client::*;
