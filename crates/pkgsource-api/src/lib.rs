mod commit;
mod content;
mod macros;
mod repository;
mod repository_error;

pub use commit::*;
pub use content::*;
pub use repository::*;
pub use repository_error::*;

/// File name of the package manifest that every source must contain.
pub const MANIFEST_NAME: &str = "package.json";
