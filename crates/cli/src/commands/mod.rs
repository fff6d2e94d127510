mod cat;
mod commit;

pub use cat::*;
pub use commit::*;
