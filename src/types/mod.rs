mod blob;
mod branch;
mod commit;
mod state;

pub use blob::Blob;
pub use branch::{Branch, SplitPoint};
pub use commit::{Commit, ROOT_MESSAGE};
pub use state::{State, DEFAULT_BRANCH};
