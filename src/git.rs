//! Git collaborators: local repository cache, tag listing and history search.

mod cli;
mod traits;

pub use cli::GitCli;
pub use traits::{HistoryMatch, RepositoryFetch, RepositoryQuery};
