//! Maps a gx hash to a git tag or commit inside its repository.

mod commit;
mod policy;
mod version;

pub use commit::{find_commit, validate_commit_id};
pub use policy::{
    apply_all, resolve_identity, ResolutionReport, ResolvedIdentity, SkippedDependency,
    UpdateTarget, UpdatedDependency,
};
pub use version::{has_version, resolve_version, version_tag, SEMVER_PREFIX};
