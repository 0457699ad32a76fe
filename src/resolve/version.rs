use crate::error::Result;
use crate::git::RepositoryQuery;

/// Go modules expect semver tags of the form `v1.2.3`.
pub const SEMVER_PREFIX: char = 'v';

/// Candidate tag for a gx `version` field
pub fn version_tag(declared: &str) -> String {
    format!("{}{}", SEMVER_PREFIX, declared)
}

/// Whether `v<declared>` is one of the repository's tags. Exact match only.
pub fn has_version<Q: RepositoryQuery + ?Sized>(
    query: &Q,
    repo: &str,
    declared: Option<&str>,
) -> Result<bool> {
    Ok(resolve_version(query, repo, declared)?.is_some())
}

/// The matching tag, if any. No tag listing is requested when nothing
/// is declared.
pub fn resolve_version<Q: RepositoryQuery + ?Sized>(
    query: &Q,
    repo: &str,
    declared: Option<&str>,
) -> Result<Option<String>> {
    let Some(declared) = declared else {
        return Ok(None);
    };
    let tag = version_tag(declared);
    let tags = query.list_tags(repo)?;
    Ok(tags.iter().any(|t| *t == tag).then_some(tag))
}
