use crate::error::Result;
use crate::git::RepositoryQuery;

const COMMIT_ID_LEN: usize = 40;

/// Find a commit whose tree mentions `gx_hash`.
///
/// gx publishing writes the package hash into `.gx/lastpubver`, so the
/// commit that introduced it can be recovered by searching history. When
/// several commits match, the last match reported by the query wins; the
/// ordering is whatever the backend reports, not oldest or newest.
///
/// `Ok(None)` means nothing usable was found; `Err` means the search itself
/// could not run.
pub fn find_commit<Q: RepositoryQuery + ?Sized>(
    query: &Q,
    repo: &str,
    gx_hash: &str,
) -> Result<Option<String>> {
    let matches = query.search_history(repo, gx_hash)?;
    let Some(last) = matches.last() else {
        tracing::debug!("no commit in {} mentions {}", repo, gx_hash);
        return Ok(None);
    };
    let commit = validate_commit_id(&last.revision);
    if commit.is_none() {
        tracing::debug!(
            "discarding non-commit token {:?} from {}",
            last.revision,
            repo
        );
    }
    Ok(commit)
}

/// A full 40 character hex object id, or `None`.
pub fn validate_commit_id(token: &str) -> Option<String> {
    if token.len() != COMMIT_ID_LEN || hex::decode(token).is_err() {
        return None;
    }
    Some(token.to_string())
}
