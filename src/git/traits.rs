use crate::error::Result;

/// One line of `git grep` output over a set of revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMatch {
    /// Leading `<rev>:` token as reported by git
    pub revision: String,
    /// Remainder of the line (`<path>:<content>`)
    pub detail: String,
}

impl HistoryMatch {
    /// Split a `git grep <rev>...` output line at its first `:`.
    pub fn parse(line: &str) -> Self {
        match line.split_once(':') {
            Some((rev, rest)) => HistoryMatch {
                revision: rev.to_string(),
                detail: rest.to_string(),
            },
            None => HistoryMatch {
                revision: line.to_string(),
                detail: String::new(),
            },
        }
    }
}

/// Read-only queries against a locally cloned repository.
///
/// `repo` is always a `host/org/repo` location; implementations map it to
/// their own storage.
pub trait RepositoryQuery {
    /// Every tag name in the repository.
    fn list_tags(&self, repo: &str) -> Result<Vec<String>>;

    /// Search every commit reachable from any ref for `needle`.
    /// Matches are returned in the order the underlying tool reports them;
    /// an empty vec means no match.
    fn search_history(&self, repo: &str, needle: &str) -> Result<Vec<HistoryMatch>>;
}

/// Materializes repositories locally.
pub trait RepositoryFetch {
    /// Clone `repo` if absent, fetch otherwise.
    fn fetch(&self, repo: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grep_line() {
        let m = HistoryMatch::parse(
            "5a13bddfa3a06705681ade8e1d4ea85374b6b12e:.gx/lastpubver:1.0.2: QmHash",
        );
        assert_eq!(m.revision, "5a13bddfa3a06705681ade8e1d4ea85374b6b12e");
        assert_eq!(m.detail, ".gx/lastpubver:1.0.2: QmHash");
    }

    #[test]
    fn test_parse_line_without_separator() {
        let m = HistoryMatch::parse("Binary file matches");
        assert_eq!(m.revision, "Binary file matches");
        assert!(m.detail.is_empty());
    }
}
