use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use super::traits::{HistoryMatch, RepositoryFetch, RepositoryQuery};
use crate::error::{Error, Result};

/// Revisions handed to a single `git grep` invocation, keeps the argument
/// list well under the OS limit on long histories.
const REV_BATCH: usize = 512;

/// `git` subprocess backend over a directory of clones laid out as
/// `<repos_dir>/<host>/<org>/<repo>`.
#[derive(Debug, Clone)]
pub struct GitCli {
    repos_dir: PathBuf,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(repos_dir: P) -> Self {
        GitCli {
            repos_dir: repos_dir.as_ref().to_path_buf(),
        }
    }

    /// Working tree of the local clone of `repo`
    pub fn repo_path(&self, repo: &str) -> PathBuf {
        self.repos_dir.join(repo)
    }

    fn git_dir(&self, repo: &str) -> PathBuf {
        self.repo_path(repo).join(".git")
    }

    /// `git --git-dir=<clone>/.git ...`, so no chdir is needed
    fn git(&self, repo: &str) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("--git-dir").arg(self.git_dir(repo));
        cmd
    }

    fn run(cmd: &mut Command, repo: &str, what: &str) -> Result<Output> {
        tracing::debug!("running {:?}", cmd);
        cmd.output()
            .map_err(|e| Error::query(repo, format!("failed to execute git {}: {}", what, e)))
    }

    fn stderr_of(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).trim().to_string()
    }

    fn rev_list_all(&self, repo: &str) -> Result<Vec<String>> {
        let output = Self::run(self.git(repo).arg("rev-list").arg("--all"), repo, "rev-list")?;
        if !output.status.success() {
            return Err(Error::query(
                repo,
                format!("git rev-list failed: {}", Self::stderr_of(&output)),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl RepositoryQuery for GitCli {
    fn list_tags(&self, repo: &str) -> Result<Vec<String>> {
        let output = Self::run(self.git(repo).arg("tag"), repo, "tag")?;
        if !output.status.success() {
            return Err(Error::query(
                repo,
                format!("git tag failed: {}", Self::stderr_of(&output)),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn search_history(&self, repo: &str, needle: &str) -> Result<Vec<HistoryMatch>> {
        let revisions = self.rev_list_all(repo)?;
        let mut matches = Vec::new();

        for batch in revisions.chunks(REV_BATCH) {
            let output = Self::run(
                self.git(repo)
                    .arg("grep")
                    .arg("-F")
                    .arg("-e")
                    .arg(needle)
                    .args(batch),
                repo,
                "grep",
            )?;

            // git grep exits 1 when nothing matched
            match output.status.code() {
                Some(0) | Some(1) => {}
                _ => {
                    return Err(Error::query(
                        repo,
                        format!("git grep failed: {}", Self::stderr_of(&output)),
                    ))
                }
            }

            matches.extend(
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .filter(|l| !l.is_empty())
                    .map(HistoryMatch::parse),
            );
        }

        tracing::debug!(
            "{} matches for {} across {} revisions of {}",
            matches.len(),
            needle,
            revisions.len(),
            repo
        );
        Ok(matches)
    }
}

impl RepositoryFetch for GitCli {
    fn fetch(&self, repo: &str) -> Result<()> {
        let repo_path = self.repo_path(repo);
        let download_err = |reason: String| Error::Download {
            repo: repo.to_string(),
            reason,
        };

        let mut cmd = if self.git_dir(repo).exists() {
            tracing::debug!("fetching {} in {:?}", repo, repo_path);
            let mut cmd = self.git(repo);
            cmd.arg("fetch").arg("--tags");
            cmd
        } else {
            if let Some(parent) = repo_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    download_err(format!("failed to create {:?}: {}", parent, e))
                })?;
            }
            let url = format!("https://{}", repo);
            tracing::debug!("cloning {} into {:?}", url, repo_path);
            let mut cmd = Command::new("git");
            cmd.arg("clone").arg(&url).arg(&repo_path);
            cmd
        };

        let output = cmd
            .output()
            .map_err(|e| download_err(format!("failed to execute git: {}", e)))?;

        if !output.status.success() {
            return Err(download_err(Self::stderr_of(&output)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_layout() {
        let git = GitCli::new("/cache/repos");
        assert_eq!(
            git.repo_path("github.com/ipfs/go-cid"),
            PathBuf::from("/cache/repos/github.com/ipfs/go-cid")
        );
        assert_eq!(
            git.git_dir("github.com/ipfs/go-cid"),
            PathBuf::from("/cache/repos/github.com/ipfs/go-cid/.git")
        );
    }

    #[test]
    fn test_missing_clone_is_query_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let git = GitCli::new(dir.path());
        let err = git.list_tags("github.com/nobody/nothing").unwrap_err();
        assert!(err.is_recoverable());
    }
}
