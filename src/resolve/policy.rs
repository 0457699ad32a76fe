use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{find_commit, resolve_version};
use crate::error::Result;
use crate::gomod::UpdateSink;
use crate::graph::DependencyRecord;
use crate::git::RepositoryQuery;

/// What a gx hash maps to inside its repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub version: Option<String>,
    pub commit: Option<String>,
}

/// Revision handed to the module toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum UpdateTarget {
    Version(String),
    Commit(String),
}

impl UpdateTarget {
    pub fn as_str(&self) -> &str {
        match self {
            UpdateTarget::Version(v) | UpdateTarget::Commit(v) => v,
        }
    }
}

impl fmt::Display for UpdateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateTarget::Version(v) => write!(f, "version={}", v),
            UpdateTarget::Commit(c) => write!(f, "commit={}", c),
        }
    }
}

impl ResolvedIdentity {
    /// Version first, commit as fallback, `None` when unresolved.
    pub fn target(&self) -> Option<UpdateTarget> {
        if let Some(version) = &self.version {
            return Some(UpdateTarget::Version(version.clone()));
        }
        self.commit.clone().map(UpdateTarget::Commit)
    }

    pub fn is_resolved(&self) -> bool {
        self.version.is_some() || self.commit.is_some()
    }
}

/// Look up both the tag and the commit for one dependency.
pub fn resolve_identity<Q: RepositoryQuery + ?Sized>(
    query: &Q,
    dep: &DependencyRecord,
) -> Result<ResolvedIdentity> {
    let repo = dep.repository_location.as_str();
    let version = resolve_version(query, repo, dep.declared_version.as_deref())?;
    let commit = find_commit(query, repo, &dep.legacy_hash)?;

    if version.is_some() && commit.is_none() {
        tracing::debug!(
            "only found a version for {}: declared={:?} gx_hash={}",
            repo,
            dep.declared_version,
            dep.legacy_hash
        );
    }
    Ok(ResolvedIdentity { version, commit })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedDependency {
    pub repository: String,
    pub legacy_hash: String,
    pub target: UpdateTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDependency {
    pub repository: String,
    pub legacy_hash: String,
    pub reason: String,
}

/// Outcome of an `update` run, one entry per dependency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionReport {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub updated: Vec<UpdatedDependency>,
    /// Neither a tag nor a commit was found
    #[serde(default)]
    pub unresolved: Vec<SkippedDependency>,
    /// A query or the update itself failed
    #[serde(default)]
    pub failed: Vec<SkippedDependency>,
}

impl ResolutionReport {
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn skip(dep: &DependencyRecord, reason: String) -> SkippedDependency {
        SkippedDependency {
            repository: dep.repository_location.clone(),
            legacy_hash: dep.legacy_hash.clone(),
            reason,
        }
    }
}

/// Resolve every dependency and forward the result to `sink`.
///
/// Failures are isolated per dependency; the run always completes.
pub fn apply_all<Q, S>(query: &Q, sink: &S, deps: &[DependencyRecord]) -> ResolutionReport
where
    Q: RepositoryQuery + ?Sized,
    S: UpdateSink + ?Sized,
{
    let mut report = ResolutionReport {
        generated_at: Some(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };

    for dep in deps {
        let identity = match resolve_identity(query, dep) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("skipping {}: {}", dep.repository_location, e);
                report.failed.push(ResolutionReport::skip(dep, e.to_string()));
                continue;
            }
        };

        let Some(target) = identity.target() else {
            tracing::warn!(
                "failed to resolve {}: no version or commit for gx_hash={}",
                dep.repository_location,
                dep.legacy_hash
            );
            report.unresolved.push(ResolutionReport::skip(
                dep,
                "no matching tag or commit".to_string(),
            ));
            continue;
        };

        tracing::info!("updating {} with {}", dep.repository_location, target);
        match sink.update(&dep.repository_location, &target) {
            Ok(()) => report.updated.push(UpdatedDependency {
                repository: dep.repository_location.clone(),
                legacy_hash: dep.legacy_hash.clone(),
                target,
            }),
            Err(e) => {
                tracing::warn!("failed to update {}: {}", dep.repository_location, e);
                report.failed.push(ResolutionReport::skip(dep, e.to_string()));
            }
        }
    }

    tracing::info!(
        "{} updated, {} unresolved, {} failed",
        report.updated.len(),
        report.unresolved.len(),
        report.failed.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::error::Error;
    use crate::git::HistoryMatch;

    const SHA: &str = "abcdef0123456789abcdef0123456789abcdef01";

    #[derive(Default)]
    struct FakeRepos {
        tags: HashMap<&'static str, Vec<&'static str>>,
        history: HashMap<&'static str, Vec<String>>,
        broken: Vec<&'static str>,
    }

    impl RepositoryQuery for FakeRepos {
        fn list_tags(&self, repo: &str) -> Result<Vec<String>> {
            if self.broken.iter().any(|b| *b == repo) {
                return Err(Error::query(repo, "not cloned"));
            }
            Ok(self
                .tags
                .get(repo)
                .map(|t| t.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default())
        }

        fn search_history(&self, repo: &str, _needle: &str) -> Result<Vec<HistoryMatch>> {
            if self.broken.iter().any(|b| *b == repo) {
                return Err(Error::query(repo, "not cloned"));
            }
            Ok(self
                .history
                .get(repo)
                .map(|h| h.iter().map(|l| HistoryMatch::parse(l)).collect())
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: RefCell<Vec<(String, UpdateTarget)>>,
        reject: Option<&'static str>,
    }

    impl UpdateSink for RecordingSink {
        fn update(&self, repo: &str, target: &UpdateTarget) -> Result<()> {
            if self.reject == Some(repo) {
                return Err(Error::Toolchain("go get exited with 1".to_string()));
            }
            self.calls
                .borrow_mut()
                .push((repo.to_string(), target.clone()));
            Ok(())
        }
    }

    fn dep(repo: &str, hash: &str, version: Option<&str>) -> DependencyRecord {
        DependencyRecord {
            legacy_hash: hash.to_string(),
            repository_location: repo.to_string(),
            declared_version: version.map(str::to_string),
            canonical_import_path: repo.to_string(),
        }
    }

    #[test]
    fn test_version_beats_commit() {
        let identity = ResolvedIdentity {
            version: Some("v1.0.0".to_string()),
            commit: Some(SHA.to_string()),
        };
        assert_eq!(
            identity.target(),
            Some(UpdateTarget::Version("v1.0.0".to_string()))
        );
    }

    #[test]
    fn test_commit_fallback() {
        let identity = ResolvedIdentity {
            version: None,
            commit: Some(SHA.to_string()),
        };
        assert_eq!(identity.target(), Some(UpdateTarget::Commit(SHA.to_string())));
    }

    #[test]
    fn test_unresolved_has_no_target() {
        let identity = ResolvedIdentity::default();
        assert!(!identity.is_resolved());
        assert_eq!(identity.target(), None);
    }

    #[test]
    fn test_apply_all_forwards_and_skips() {
        let mut repos = FakeRepos::default();
        repos.tags.insert("github.com/o/tagged", vec!["v2.0.0"]);
        repos.tags.insert("github.com/o/both", vec!["v1.0.0"]);
        repos.history.insert(
            "github.com/o/both",
            vec![format!("{}:.gx/lastpubver:1.0.0: H2", SHA)],
        );
        repos.history.insert(
            "github.com/o/commit",
            vec![format!("{}:.gx/lastpubver:0.1.0: H3", SHA)],
        );
        repos.broken.push("github.com/o/broken");

        let deps = vec![
            dep("github.com/o/tagged", "H1", Some("2.0.0")),
            dep("github.com/o/both", "H2", Some("1.0.0")),
            dep("github.com/o/commit", "H3", Some("9.9.9")),
            dep("github.com/o/none", "H4", None),
            dep("github.com/o/broken", "H5", Some("1.0.0")),
        ];
        let sink = RecordingSink::default();
        let report = apply_all(&repos, &sink, &deps);

        assert_eq!(
            *sink.calls.borrow(),
            vec![
                (
                    "github.com/o/tagged".to_string(),
                    UpdateTarget::Version("v2.0.0".to_string())
                ),
                (
                    "github.com/o/both".to_string(),
                    UpdateTarget::Version("v1.0.0".to_string())
                ),
                (
                    "github.com/o/commit".to_string(),
                    UpdateTarget::Commit(SHA.to_string())
                ),
            ]
        );
        assert_eq!(report.updated.len(), 3);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].legacy_hash, "H4");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].repository, "github.com/o/broken");
    }

    #[test]
    fn test_sink_failure_is_isolated() {
        let mut repos = FakeRepos::default();
        repos.tags.insert("github.com/o/a", vec!["v1.0.0"]);
        repos.tags.insert("github.com/o/b", vec!["v1.0.0"]);
        let sink = RecordingSink {
            reject: Some("github.com/o/a"),
            ..Default::default()
        };
        let deps = vec![
            dep("github.com/o/a", "HA", Some("1.0.0")),
            dep("github.com/o/b", "HB", Some("1.0.0")),
        ];
        let report = apply_all(&repos, &sink, &deps);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].repository, "github.com/o/b");
    }

    #[test]
    fn test_report_save() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("reports/update.yaml");
        let report = ResolutionReport {
            generated_at: None,
            updated: vec![UpdatedDependency {
                repository: "github.com/o/a".to_string(),
                legacy_hash: "HA".to_string(),
                target: UpdateTarget::Version("v1.0.0".to_string()),
            }],
            ..Default::default()
        };
        report.save(&path)?;
        let content = fs::read_to_string(&path)?;
        assert!(content.contains("kind: version"));
        assert!(content.contains("value: v1.0.0"));
        Ok(())
    }
}
