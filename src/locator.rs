//! Maps a gx package to the git repository that hosts its history.

mod gxed;

use std::collections::{BTreeMap, BTreeSet};

pub use gxed::{default_exclusions, default_overrides};

/// Resolves `(short_name, dvcsimport)` to `host/org/repo`.
///
/// The override table is consulted first because many gx packages were
/// published from forks under the `gxed` organization while their
/// `dvcsimport` still points at upstream.
#[derive(Debug, Clone, Default)]
pub struct RepositoryLocator {
    overrides: BTreeMap<String, String>,
    excluded: BTreeSet<String>,
}

impl RepositoryLocator {
    pub fn new(overrides: BTreeMap<String, String>, excluded: BTreeSet<String>) -> Self {
        Self {
            overrides,
            excluded,
        }
    }

    /// Locator carrying the built-in gxed mirror table
    pub fn with_defaults() -> Self {
        Self::new(default_overrides(), default_exclusions())
    }

    pub fn locate(&self, short_name: &str, import_path: &str) -> String {
        if !self.excluded.contains(short_name) {
            if let Some(repo) = self.overrides.get(short_name) {
                return repo.clone();
            }
        }
        derive_repository(import_path)
    }
}

/// Keep `host/org/repo`, drop sub-package segments.
pub fn derive_repository(import_path: &str) -> String {
    let path = import_path
        .split_once("://")
        .map_or(import_path, |(_, rest)| rest);
    path.split('/').take(3).collect::<Vec<_>>().join("/")
}
