//! Dependency discovery over the gx manifest graph.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::GxPath;
use crate::error::{Error, Result};
use crate::locator::RepositoryLocator;
use crate::manifest::ManifestSource;

/// One discovered gx dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub legacy_hash: String,
    /// `host/org/repo`
    pub repository_location: String,
    pub declared_version: Option<String>,
    pub canonical_import_path: String,
}

/// Walks `package.json` files starting at a root project.
///
/// Every node is read at most once, so cycles and diamonds are safe. The
/// traversal happens to be depth-first but callers must not rely on the
/// order of the returned records.
pub struct DependencyGraphWalker<'a, M: ManifestSource> {
    reader: &'a M,
    locator: &'a RepositoryLocator,
    gx_prefix: PathBuf,
    forge_domain: String,
}

impl<'a, M: ManifestSource> DependencyGraphWalker<'a, M> {
    pub fn new(
        reader: &'a M,
        locator: &'a RepositoryLocator,
        gx_prefix: impl Into<PathBuf>,
        forge_domain: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            locator,
            gx_prefix: gx_prefix.into(),
            forge_domain: forge_domain.into(),
        }
    }

    /// Collect every transitive dependency of `root`, hosted on the forge.
    pub fn walk(&self, root: &Path) -> Result<Vec<DependencyRecord>> {
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut pending = vec![root.to_path_buf()];
        let mut deps = Vec::new();

        while let Some(path) = pending.pop() {
            if visited.contains(&path) {
                continue;
            }
            let mut node = self.reader.read(&path)?;

            for child in &node.children {
                pending.push(GxPath::new(&child.legacy_hash, &child.name).encode(&self.gx_prefix));
            }
            visited.insert(path.clone());

            // the root need not be a gx package itself
            if path == root {
                continue;
            }

            let gx_path = GxPath::decode(&self.gx_prefix, &path).map_err(|e| {
                Error::ManifestRead {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            node.own_legacy_hash = Some(gx_path.gx_hash.clone());

            let import_path = node.canonical_import_path.take().ok_or_else(|| {
                Error::ManifestRead {
                    path: path.clone(),
                    reason: "missing gx.dvcsimport".to_string(),
                }
            })?;
            let repository_location = self.locator.locate(&gx_path.name, &import_path);
            tracing::debug!(
                "discovered {} ({}) -> {}",
                gx_path.name,
                gx_path.gx_hash,
                repository_location
            );

            deps.push(DependencyRecord {
                legacy_hash: gx_path.gx_hash,
                repository_location,
                declared_version: node.declared_version,
                canonical_import_path: import_path,
            });
        }

        let total = deps.len();
        let hosted: Vec<_> = deps
            .into_iter()
            .filter(|dep| {
                let keep = dep.repository_location.contains(&self.forge_domain);
                if !keep {
                    tracing::debug!(
                        "dropping {}: not hosted on {}",
                        dep.repository_location,
                        self.forge_domain
                    );
                }
                keep
            })
            .collect();
        tracing::info!(
            "found {} dependencies ({} hosted on {})",
            total,
            hosted.len(),
            self.forge_domain
        );
        Ok(hosted)
    }
}
