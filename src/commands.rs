pub mod download;
pub mod update;

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::GomodConfig;
use crate::graph::{DependencyGraphWalker, DependencyRecord};
use crate::manifest::PackageJsonReader;

/// Walk the gx graph under `root` with the configured prefix and overrides.
pub fn discover(config: &GomodConfig, root: &Path) -> Result<Vec<DependencyRecord>> {
    let locator = config.locator();
    let reader = PackageJsonReader;
    let walker = DependencyGraphWalker::new(
        &reader,
        &locator,
        config.gx_prefix()?,
        config.forge_domain.as_str(),
    );
    walker
        .walk(root)
        .with_context(|| format!("Failed to walk gx dependencies of {:?}", root))
}
