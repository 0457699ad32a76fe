use std::{
    collections::{BTreeMap, BTreeSet},
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::locator::RepositoryLocator;

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(stripped) = s.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if s == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

/// Configuration for gx-gomod
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GomodConfig {
    /// Where gx installs packages, `$GOPATH/src/gx/ipfs` by default
    #[serde(default)]
    pub gx_prefix: Option<PathBuf>,
    /// Local clones of dependency repositories
    #[serde(default = "defaults::repos_dir")]
    pub repos_dir: PathBuf,
    /// Only dependencies hosted here are migrated
    #[serde(default = "defaults::forge_domain")]
    pub forge_domain: String,
    /// Package short name -> repository, consulted before `dvcsimport`
    #[serde(default = "crate::locator::default_overrides")]
    pub overrides: BTreeMap<String, String>,
    /// Short names whose override entry is ignored
    #[serde(default = "crate::locator::default_exclusions")]
    pub excluded_overrides: BTreeSet<String>,
    #[serde(default = "defaults::min_go_version")]
    pub min_go_version: String,
}

impl Default for GomodConfig {
    fn default() -> Self {
        GomodConfig {
            gx_prefix: None,
            repos_dir: defaults::repos_dir(),
            forge_domain: defaults::forge_domain(),
            overrides: crate::locator::default_overrides(),
            excluded_overrides: crate::locator::default_exclusions(),
            min_go_version: defaults::min_go_version(),
        }
    }
}

impl GomodConfig {
    /// Load from `explicit` if given, else the default config file if it
    /// exists, else built-in defaults. Environment variables win.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = Self::config_file_path()?;
                tracing::debug!("loading gx-gomod config from {:?}", default_path);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Apply `GOPATH`, `GX_GOMOD_REPOS_DIR` and `GX_GOMOD_FORGE_DOMAIN`
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.gx_prefix.is_none() {
            if let Some(gopath) = var("GOPATH") {
                // GOPATH may list several roots; gx installs into the first
                let first = gopath.split(':').next().unwrap_or_default();
                self.gx_prefix = Some(expand_tilde(Path::new(first)).join("src/gx/ipfs"));
            }
        }

        if let Some(path) = var("GX_GOMOD_REPOS_DIR") {
            self.repos_dir = expand_tilde(&PathBuf::from(path));
        }

        if let Some(domain) = var("GX_GOMOD_FORGE_DOMAIN") {
            self.forge_domain = domain;
        }
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: GomodConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.repos_dir = expand_tilde(&config.repos_dir);
        if let Some(ref prefix) = config.gx_prefix {
            config.gx_prefix = Some(expand_tilde(prefix));
        }

        Ok(config)
    }

    /// Get default config file path
    pub fn config_file_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config/gx-gomod/config.yaml"))
            .context("Could not determine home directory for config file")
    }

    /// gx install prefix; requires `gx_prefix` or `GOPATH`
    pub fn gx_prefix(&self) -> Result<&Path> {
        self.gx_prefix
            .as_deref()
            .context("GOPATH is not set and no gx_prefix is configured")
    }

    pub fn locator(&self) -> RepositoryLocator {
        RepositoryLocator::new(self.overrides.clone(), self.excluded_overrides.clone())
    }
}

mod defaults {
    use std::path::PathBuf;

    pub(crate) fn repos_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".gx-gomod/gx-git-repos")
    }

    pub(crate) fn forge_domain() -> String {
        "github.com".to_string()
    }

    pub(crate) fn min_go_version() -> String {
        "1.11.4".to_string()
    }
}
