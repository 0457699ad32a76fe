//! gx `package.json` reading.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const MANIFEST_FILE: &str = "package.json";

/// A dependency edge as declared in `gxDependencies`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildReference {
    pub name: String,
    #[serde(rename = "hash")]
    pub legacy_hash: String,
}

/// Parsed manifest of one package directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestNode {
    /// gx hash of this package. Filled in from the install path by the
    /// graph walker; `None` for the root project.
    pub own_legacy_hash: Option<String>,
    /// `gx.dvcsimport`
    pub canonical_import_path: Option<String>,
    pub declared_version: Option<String>,
    pub children: Vec<ChildReference>,
}

/// Source of manifests, keyed by package directory.
pub trait ManifestSource {
    /// Read the manifest stored in `dir`.
    /// Missing or unparsable manifests are [`Error::ManifestRead`].
    fn read(&self, dir: &Path) -> Result<ManifestNode>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    gx: Option<GxSection>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    gx_dependencies: Vec<ChildReference>,
}

#[derive(Debug, Deserialize)]
struct GxSection {
    #[serde(default)]
    dvcsimport: Option<String>,
}

impl From<PackageJson> for ManifestNode {
    fn from(pkg: PackageJson) -> Self {
        ManifestNode {
            own_legacy_hash: None,
            canonical_import_path: pkg.gx.and_then(|gx| gx.dvcsimport),
            declared_version: pkg.version,
            children: pkg.gx_dependencies,
        }
    }
}

/// Reads `<dir>/package.json` from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJsonReader;

impl PackageJsonReader {
    pub fn parse(content: &str) -> std::result::Result<ManifestNode, serde_json::Error> {
        let pkg: PackageJson = serde_json::from_str(content)?;
        Ok(pkg.into())
    }
}

impl ManifestSource for PackageJsonReader {
    fn read(&self, dir: &Path) -> Result<ManifestNode> {
        let path = dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|e| Error::ManifestRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| Error::ManifestRead {
            path,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const GO_CID: &str = r#"{
  "author": "whyrusleeping",
  "bugs": { "url": "https://github.com/ipfs/go-cid" },
  "gx": { "dvcsimport": "github.com/ipfs/go-cid" },
  "gxDependencies": [
    { "author": "multiformats", "hash": "QmPnFwZ2JXKnXgMw8CdBPxn7FWh6LLdjUjxV1fKHuJnkr8", "name": "go-multihash", "version": "1.0.8" },
    { "author": "whyrusleeping", "hash": "QmekxXDhCxCJRNuzmHreuaT3BsuJcsjcXWNrtV9C8DRHtd", "name": "go-multibase", "version": "0.3.0" }
  ],
  "gxVersion": "0.8.0",
  "language": "go",
  "name": "go-cid",
  "version": "0.9.0"
}"#;

    #[test]
    fn test_parse_package_json() {
        let node = PackageJsonReader::parse(GO_CID).unwrap();
        assert_eq!(
            node.canonical_import_path.as_deref(),
            Some("github.com/ipfs/go-cid")
        );
        assert_eq!(node.declared_version.as_deref(), Some("0.9.0"));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].name, "go-multihash");
        assert_eq!(
            node.children[1].legacy_hash,
            "QmekxXDhCxCJRNuzmHreuaT3BsuJcsjcXWNrtV9C8DRHtd"
        );
    }

    #[test]
    fn test_root_without_gx_section() {
        let node = PackageJsonReader::parse(r#"{"name": "root"}"#).unwrap();
        assert_eq!(node, ManifestNode::default());
    }

    #[test]
    fn test_read_from_dir() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(MANIFEST_FILE), GO_CID)?;
        let node = PackageJsonReader.read(dir.path())?;
        assert_eq!(node.children.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_manifest_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let err = PackageJsonReader.read(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }

    #[test]
    fn test_garbage_manifest_is_read_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        let err = PackageJsonReader.read(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }
}
