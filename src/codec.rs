use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// A gx package location decoded from its install path.
///
/// gx installs every package at `<gx_prefix>/<gx_hash>/<name>`, so the
/// path alone identifies the content snapshot and its short name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GxPath {
    pub gx_hash: String,
    pub name: String,
}

impl GxPath {
    pub fn new(gx_hash: impl Into<String>, name: impl Into<String>) -> Self {
        GxPath {
            gx_hash: gx_hash.into(),
            name: name.into(),
        }
    }

    /// Encode into `<prefix>/<hash>/<name>`
    pub fn encode(&self, prefix: &Path) -> PathBuf {
        prefix.join(&self.gx_hash).join(&self.name)
    }

    /// Parse a path produced by [`GxPath::encode`].
    ///
    /// Segments below `<name>` are ignored, matching how gx lays out
    /// sub-packages inside one snapshot.
    pub fn decode(prefix: &Path, path: &Path) -> Result<Self> {
        let rest = path.strip_prefix(prefix).map_err(|_| {
            Error::MalformedPath(format!(
                "{:?} should have the prefix {:?}",
                path, prefix
            ))
        })?;

        let mut parts = rest.components().filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        });

        match (parts.next(), parts.next()) {
            (Some(gx_hash), Some(name)) => Ok(GxPath::new(gx_hash, name)),
            _ => Err(Error::MalformedPath(format!("{:?}", path))),
        }
    }
}
