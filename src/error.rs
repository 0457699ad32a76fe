use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// `package.json` missing or unparsable at a visited node. Fatal for the walk.
    ManifestRead { path: PathBuf, reason: String },
    /// A git query (tag listing, history search) could not be executed.
    /// Distinct from "no match", which is `Ok(None)` / `Ok(false)`.
    RepositoryQuery { repo: String, reason: String },
    /// Clone or fetch of a repository failed.
    Download { repo: String, reason: String },
    /// The Go toolchain is missing or too old.
    Toolchain(String),
    /// A path that does not decode into `<gx_prefix>/<hash>/<name>`.
    MalformedPath(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ManifestRead { path, reason } => {
                write!(f, "Failed to read manifest at {:?}: {}", path, reason)
            }
            Error::RepositoryQuery { repo, reason } => {
                write!(f, "Failed to query repo {}: {}", repo, reason)
            }
            Error::Download { repo, reason } => {
                write!(f, "Failed to download/update repo {}: {}", repo, reason)
            }
            Error::Toolchain(msg) => write!(f, "Go toolchain error: {}", msg),
            Error::MalformedPath(msg) => write!(f, "Malformed gx path: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Yaml(e)
    }
}

impl Error {
    pub fn query(repo: &str, reason: impl Into<String>) -> Self {
        Error::RepositoryQuery {
            repo: repo.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the per-dependency failures that should skip one record
    /// rather than abort the whole run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::RepositoryQuery { .. })
    }
}
