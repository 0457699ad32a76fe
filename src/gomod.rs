//! Go module toolchain: records resolved dependencies with `go get`.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use crate::error::{Error, Result};
use crate::resolve::UpdateTarget;

/// Receives one resolved dependency at a time.
///
/// Precedence between version and commit is decided before the call.
pub trait UpdateSink {
    fn update(&self, repo: &str, target: &UpdateTarget) -> Result<()>;
}

/// Runs `GO111MODULE=on go get <repo>@<rev>` inside the project root
pub struct GoModule {
    root: PathBuf,
}

impl GoModule {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Fail unless `go version` reports at least `minimum` (e.g. `1.11.4`).
    pub fn check_version(minimum: &str) -> Result<GoVersion> {
        let output = Command::new("go")
            .arg("version")
            .output()
            .map_err(|e| Error::Toolchain(format!("failed to run `go version`: {}", e)))?;
        if !output.status.success() {
            return Err(Error::Toolchain("`go version` exited with an error".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let found = GoVersion::from_version_output(&stdout).ok_or_else(|| {
            Error::Toolchain(format!("failed to parse the version from {:?}", stdout.trim()))
        })?;
        let required = GoVersion::parse(minimum)
            .ok_or_else(|| Error::Toolchain(format!("invalid minimum go version {:?}", minimum)))?;

        if found < required {
            return Err(Error::Toolchain(format!(
                "go version should be >= {}, found {}",
                required, found
            )));
        }
        tracing::debug!("using go {}", found);
        Ok(found)
    }
}

impl UpdateSink for GoModule {
    fn update(&self, repo: &str, target: &UpdateTarget) -> Result<()> {
        let spec = format!("{}@{}", repo, target.as_str());
        let output = Command::new("go")
            .current_dir(&self.root)
            .env("GO111MODULE", "on")
            .arg("get")
            .arg(&spec)
            .output()
            .map_err(|e| Error::Toolchain(format!("failed to run `go get {}`: {}", spec, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Toolchain(format!(
                "`go get {}` failed: {}",
                spec,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Logs what would be recorded without touching `go.mod`
pub struct DryRun;

impl UpdateSink for DryRun {
    fn update(&self, repo: &str, target: &UpdateTarget) -> Result<()> {
        println!("{}@{}", repo, target.as_str());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GoVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GoVersion {
    /// Parse `1.11` or `1.11.4`
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(GoVersion {
            major,
            minor,
            patch,
        })
    }

    /// Extract from `go version go1.21.3 linux/amd64`
    pub fn from_version_output(output: &str) -> Option<Self> {
        let token = output.split_whitespace().find_map(|word| {
            word.strip_prefix("go")
                .filter(|v| v.starts_with(|c: char| c.is_ascii_digit()))
        })?;
        // pre-releases such as go1.22rc1 compare as their release
        let numeric: String = token
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        Self::parse(numeric.trim_end_matches('.'))
    }
}

impl std::fmt::Display for GoVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_output() {
        let v = GoVersion::from_version_output("go version go1.21.3 linux/amd64\n").unwrap();
        assert_eq!(
            v,
            GoVersion {
                major: 1,
                minor: 21,
                patch: 3
            }
        );
    }

    #[test]
    fn test_parse_two_component_release() {
        let v = GoVersion::from_version_output("go version go1.12 darwin/amd64").unwrap();
        assert_eq!(v, GoVersion::parse("1.12.0").unwrap());
    }

    #[test]
    fn test_parse_prerelease() {
        let v = GoVersion::from_version_output("go version go1.22rc1 linux/arm64").unwrap();
        assert_eq!(v, GoVersion::parse("1.22").unwrap());
    }

    #[test]
    fn test_numeric_comparison() {
        // "1.9.7" < "1.11.4" is false as strings
        assert!(GoVersion::parse("1.9.7").unwrap() < GoVersion::parse("1.11.4").unwrap());
        assert!(GoVersion::parse("1.11.4").unwrap() <= GoVersion::parse("1.11.4").unwrap());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(GoVersion::from_version_output("command not found"), None);
        assert_eq!(GoVersion::parse("1.x.3"), None);
    }
}
