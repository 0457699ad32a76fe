use std::path::Path;

use anyhow::{Context, Result};

use crate::config::GomodConfig;
use crate::git::GitCli;
use crate::gomod::{DryRun, GoModule, UpdateSink};
use crate::resolve::{apply_all, ResolutionReport};

/// Options of the update mode
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions<'a> {
    /// Print `repo@rev` instead of running `go get`
    pub dry_run: bool,
    /// Write the YAML report here
    pub report: Option<&'a Path>,
}

/// Handle the update mode
/// Resolve every dependency under `root` and record it in `go.mod`
pub fn handle(
    config: &GomodConfig,
    root: &Path,
    options: UpdateOptions<'_>,
) -> Result<ResolutionReport> {
    let deps = super::discover(config, root)?;
    let git = GitCli::new(&config.repos_dir);

    let sink: Box<dyn UpdateSink> = if options.dry_run {
        Box::new(DryRun)
    } else {
        GoModule::check_version(&config.min_go_version)?;
        Box::new(GoModule::new(root))
    };

    let report = apply_all(&git, sink.as_ref(), &deps);

    for skipped in report.unresolved.iter().chain(&report.failed) {
        eprintln!(
            "gx-gomod: skipped {} (gx_hash={}): {}",
            skipped.repository, skipped.legacy_hash, skipped.reason
        );
    }

    if let Some(path) = options.report {
        report
            .save(path)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        tracing::info!("wrote report to {:?}", path);
    }

    Ok(report)
}
