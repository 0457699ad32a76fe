use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::GomodConfig;
use crate::git::{GitCli, RepositoryFetch};

/// Handle the download mode
/// Clone or fetch every repository discovered under `root`
pub fn handle(config: &GomodConfig, root: &Path) -> Result<()> {
    let deps = super::discover(config, root)?;
    let git = GitCli::new(&config.repos_dir);

    let mut repos: Vec<&str> = deps.iter().map(|d| d.repository_location.as_str()).collect();
    repos.sort_unstable();
    repos.dedup();

    fetch_all(&git, &repos)?;
    tracing::info!("{} repositories ready in {:?}", repos.len(), config.repos_dir);
    Ok(())
}

/// Fetch each repository in turn, stopping at the first failure
pub fn fetch_all<F: RepositoryFetch + ?Sized>(fetcher: &F, repos: &[&str]) -> Result<()> {
    let pb = if repos.len() > 10 {
        let bar = ProgressBar::new(repos.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {msg} [{bar:40.cyan/blue}] {pos}/{len} repos ({eta})")
                .context("Failed to create progress template")?
                .progress_chars("█▓░"),
        );
        bar.set_message("Downloading");
        Some(bar)
    } else {
        None
    };

    for repo in repos {
        match &pb {
            Some(bar) => bar.set_message(repo.to_string()),
            None => tracing::info!("downloading {}", repo),
        }
        fetcher.fetch(repo)?;
        if let Some(ref bar) = pb {
            bar.inc(1);
        }
    }

    if let Some(ref bar) = pb {
        bar.finish_with_message("Download complete");
    }
    Ok(())
}
