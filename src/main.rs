use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gx_gomod::commands::{self, update::UpdateOptions};
use gx_gomod::config::GomodConfig;

#[derive(Parser)]
#[command(
    name = "gx-gomod",
    version,
    about = "Resolve gx dependencies to git versions/commits"
)]
struct Cli {
    /// Config file (default: ~/.config/gx-gomod/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log every resolution step
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Clone or fetch every git repository the gx graph depends on
    Download {
        /// Root project directory, which contains `package.json`
        path: PathBuf,
    },
    /// Resolve each dependency to a version or commit and `go get` it
    Update {
        /// Root project directory, which contains `package.json`
        path: PathBuf,
        /// Print `repo@rev` instead of running `go get`
        #[arg(long)]
        dry_run: bool,
        /// Write a YAML report of the run
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "gx_gomod=debug" } else { "gx_gomod=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = GomodConfig::load(cli.config.as_deref())?;

    match cli.mode {
        Mode::Download { path } => commands::download::handle(&config, &path),
        Mode::Update {
            path,
            dry_run,
            report,
        } => {
            let options = UpdateOptions {
                dry_run,
                report: report.as_deref(),
            };
            commands::update::handle(&config, &path, options)?;
            Ok(())
        }
    }
}
