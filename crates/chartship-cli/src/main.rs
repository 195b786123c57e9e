//! chartship - package Helm charts and publish them to a chart repository
//!
//! Single-shot batch job meant to run inside a CI workflow: every input is
//! available both as a flag and as the environment variable the hosting
//! platform injects (`INPUT_*` for workflow inputs, `GITHUB_*` for run
//! context). The process exits non-zero on the first failing step.

use std::path::PathBuf;

use clap::Parser;
use console::style;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use chartship_core::{
    DEFAULT_CHARTS_DIR, DEFAULT_DESTINATION_BRANCH, HelmVersion, PublishConfig, SystemRunner,
    run_pipeline,
};

#[derive(Parser)]
#[command(name = "chartship")]
#[command(author = "Chartship Contributors")]
#[command(version)]
#[command(about = "Package Helm charts and publish them to a destination repository", long_about = None)]
struct Cli {
    /// Access token with push rights on the destination repository
    #[arg(long, env = "INPUT_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Destination repository (owner/name) receiving packaged charts
    #[arg(long, env = "INPUT_DESTINATION_REPO")]
    destination_repo: Option<String>,

    /// Source repository (owner/name) the charts are read from
    #[arg(long, env = "GITHUB_REPOSITORY", default_value = "")]
    source_repo: String,

    /// Ref the run was triggered for (refs/heads/... and refs/tags/... are stripped)
    #[arg(long, env = "GITHUB_REF", default_value = "")]
    source_ref: String,

    /// Folder inside the source repository holding chart directories
    #[arg(long, env = "INPUT_SOURCE_CHARTS_FOLDER", default_value = DEFAULT_CHARTS_DIR)]
    source_charts_folder: String,

    /// Branch pushed to in the destination repository
    #[arg(long, env = "INPUT_DESTINATION_BRANCH", default_value = DEFAULT_DESTINATION_BRANCH)]
    destination_branch: String,

    /// Folder inside the destination repository receiving packaged archives
    #[arg(long, env = "INPUT_DESTINATION_CHARTS_FOLDER", default_value = DEFAULT_CHARTS_DIR)]
    destination_charts_folder: String,

    /// Extra arguments appended to every `helm package` call (whitespace-split)
    #[arg(long, env = "INPUT_HELM_PACKAGE_ARGS", default_value = "")]
    helm_package_args: String,

    /// Helm version selector: "v3" installs the latest Helm 3, anything
    /// else uses the helm already on PATH
    #[arg(long, env = "INPUT_HELM_VERSION", default_value = "v3")]
    helm_version: String,

    /// CI actor handle, used for the git committer identity
    #[arg(long, env = "GITHUB_ACTOR", default_value = "chartship")]
    actor: String,

    /// Triggering revision, embedded in the publish commit message
    #[arg(long, env = "GITHUB_SHA", default_value = "HEAD")]
    revision: String,

    /// Directory the repositories are cloned into
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn to_config(&self) -> PublishConfig {
        PublishConfig {
            access_token: self.access_token.clone().unwrap_or_default(),
            source_repo: self.source_repo.clone(),
            source_branch: PublishConfig::normalize_ref(&self.source_ref),
            source_charts_dir: self.source_charts_folder.clone(),
            destination_repo: self.destination_repo.clone().unwrap_or_default(),
            destination_branch: self.destination_branch.clone(),
            destination_charts_dir: self.destination_charts_folder.clone(),
            helm_package_args: self.helm_package_args.clone(),
            helm_version: HelmVersion::parse(&self.helm_version),
            actor: self.actor.clone(),
            revision: self.revision.clone(),
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.to_config();
    config.validate().into_diagnostic()?;

    println!(
        "{} {} -> {}",
        style("Publishing").cyan().bold(),
        config.source_repo,
        config.destination_repo
    );
    for line in config.summary().lines() {
        println!("  {line}");
    }

    run_pipeline(&config, &SystemRunner, &cli.workdir).into_diagnostic()?;

    println!(
        "{} charts to {}@{}",
        style("Published").green().bold(),
        config.destination_repo,
        config.destination_branch
    );

    Ok(())
}
