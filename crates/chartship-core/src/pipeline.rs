//! Pipeline driver
//!
//! Executes the publish stages in a fixed order, stopping at the first
//! error. Stages:
//!
//! ```text
//! Validated -> ToolInstalled -> GitConfigured -> SourceCloned
//!   -> DestinationCloned -> Packaged -> Indexed -> Published
//! ```
//!
//! Every stage is a blocking external-tool invocation; there are no
//! retries and no backward transitions. Partially-cloned or
//! partially-packaged filesystem state left behind by a failed run is the
//! ephemeral runner's to discard.

use std::fmt;
use std::path::Path;

use crate::charts::discover_charts;
use crate::config::PublishConfig;
use crate::error::Result;
use crate::git::{self, DESTINATION_CLONE_DIR, SOURCE_CLONE_DIR};
use crate::helm;
use crate::process::CommandRunner;

/// Stages of the publish pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validated,
    ToolInstalled,
    GitConfigured,
    SourceCloned,
    DestinationCloned,
    Packaged,
    Indexed,
    Published,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validated => "validated",
            Stage::ToolInstalled => "tool-installed",
            Stage::GitConfigured => "git-configured",
            Stage::SourceCloned => "source-cloned",
            Stage::DestinationCloned => "destination-cloned",
            Stage::Packaged => "packaged",
            Stage::Indexed => "indexed",
            Stage::Published => "published",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    tracing::info!(stage = %stage, "pipeline stage complete");
}

/// Run the whole publish pipeline inside `workdir`.
///
/// Validation happens before anything else; a configuration error means no
/// external tool was invoked at all. Afterwards each stage runs exactly
/// once, in order, and the first failure is returned as-is.
pub fn run_pipeline(
    config: &PublishConfig,
    runner: &dyn CommandRunner,
    workdir: &Path,
) -> Result<()> {
    config.validate()?;
    enter(Stage::Validated);

    if config.helm_version.requires_install() {
        helm::install_helm3(runner, workdir)?;
        enter(Stage::ToolInstalled);
    }

    git::configure_identity(runner, &config.actor)?;
    enter(Stage::GitConfigured);

    git::clone_repo(
        runner,
        workdir,
        &config.source_repo,
        &config.source_branch,
        &config.access_token,
        SOURCE_CLONE_DIR,
    )?;
    enter(Stage::SourceCloned);

    git::clone_repo(
        runner,
        workdir,
        &config.destination_repo,
        &config.destination_branch,
        &config.access_token,
        DESTINATION_CLONE_DIR,
    )?;
    enter(Stage::DestinationCloned);

    package_all(config, runner, workdir)?;
    enter(Stage::Packaged);

    let destination_tree = workdir.join(DESTINATION_CLONE_DIR);
    helm::repo_index(runner, &destination_tree)?;
    enter(Stage::Indexed);

    git::publish_changes(
        runner,
        &destination_tree,
        &config.revision,
        &config.destination_branch,
    )?;
    enter(Stage::Published);

    Ok(())
}

/// Package every discovered chart, one at a time. The first failing chart
/// aborts the run; charts after it are not attempted.
fn package_all(config: &PublishConfig, runner: &dyn CommandRunner, workdir: &Path) -> Result<()> {
    let charts_dir = workdir.join(SOURCE_CLONE_DIR).join(&config.source_charts_dir);
    let destination = workdir
        .join(DESTINATION_CLONE_DIR)
        .join(&config.destination_charts_dir);

    let charts = discover_charts(&charts_dir)?;
    tracing::info!(count = charts.len(), ?charts, "discovered charts");

    let extra_args = config.package_args();
    for chart in &charts {
        helm::dependency_update(runner, &charts_dir.join(chart), chart)?;
        helm::package_chart(runner, &charts_dir, chart, &destination, &extra_args)?;
    }

    Ok(())
}
