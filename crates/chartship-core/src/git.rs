//! Git operations: identity, clone, and the final commit-and-push
//!
//! Authentication embeds the access token as the userinfo component of the
//! clone URL. The token is registered as a secret on every command that
//! carries it, so it never appears in logs or error output.

use std::path::Path;

use url::Url;

use crate::error::{PublishError, Result};
use crate::process::{Cmd, CommandRunner};

/// Local directory the source repository is cloned into.
pub const SOURCE_CLONE_DIR: &str = "sourceRepo";

/// Local directory the destination repository is cloned into.
pub const DESTINATION_CLONE_DIR: &str = "destinationRepo";

const NOREPLY_DOMAIN: &str = "users.noreply.github.com";

/// Set the global committer identity from the CI actor handle.
/// Must run before any commit.
pub fn configure_identity(runner: &dyn CommandRunner, actor: &str) -> Result<()> {
    let email = format!("{actor}@{NOREPLY_DOMAIN}");

    runner
        .run(&Cmd::new("git").args(["config", "--global", "user.name"]).arg(actor))
        .map_err(|e| PublishError::publish(format!("setting git user.name: {e}")))?;

    runner
        .run(&Cmd::new("git").args(["config", "--global", "user.email"]).arg(&email))
        .map_err(|e| PublishError::publish(format!("setting git user.email: {e}")))?;

    tracing::debug!(actor, email, "configured git identity");
    Ok(())
}

/// Build `https://<token>@github.com/<repo>.git`.
fn authenticated_url(repo: &str, token: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("https://github.com/{repo}.git")).map_err(|e| {
        PublishError::RepositoryAccess {
            repo: repo.to_string(),
            branch: String::new(),
            message: format!("invalid repository identifier: {e}"),
        }
    })?;

    url.set_username(token)
        .map_err(|_| PublishError::RepositoryAccess {
            repo: repo.to_string(),
            branch: String::new(),
            message: "could not embed credential in clone URL".to_string(),
        })?;

    Ok(url)
}

/// Clone `repo` at `branch` into `workdir/<label>`, authenticating with the
/// token. Clone errors (missing branch, rejected auth, network) surface the
/// tool's stderr verbatim; there is no retry.
pub fn clone_repo(
    runner: &dyn CommandRunner,
    workdir: &Path,
    repo: &str,
    branch: &str,
    token: &str,
    label: &str,
) -> Result<()> {
    let url = authenticated_url(repo, token)?;

    let cmd = Cmd::new("git")
        .args(["clone", "-b", branch])
        .arg(url.as_str())
        .arg(label)
        .cwd(workdir)
        .secret(token);

    runner.run(&cmd).map_err(|e| PublishError::RepositoryAccess {
        repo: repo.to_string(),
        branch: branch.to_string(),
        message: e.to_string(),
    })?;

    tracing::info!(repo, branch, label, "cloned repository");
    Ok(())
}

/// Stage everything in `working_dir`, commit with a message naming the
/// triggering revision, and push to `origin/<branch>`.
///
/// A clean tree is a success no-op: `git status --porcelain` is checked
/// first, and an empty report skips the commit and push entirely rather
/// than letting `git commit` fail on nothing-to-commit.
pub fn publish_changes(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    revision: &str,
    branch: &str,
) -> Result<()> {
    let status = runner
        .run(&Cmd::new("git").args(["status", "--porcelain"]).cwd(working_dir))
        .map_err(|e| PublishError::publish(format!("git status: {e}")))?;

    if status.stdout.trim().is_empty() {
        tracing::info!("working tree is clean, nothing to publish");
        return Ok(());
    }

    runner
        .run(&Cmd::new("git").args(["add", "."]).cwd(working_dir))
        .map_err(|e| PublishError::publish(format!("git add: {e}")))?;

    let message = format!("Publish Helm charts for {revision}");
    runner
        .run(&Cmd::new("git").args(["commit", "-m"]).arg(&message).cwd(working_dir))
        .map_err(|e| PublishError::publish(format!("git commit: {e}")))?;

    runner
        .run(&Cmd::new("git").args(["push", "-u", "origin", branch]).cwd(working_dir))
        .map_err(|e| PublishError::publish(format!("git push: {e}")))?;

    tracing::info!(branch, revision, "pushed packaged charts");
    Ok(())
}
