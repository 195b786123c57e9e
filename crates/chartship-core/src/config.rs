//! Publish configuration
//!
//! All inputs are resolved once at startup into an immutable
//! [`PublishConfig`]; no step performs ambient environment lookups of its
//! own. Validation runs before any external tool is invoked, so a missing
//! required input fails the run with zero side effects.

use std::fmt;

use crate::error::{PublishError, Result};

/// Default folder, relative to each repository root, where charts live.
pub const DEFAULT_CHARTS_DIR: &str = "charts";

/// Default branch pushed to in the destination repository.
pub const DEFAULT_DESTINATION_BRANCH: &str = "master";

/// Which Helm the pipeline should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelmVersion {
    /// Install the latest Helm 3 from the official install script.
    V3,
    /// Use whatever `helm` is already on the runner's PATH.
    System,
}

impl HelmVersion {
    /// Parse the `helm-version` input. Empty or `v3` selects auto-install,
    /// anything else means the runner provides its own binary.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" | "v3" => HelmVersion::V3,
            _ => HelmVersion::System,
        }
    }

    pub fn requires_install(&self) -> bool {
        matches!(self, HelmVersion::V3)
    }
}

/// Immutable configuration for one publish run.
#[derive(Clone)]
pub struct PublishConfig {
    /// Access token with push rights on the destination repository. Secret.
    pub access_token: String,
    /// Source repository in `owner/name` form.
    pub source_repo: String,
    /// Source branch (or tag) the charts are read from.
    pub source_branch: String,
    /// Folder inside the source repository holding chart directories.
    pub source_charts_dir: String,
    /// Destination repository in `owner/name` form.
    pub destination_repo: String,
    pub destination_branch: String,
    /// Folder inside the destination repository receiving packaged archives.
    pub destination_charts_dir: String,
    /// Extra arguments appended to every `helm package` call, raw.
    pub helm_package_args: String,
    pub helm_version: HelmVersion,
    /// CI actor handle, used for the git committer identity.
    pub actor: String,
    /// Triggering revision, embedded in the publish commit message.
    pub revision: String,
}

impl PublishConfig {
    /// Fail fast on missing required inputs. Runs before any side effect.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(PublishError::configuration("missing access token"));
        }
        if self.destination_repo.is_empty() {
            return Err(PublishError::configuration(
                "missing destination repository",
            ));
        }
        Ok(())
    }

    /// Strip the ref prefixes the CI platform uses so that both branch and
    /// tag triggers yield a plain name usable with `git clone -b`.
    pub fn normalize_ref(raw: &str) -> String {
        raw.trim_start_matches("refs/heads/")
            .trim_start_matches("refs/tags/")
            .to_string()
    }

    /// Tokenize the raw extra-args string on whitespace. Quoting is not
    /// supported; an argument containing spaces cannot be expressed.
    pub fn package_args(&self) -> Vec<String> {
        self.helm_package_args
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Human-readable resolved configuration with the token redacted.
    pub fn summary(&self) -> String {
        format!(
            "source: {}@{} ({}/)\ndestination: {}@{} ({}/)\nhelm: {:?}, package args: {:?}\nactor: {}, revision: {}",
            self.source_repo,
            self.source_branch,
            self.source_charts_dir,
            self.destination_repo,
            self.destination_branch,
            self.destination_charts_dir,
            self.helm_version,
            self.helm_package_args,
            self.actor,
            self.revision,
        )
    }
}

// Manual Debug so the token cannot leak through `{:?}` in a log line.
impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("access_token", &"***")
            .field("source_repo", &self.source_repo)
            .field("source_branch", &self.source_branch)
            .field("source_charts_dir", &self.source_charts_dir)
            .field("destination_repo", &self.destination_repo)
            .field("destination_branch", &self.destination_branch)
            .field("destination_charts_dir", &self.destination_charts_dir)
            .field("helm_package_args", &self.helm_package_args)
            .field("helm_version", &self.helm_version)
            .field("actor", &self.actor)
            .field("revision", &self.revision)
            .finish()
    }
}
