//! Chartship core - the Helm chart publish pipeline
//!
//! This crate provides the pieces the `chartship` binary is assembled from:
//! - `PublishConfig`: inputs resolved once, validated before any side effect
//! - `Cmd` / `CommandRunner`: typed external-command layer with secret redaction
//! - `git` / `helm`: the concrete pipeline steps
//! - `run_pipeline`: the sequential driver with first-error short-circuiting
//!
//! All real work is delegated to external tools (`git`, `helm`, `curl`);
//! nothing here retries, parallelizes, or keeps state across runs.

pub mod charts;
pub mod config;
pub mod error;
pub mod git;
pub mod helm;
pub mod pipeline;
pub mod process;

pub use charts::discover_charts;
pub use config::{DEFAULT_CHARTS_DIR, DEFAULT_DESTINATION_BRANCH, HelmVersion, PublishConfig};
pub use error::{PublishError, Result};
pub use pipeline::{Stage, run_pipeline};
pub use process::{Cmd, CmdOutput, CommandRunner, ProcessError, SystemRunner};
