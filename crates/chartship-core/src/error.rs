//! Error types for the publish pipeline

use thiserror::Error;

/// Errors raised by the publish pipeline.
///
/// Every variant is fatal: the pipeline short-circuits on the first error
/// and reports it to the caller. There is no retry and no partial-success
/// mode, so a single failing chart blocks publishing all others.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Helm install failed while running {step}: {message}")]
    ToolInstall { step: String, message: String },

    #[error("Failed to clone {repo}@{branch}: {message}")]
    RepositoryAccess {
        repo: String,
        branch: String,
        message: String,
    },

    #[error("Packaging failed for chart {chart}: {message}")]
    Packaging { chart: String, message: String },

    #[error("Index regeneration failed: {message}")]
    Index { message: String },

    #[error("Publish failed: {message}")]
    Publish { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn packaging(chart: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Packaging {
            chart: chart.into(),
            message: message.into(),
        }
    }

    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish {
            message: message.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PublishError>;
