//! Error types for matrix generation
//!
//! Every error is fatal to the call that produced it. Nothing in this crate
//! retries or recovers internally.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DatagenError>;

/// Errors raised while configuring or running matrix generation
#[derive(Debug, Error)]
pub enum DatagenError {
    /// Bad distribution configuration (e.g. unparsable Poisson mean)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Distribution name not in the supported set
    #[error(
        "Unsupported probability distribution \"{name}\" in rand() -- it must be one of \"uniform\", \"normal\", or \"poisson\""
    )]
    UnsupportedDistribution { name: String },

    /// Invalid matrix characteristics (shape, block size, sparsity, block count)
    #[error("Invalid matrix characteristics: {0}")]
    Dimension(String),

    /// Invalid argument to sequence or sample generation
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// First failure observed among parallel generation tasks
    #[error("Generation task {task} failed: {source}")]
    TaskFailure {
        task: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DatagenError {
    /// Wraps an error raised inside parallel task `task`
    pub fn task_failure<E>(task: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DatagenError::TaskFailure {
            task,
            source: Box::new(source),
        }
    }

    /// True for errors caused by bad caller configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DatagenError::Configuration(_) | DatagenError::UnsupportedDistribution { .. }
        )
    }
}
