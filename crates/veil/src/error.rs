//! CLI error types.

use veil_config::ConfigError;
use veil_gate::PageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Validation(String),

    /// The credential did not unlock the block.
    #[error("{0}")]
    Locked(String),
}
