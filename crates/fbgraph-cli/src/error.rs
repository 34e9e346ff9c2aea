//! Error types for the CLI

use fbgraph_core::GraphError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing {0}; pass it as a flag or set the matching FBGRAPH_* variable")]
    MissingCredential(&'static str),

    #[error("General error: {0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(err.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
