//! Errors the bootstrapper detects on its own.
//!
//! Failures of the external tools (venv, pip, ansible) are not errors here:
//! they are recorded as step outcomes and folded into the exit status.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Cannot determine working directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("Working directory '{}' does not exist", .0.display())]
    MissingWorkingDir(PathBuf),

    #[error("Failed to write '{}': {source}", path.display())]
    WriteScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
