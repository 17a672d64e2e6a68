//! Error types for option resolution and dispatch.

use crate::router::Operation;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration errors.
///
/// Recoverable problems (a missing cascade path, a config file that does not
/// parse) never surface as errors; they are logged and skipped.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An executable config ran but exited unsuccessfully.
    #[error("{} is executable, but it failed to execute: {status}\n{stderr}", path.display())]
    ExecutableFailed {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    /// An executable config could not be started at all.
    #[error("{} is executable, but it failed to execute: {source}", path.display())]
    ExecutableSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required option is missing after the full cascade.
    #[error(
        "{0} option required.  Either use --{0} or set a {0} option in your ~/.jira.d/config.yml file"
    )]
    MissingOption(&'static str),
}

/// Errors raised while handing a resolved invocation to its handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The operation needs more positional arguments than were given.
    #[error("{operation} requires {name} argument")]
    MissingArgument {
        operation: Operation,
        name: &'static str,
    },

    /// An option that must be a string has another type or is absent.
    #[error("option {0} must be a string")]
    NotAString(&'static str),

    /// The downstream handler failed.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for dispatch operations.
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
