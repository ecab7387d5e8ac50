use std::io;

use thiserror::Error;

/// Errors that end an invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The `<profile/role_arn>` positional argument was not supplied.
    #[error("<profile/role_arn> argument is missing")]
    Usage,

    /// The credential provider could not produce credentials.
    #[error("{0:#}")]
    Resolution(anyhow::Error),

    /// `--format` named a dialect we cannot emit.
    #[error("unsupported format '{0}'")]
    UnsupportedFormat(String),

    /// The command to run is not on the search path.
    #[error("executable file '{command}' not found in $PATH")]
    CommandNotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    /// The command was found but could not be started.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child ran and exited with a non-zero status.
    #[error("command exited with status {0}")]
    ChildExit(i32),

    /// Writing the shell commands to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::ChildExit(code) => u8::try_from(*code).unwrap_or(1),
            _ => 1,
        }
    }

    /// Whether the error still has to be reported on stderr.
    ///
    /// A failing child already reported for itself.
    pub fn should_report(&self) -> bool {
        !matches!(self, Error::ChildExit(_))
    }
}

/// A specialized Result type for awsenv operations.
pub type Result<T> = std::result::Result<T, Error>;
