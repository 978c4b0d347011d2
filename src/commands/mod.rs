/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod stat;

use thiserror::Error;

use crate::api::ApiError;
use crate::cli::OutputFormat;
use crate::cli::args::Command;
use crate::stat::StatError;

/// Any failure a command can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The flags or resources given on the command line were rejected.
    #[error(transparent)]
    Stat(#[from] StatError),

    /// The metrics API could not answer.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The rendered output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Stat(_) => 2,
            Self::Api(_) | Self::Output(_) => 1,
        }
    }

    /// Machine-readable error code for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Stat(err) => err.code(),
            Self::Api(err) => err.code(),
            Self::Output(_) => "output_error",
        }
    }
}

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `CommandError` on any command failure.
pub fn dispatch(command: &Command, format: OutputFormat) -> Result<(), CommandError> {
    match command {
        Command::Stat(args) => stat::run(args, format),
    }
}
