/// Errors from the metrics API seam.
use std::path::PathBuf;

use thiserror::Error;

/// Typed errors from talking to (or replaying) the metrics API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The recorded response could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Where we tried to read from (`-` for stdin).
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The response was not a valid `StatSummaryResponse` document.
    #[error("failed to decode stat summary response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered with an error instead of stat tables.
    #[error("metrics API error: {0}")]
    Backend(String),
}

impl ApiError {
    /// Machine-readable error code (snake_case) for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::Decode(_) => "decode_error",
            Self::Backend(_) => "api_error",
        }
    }
}
