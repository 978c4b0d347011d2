/// Errors from the stat request builder.
use thiserror::Error;

/// A rejected combination of `stat` flags and positional arguments.
///
/// The messages are user-facing and asserted on by tests; keep them stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlagConflict {
    /// A named resource was combined with `--all-namespaces`.
    #[error("stats for a resource cannot be retrieved by name across all namespaces")]
    NamedResourceAcrossNamespaces,

    /// Both `--to` and `--from` were given.
    #[error("--to and --from flags are mutually exclusive")]
    ToAndFrom,

    /// Both `--to-namespace` and `--from-namespace` were given.
    #[error("--to-namespace and --from-namespace flags are mutually exclusive")]
    ToAndFromNamespace,

    /// `--to-namespace` was given for a namespace target.
    #[error("--to-namespace flag is incompatible with namespace resource type")]
    ToNamespaceOnNamespace,

    /// `--from-namespace` was given for a namespace target.
    #[error("--from-namespace flag is incompatible with namespace resource type")]
    FromNamespaceOnNamespace,
}

/// Errors that can occur while turning CLI input into stat requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    /// Two or more flags cannot be used together.
    #[error("{0}")]
    InvalidFlagCombination(#[from] FlagConflict),

    /// Positional arguments (or `--to` / `--from`) do not name a known resource.
    #[error("invalid resource: {0}")]
    MalformedResourceSpecifier(String),

    /// `--time-window` is not a duration like `30s`, `1m` or `2h`.
    #[error("invalid time window '{0}': expected a positive duration such as 10s, 1m or 1h")]
    InvalidTimeWindow(String),
}

impl StatError {
    /// Machine-readable error code (snake_case) for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFlagCombination(_) => "invalid_flag_combination",
            Self::MalformedResourceSpecifier(_) => "malformed_resource",
            Self::InvalidTimeWindow(_) => "invalid_time_window",
        }
    }
}
