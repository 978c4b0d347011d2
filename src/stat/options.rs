/// Options driving a single `stat` invocation.
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use super::errors::StatError;

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Aligned table with headers (human-readable).
    #[default]
    Table,
    /// Table with additional TCP throughput columns.
    Wide,
    /// JSON array, one object per row (pretty-printed).
    Json,
}

/// Everything `stat` needs besides the positional resource arguments.
///
/// Built once per invocation and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatOptions {
    /// Namespace scope for the target and, by default, for `--to` / `--from`.
    pub namespace: String,
    /// Stats window, e.g. `10s`, `1m`, `1h`.
    pub time_window: String,
    pub to_resource: Option<String>,
    pub to_namespace: Option<String>,
    pub from_resource: Option<String>,
    pub from_namespace: Option<String>,
    pub all_namespaces: bool,
    pub output_format: OutputFormat,
}

impl Default for StatOptions {
    fn default() -> Self {
        Self {
            namespace: "default".to_owned(),
            time_window: "1m".to_owned(),
            to_resource: None,
            to_namespace: None,
            from_resource: None,
            from_namespace: None,
            all_namespaces: false,
            output_format: OutputFormat::Table,
        }
    }
}

/// A stats window: the label the user typed plus its length in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    label: String,
    seconds: u64,
}

impl TimeWindow {
    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for TimeWindow {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StatError::InvalidTimeWindow(s.to_owned());
        let split = s.len().checked_sub(1).ok_or_else(invalid)?;
        if !s.is_char_boundary(split) {
            return Err(invalid());
        }
        let (value, unit) = s.split_at(split);
        let multiplier = match unit {
            "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            _ => return Err(invalid()),
        };
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u64 = value.parse().map_err(|_| invalid())?;
        let seconds = value
            .checked_mul(multiplier)
            .filter(|&secs| secs > 0)
            .ok_or_else(invalid)?;
        Ok(Self {
            label: s.to_owned(),
            seconds,
        })
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
