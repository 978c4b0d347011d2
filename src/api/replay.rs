/// A `StatsApi` that answers from a recorded response document.
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{ApiError, PodGroupRow, StatSummaryResponse, StatTable, StatsApi};
use crate::stat::{ResourceKind, StatSummaryRequest};

/// Serves rows from a recorded `StatSummaryResponse`, filtered per request.
#[derive(Debug, Clone)]
pub struct ReplayClient {
    recorded: StatSummaryResponse,
}

impl ReplayClient {
    #[must_use]
    pub fn new(recorded: StatSummaryResponse) -> Self {
        Self { recorded }
    }

    /// Load a recording from `path`, or from stdin when `path` is `-`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Io` if the file cannot be read and
    /// `ApiError::Decode` if it is not a valid response document.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let io_err = |source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        };
        let raw = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(io_err)?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(io_err)?
        };
        let recorded = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "loaded recorded stat summary response");
        Ok(Self::new(recorded))
    }
}

impl StatsApi for ReplayClient {
    fn stat_summary(&self, request: &StatSummaryRequest) -> Result<StatSummaryResponse, ApiError> {
        let StatSummaryResponse::Ok(recorded) = &self.recorded else {
            return Ok(self.recorded.clone());
        };

        let mut answer = recorded.clone();
        for table in &mut answer.stat_tables {
            table.pod_group.rows.retain(|row| in_selector(request, row));
        }
        answer.stat_tables.retain(|table: &StatTable| !table.pod_group.rows.is_empty());

        debug!(
            selector = %request.selector,
            tables = answer.stat_tables.len(),
            "replayed stat summary"
        );
        Ok(StatSummaryResponse::Ok(answer))
    }
}

/// Whether a recorded row falls inside the request's selector.
fn in_selector(request: &StatSummaryRequest, row: &PodGroupRow) -> bool {
    let selector = &request.selector;
    let resource = &row.resource;

    let kind_matches = selector.kind == ResourceKind::All
        || resource
            .kind
            .parse::<ResourceKind>()
            .is_ok_and(|kind| kind == selector.kind);
    let name_matches = selector
        .name
        .as_deref()
        .is_none_or(|name| name == resource.name);
    let namespace_matches = selector
        .namespace
        .as_deref()
        .is_none_or(|namespace| namespace == resource.namespace);

    kind_matches && name_matches && namespace_matches
}
