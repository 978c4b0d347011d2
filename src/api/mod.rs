/// The metrics API seam: response types, the client trait, and a replay client.
///
/// Transport and authentication live behind [`StatsApi`]; nothing in the
/// request builder or renderer knows how a request reaches the backend.
pub mod errors;
pub mod replay;

use serde::{Deserialize, Serialize};

use crate::stat::StatSummaryRequest;

pub use errors::ApiError;
pub use replay::ReplayClient;

/// Anything that can answer a stat summary request.
pub trait StatsApi {
    /// Send one request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the response cannot be obtained.
    fn stat_summary(&self, request: &StatSummaryRequest) -> Result<StatSummaryResponse, ApiError>;
}

/// Send `request` through `client`, turning an error response into an `Err`.
///
/// # Errors
///
/// Returns whatever the client returns, or `ApiError::Backend` when the API
/// answered with an error document.
pub fn request_stats_from_api(
    client: &dyn StatsApi,
    request: &StatSummaryRequest,
) -> Result<StatSummaryResponse, ApiError> {
    let response = client.stat_summary(request)?;
    if let StatSummaryResponse::Error(err) = response {
        return Err(ApiError::Backend(err.error));
    }
    Ok(response)
}

/// Top-level API response: either stat tables or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSummaryResponse {
    Ok(StatTables),
    Error(ResponseError),
}

impl StatSummaryResponse {
    /// The stat tables, or an empty slice for an error response.
    #[must_use]
    pub fn tables(&self) -> &[StatTable] {
        match self {
            Self::Ok(ok) => &ok.stat_tables,
            Self::Error(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatTables {
    #[serde(default)]
    pub stat_tables: Vec<StatTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub error: String,
}

/// One table of stats, grouped by pod owner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatTable {
    #[serde(default)]
    pub pod_group: PodGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PodGroup {
    #[serde(default)]
    pub rows: Vec<PodGroupRow>,
}

/// A single resource's stats as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PodGroupRow {
    pub resource: Resource,
    /// Window the counters were collected over, e.g. `1m`.
    pub time_window: String,
    /// Pod phase; only reported for pods.
    pub status: String,
    pub meshed_pod_count: u64,
    pub running_pod_count: u64,
    pub failed_pod_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BasicStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_stats: Option<TcpStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub namespace: String,
    /// Resource kind name, e.g. `pod` or `deployment`.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// Request counters and latency percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicStats {
    pub success_count: u64,
    pub failure_count: u64,
    pub latency_ms_p50: u64,
    pub latency_ms_p95: u64,
    pub latency_ms_p99: u64,
}

/// TCP connection counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpStats {
    pub open_connections: u64,
    pub read_bytes_total: u64,
    pub write_bytes_total: u64,
}
