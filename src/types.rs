/// Shared serializable output types.
///
/// These types are what gets written as JSON: to stdout for stat rows and to
/// stderr for errors. They are decoupled from the internal `Row` type.
use serde::{Deserialize, Serialize};

use crate::stat::{ResourceKind, Row};

/// One stat row in JSON output.
///
/// Field presence follows the table's semantic columns: `status` only for
/// pods, pod counts never for authorities. Missing measurements are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRowOutput {
    pub namespace: String,
    pub kind: ResourceKind,
    pub name: String,
    /// Pod phase, e.g. "Running".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meshed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<u64>,
    /// Success ratio in `[0, 1]`.
    pub success: Option<f64>,
    /// Requests per second.
    pub rps: Option<f64>,
    pub latency_ms_p50: Option<u64>,
    pub latency_ms_p95: Option<u64>,
    pub latency_ms_p99: Option<u64>,
    pub tcp_open_connections: Option<u64>,
    pub tcp_read_bytes_per_sec: Option<f64>,
    pub tcp_write_bytes_per_sec: Option<f64>,
}

impl From<&Row> for StatRowOutput {
    fn from(row: &Row) -> Self {
        let has_pods = row.kind != ResourceKind::Authority;
        let counts = &row.pod_counts;
        let stats = row.stats.as_ref();
        let tcp = row.tcp.as_ref();
        Self {
            namespace: row.namespace.clone(),
            kind: row.kind,
            name: row.name.clone(),
            status: if row.kind == ResourceKind::Pod {
                counts.status.clone()
            } else {
                None
            },
            meshed: has_pods.then_some(counts.meshed),
            running: has_pods.then_some(counts.running),
            failed: has_pods.then_some(counts.failed),
            success: stats.and_then(|s| s.success_rate),
            rps: stats.and_then(|s| s.request_rate),
            latency_ms_p50: stats.map(|s| s.latency_ms_p50),
            latency_ms_p95: stats.map(|s| s.latency_ms_p95),
            latency_ms_p99: stats.map(|s| s.latency_ms_p99),
            tcp_open_connections: tcp.map(|t| t.open_connections),
            tcp_read_bytes_per_sec: tcp.and_then(|t| t.read_bytes_per_sec),
            tcp_write_bytes_per_sec: tcp.and_then(|t| t.write_bytes_per_sec),
        }
    }
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorOutput {
    /// Construct from a `CommandError`.
    #[must_use]
    pub fn from_command_error(err: &crate::commands::CommandError) -> Self {
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
            },
        }
    }
}
