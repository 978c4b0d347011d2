/// Flattening API responses into render-ready rows.
use tracing::warn;

use super::options::TimeWindow;
use super::resource::ResourceKind;
use crate::api::{PodGroupRow, StatSummaryResponse};

/// Pod counts reported for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodCounts {
    pub meshed: u64,
    pub running: u64,
    pub failed: u64,
    /// Pod phase (e.g. `Running`); only set for pods.
    pub status: Option<String>,
}

/// Derived request stats. `None` fields mean "no data", never zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowStats {
    /// Fraction of successful requests in `[0, 1]`; `None` without traffic.
    pub success_rate: Option<f64>,
    /// Requests per second; `None` if the window could not be parsed.
    pub request_rate: Option<f64>,
    pub latency_ms_p50: u64,
    pub latency_ms_p95: u64,
    pub latency_ms_p99: u64,
}

/// Derived TCP stats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TcpRates {
    pub open_connections: u64,
    pub read_bytes_per_sec: Option<f64>,
    pub write_bytes_per_sec: Option<f64>,
}

/// One render-ready record.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
    pub pod_counts: PodCounts,
    pub stats: Option<RowStats>,
    pub tcp: Option<TcpRates>,
}

/// Flatten every table in `response` into rows, keeping the API's order.
#[must_use]
pub fn resp_to_rows(response: &StatSummaryResponse) -> Vec<Row> {
    response
        .tables()
        .iter()
        .flat_map(|table| &table.pod_group.rows)
        .filter_map(to_row)
        .collect()
}

fn to_row(api_row: &PodGroupRow) -> Option<Row> {
    let kind = match api_row.resource.kind.parse::<ResourceKind>() {
        Ok(ResourceKind::All) | Err(_) => {
            warn!(
                kind = %api_row.resource.kind,
                name = %api_row.resource.name,
                "skipping row with unsupported resource type"
            );
            return None;
        }
        Ok(kind) => kind,
    };

    let window_secs = match api_row.time_window.parse::<TimeWindow>() {
        Ok(window) => Some(window.seconds()),
        Err(_) => {
            warn!(
                window = %api_row.time_window,
                name = %api_row.resource.name,
                "unparseable time window, rates unavailable"
            );
            None
        }
    };

    let stats = api_row.stats.map(|stats| {
        let total = stats.success_count.checked_add(stats.failure_count);
        if total.is_none() {
            warn!(
                name = %api_row.resource.name,
                "request counters overflow, rates unavailable"
            );
        }
        RowStats {
            success_rate: total
                .filter(|&total| total > 0)
                .map(|total| ratio(stats.success_count, total)),
            request_rate: total.zip(window_secs).map(|(total, secs)| ratio(total, secs)),
            latency_ms_p50: stats.latency_ms_p50,
            latency_ms_p95: stats.latency_ms_p95,
            latency_ms_p99: stats.latency_ms_p99,
        }
    });

    let tcp = api_row.tcp_stats.map(|tcp| TcpRates {
        open_connections: tcp.open_connections,
        read_bytes_per_sec: window_secs.map(|secs| ratio(tcp.read_bytes_total, secs)),
        write_bytes_per_sec: window_secs.map(|secs| ratio(tcp.write_bytes_total, secs)),
    });

    let status = match (kind, api_row.status.as_str()) {
        (_, "") => None,
        (ResourceKind::Pod, status) => Some(status.to_owned()),
        (_, status) => {
            warn!(
                kind = %kind,
                name = %api_row.resource.name,
                status,
                "ignoring pod status on a non-pod row"
            );
            None
        }
    };

    Some(Row {
        kind,
        namespace: api_row.resource.namespace.clone(),
        name: api_row.resource.name.clone(),
        pod_counts: PodCounts {
            meshed: api_row.meshed_pod_count,
            running: api_row.running_pod_count,
            failed: api_row.failed_pod_count,
            status,
        },
        stats,
        tcp,
    })
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator as f64
}
