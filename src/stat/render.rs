/// Rendering rows as a table, a wide table, or JSON.
use std::collections::BTreeMap;

use comfy_table::{CellAlignment, Table, presets::NOTHING};

use super::format::{
    NO_DATA, format_byte_rate, format_latency, format_meshed, format_request_rate,
    format_success_rate,
};
use super::options::{OutputFormat, StatOptions};
use super::resource::ResourceKind;
use super::rows::Row;
use crate::types::StatRowOutput;

/// Printed instead of an empty table.
const NO_TRAFFIC: &str = "No traffic found.\n";

/// Blank columns between two table columns.
const COLUMN_GAP: u16 = 3;

/// Render `rows` in the format selected by `options`.
///
/// Rows are grouped by kind in [`ResourceKind`] declaration order and keep
/// their input order within a group. The output always ends with a newline
/// and is byte-for-byte reproducible.
///
/// # Panics
///
/// Panics if a row has the query-only kind [`ResourceKind::All`], or if a row
/// other than a pod carries a pod status.
#[must_use]
pub fn render_stat_stats(rows: &[Row], options: &StatOptions) -> String {
    let groups = group_by_kind(rows);
    match options.output_format {
        OutputFormat::Table => render_table(&groups, options.all_namespaces),
        OutputFormat::Wide => render_wide(&groups, options.all_namespaces),
        OutputFormat::Json => render_json(&groups),
    }
}

fn group_by_kind(rows: &[Row]) -> BTreeMap<ResourceKind, Vec<&Row>> {
    let mut groups: BTreeMap<ResourceKind, Vec<&Row>> = BTreeMap::new();
    for row in rows {
        assert!(
            row.kind != ResourceKind::All,
            "row {}/{} has the query-only kind 'all'",
            row.namespace,
            row.name
        );
        assert!(
            row.kind == ResourceKind::Pod || row.pod_counts.status.is_none(),
            "{} row {}/{} carries a pod status",
            row.kind,
            row.namespace,
            row.name
        );
        groups.entry(row.kind).or_default().push(row);
    }
    groups
}

fn render_table(groups: &BTreeMap<ResourceKind, Vec<&Row>>, all_namespaces: bool) -> String {
    render_text(groups, Layout {
        all_namespaces,
        wide: false,
        prefix_kind: groups.len() > 1,
    })
}

fn render_wide(groups: &BTreeMap<ResourceKind, Vec<&Row>>, all_namespaces: bool) -> String {
    render_text(groups, Layout {
        all_namespaces,
        wide: true,
        prefix_kind: groups.len() > 1,
    })
}

fn render_json(groups: &BTreeMap<ResourceKind, Vec<&Row>>) -> String {
    let output: Vec<StatRowOutput> = groups
        .values()
        .flatten()
        .map(|row| StatRowOutput::from(*row))
        .collect();
    let json = serde_json::to_string_pretty(&output)
        .unwrap_or_else(|err| unreachable!("stat rows always serialize to JSON: {err}"));
    json + "\n"
}

/// Which optional columns a text table carries.
#[derive(Debug, Clone, Copy)]
struct Layout {
    all_namespaces: bool,
    wide: bool,
    /// Prefix names with the short kind when several kinds share the output.
    prefix_kind: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Namespace,
    Name,
    Status,
    Meshed,
    Success,
    Rps,
    LatencyP50,
    LatencyP95,
    LatencyP99,
    TcpConn,
    ReadBytes,
    WriteBytes,
}

impl Column {
    fn header(self) -> &'static str {
        match self {
            Self::Namespace => "NAMESPACE",
            Self::Name => "NAME",
            Self::Status => "STATUS",
            Self::Meshed => "MESHED",
            Self::Success => "SUCCESS",
            Self::Rps => "RPS",
            Self::LatencyP50 => "LATENCY_P50",
            Self::LatencyP95 => "LATENCY_P95",
            Self::LatencyP99 => "LATENCY_P99",
            Self::TcpConn => "TCP_CONN",
            Self::ReadBytes => "READ_BYTES/SEC",
            Self::WriteBytes => "WRITE_BYTES/SEC",
        }
    }

    fn alignment(self) -> CellAlignment {
        match self {
            Self::Namespace | Self::Name | Self::Status => CellAlignment::Left,
            _ => CellAlignment::Right,
        }
    }

    fn cell(self, row: &Row, prefix_kind: bool) -> String {
        let stats = row.stats.as_ref();
        let tcp = row.tcp.as_ref();
        match self {
            Self::Namespace => row.namespace.clone(),
            Self::Name if prefix_kind => format!("{}/{}", row.kind.short_name(), row.name),
            Self::Name => row.name.clone(),
            Self::Status => row.pod_counts.status.as_deref().unwrap_or(NO_DATA).to_owned(),
            Self::Meshed => format_meshed(&row.pod_counts),
            Self::Success => format_success_rate(stats.and_then(|s| s.success_rate)),
            Self::Rps => format_request_rate(stats.and_then(|s| s.request_rate)),
            Self::LatencyP50 => stats.map_or_else(no_data, |s| format_latency(s.latency_ms_p50)),
            Self::LatencyP95 => stats.map_or_else(no_data, |s| format_latency(s.latency_ms_p95)),
            Self::LatencyP99 => stats.map_or_else(no_data, |s| format_latency(s.latency_ms_p99)),
            Self::TcpConn => tcp.map_or_else(no_data, |t| t.open_connections.to_string()),
            Self::ReadBytes => format_byte_rate(tcp.and_then(|t| t.read_bytes_per_sec)),
            Self::WriteBytes => format_byte_rate(tcp.and_then(|t| t.write_bytes_per_sec)),
        }
    }
}

fn no_data() -> String {
    NO_DATA.to_owned()
}

impl Layout {
    fn columns(self, kind: ResourceKind) -> Vec<Column> {
        let mut columns = Vec::with_capacity(12);
        if self.all_namespaces {
            columns.push(Column::Namespace);
        }
        columns.push(Column::Name);
        if kind == ResourceKind::Pod {
            columns.push(Column::Status);
        }
        if kind != ResourceKind::Authority {
            columns.push(Column::Meshed);
        }
        columns.extend([
            Column::Success,
            Column::Rps,
            Column::LatencyP50,
            Column::LatencyP95,
            Column::LatencyP99,
            Column::TcpConn,
        ]);
        if self.wide {
            columns.extend([Column::ReadBytes, Column::WriteBytes]);
        }
        columns
    }
}

fn render_text(groups: &BTreeMap<ResourceKind, Vec<&Row>>, layout: Layout) -> String {
    if groups.is_empty() {
        return NO_TRAFFIC.to_owned();
    }
    groups
        .iter()
        .map(|(kind, rows)| render_group(*kind, rows, layout))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One aligned table for a single kind, newline-terminated.
fn render_group(kind: ResourceKind, rows: &[&Row], layout: Layout) -> String {
    let columns = layout.columns(kind);

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(columns.iter().map(|column| column.header()));
    for row in rows {
        table.add_row(columns.iter().map(|column| column.cell(row, layout.prefix_kind)));
    }

    let last = columns.len() - 1;
    for (idx, (table_column, column)) in table.column_iter_mut().zip(&columns).enumerate() {
        let gap = if idx == last { 0 } else { COLUMN_GAP };
        table_column.set_padding((0, gap));
        table_column.set_cell_alignment(column.alignment());
    }

    format!("{table}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::{MockApiClient, stat_summary_response};
    use crate::api::request_stats_from_api;
    use crate::stat::build_stat_summary_requests;
    use crate::stat::rows::{PodCounts, RowStats, TcpRates, resp_to_rows};

    /// Compare `output` with `testdata/<file>` byte for byte.
    fn diff_testdata(file: &str, output: &str) {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(file);
        let expected = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
        assert_eq!(output, expected, "output does not match {file}");
    }

    fn counts(meshed: u64, running: u64, status: Option<&str>) -> PodCounts {
        PodCounts {
            meshed,
            running,
            failed: 0,
            status: status.map(str::to_owned),
        }
    }

    /// Build requests for `stat ns`, answer them from a canned response, and
    /// render the rows.
    fn stat_call(kind: &str, namespaces: &[&str], counts: &PodCounts, options: &StatOptions) -> String {
        let client = MockApiClient {
            response: stat_summary_response("emoji", kind, namespaces, counts, true, true),
        };
        let args = vec!["ns".to_owned()];
        let requests = build_stat_summary_requests(&args, options).unwrap();
        let response = request_stats_from_api(&client, &requests[0]).unwrap();
        let rows = resp_to_rows(&response);
        render_stat_stats(&rows, options)
    }

    fn row(kind: ResourceKind, name: &str) -> Row {
        Row {
            kind,
            namespace: "emojivoto".to_owned(),
            name: name.to_owned(),
            pod_counts: counts(1, 1, None),
            stats: None,
            tcp: None,
        }
    }

    #[test]
    fn test_namespace_stats() {
        let output = stat_call("namespace", &["emojivoto1"], &counts(1, 2, None), &StatOptions::default());
        diff_testdata("stat_one_output.golden", &output);
    }

    #[test]
    fn test_pod_stats() {
        let output = stat_call(
            "pod",
            &["emojivoto1"],
            &counts(1, 1, Some("Running")),
            &StatOptions::default(),
        );
        diff_testdata("stat_one_pod_output.golden", &output);
        assert!(output.starts_with("NAME    STATUS"));
    }

    #[test]
    fn test_namespace_stats_json() {
        let options = StatOptions {
            output_format: OutputFormat::Json,
            ..StatOptions::default()
        };
        let output = stat_call("namespace", &["emojivoto1"], &counts(1, 2, None), &options);
        diff_testdata("stat_one_output_json.golden", &output);

        let parsed: Vec<StatRowOutput> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].meshed, Some(1));
        assert_eq!(parsed[0].running, Some(2));
        assert_eq!(parsed[0].failed, Some(0));
    }

    #[test]
    fn test_all_namespace_stats() {
        let options = StatOptions {
            all_namespaces: true,
            ..StatOptions::default()
        };
        let output = stat_call(
            "namespace",
            &["emojivoto1", "emojivoto2"],
            &counts(1, 2, None),
            &options,
        );
        diff_testdata("stat_all_output.golden", &output);
    }

    #[test]
    fn test_all_namespace_stats_json() {
        let options = StatOptions {
            all_namespaces: true,
            output_format: OutputFormat::Json,
            ..StatOptions::default()
        };
        let output = stat_call(
            "namespace",
            &["emojivoto1", "emojivoto2"],
            &counts(1, 2, None),
            &options,
        );
        diff_testdata("stat_all_output_json.golden", &output);
    }

    #[test]
    fn test_tcp_stats() {
        let options = StatOptions {
            output_format: OutputFormat::Wide,
            ..StatOptions::default()
        };
        let output = stat_call("namespace", &["emojivoto1"], &counts(1, 2, None), &options);
        diff_testdata("stat_one_tcp_output.golden", &output);
    }

    #[test]
    fn test_wide_is_column_superset() {
        let rows = vec![Row {
            stats: Some(RowStats::default()),
            tcp: Some(TcpRates::default()),
            ..row(ResourceKind::Deployment, "web")
        }];
        let table = render_stat_stats(&rows, &StatOptions::default());
        let wide = render_stat_stats(&rows, &StatOptions {
            output_format: OutputFormat::Wide,
            ..StatOptions::default()
        });

        let headers = |text: &str| -> Vec<String> {
            text.lines().next().unwrap().split_whitespace().map(str::to_owned).collect()
        };
        let table_headers = headers(&table);
        let wide_headers = headers(&wide);
        assert!(wide_headers.len() > table_headers.len());
        assert_eq!(&wide_headers[..table_headers.len()], table_headers.as_slice());
        assert!(wide_headers.contains(&"READ_BYTES/SEC".to_owned()));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let rows = vec![row(ResourceKind::Pod, "b"), row(ResourceKind::Deployment, "a")];
        for format in [OutputFormat::Table, OutputFormat::Wide, OutputFormat::Json] {
            let options = StatOptions {
                output_format: format,
                ..StatOptions::default()
            };
            assert_eq!(render_stat_stats(&rows, &options), render_stat_stats(&rows, &options));
        }
    }

    #[test]
    fn test_missing_stats_render_placeholders() {
        let output = render_stat_stats(&[row(ResourceKind::Deployment, "web")], &StatOptions::default());
        let data_line = output.lines().nth(1).unwrap();
        let cells: Vec<&str> = data_line.split_whitespace().collect();
        assert_eq!(cells, ["web", "1/1", "-", "-", "-", "-", "-", "-"]);
    }

    #[test]
    fn test_groups_by_kind_in_fixed_order() {
        let rows = vec![
            row(ResourceKind::Service, "web-svc"),
            row(ResourceKind::Pod, "web-1"),
            row(ResourceKind::Deployment, "web"),
            row(ResourceKind::Pod, "voting-1"),
        ];
        let output = render_stat_stats(&rows, &StatOptions::default());
        let names: Vec<&str> = output
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with("NAME"))
            .map(|line| line.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(names, ["po/web-1", "po/voting-1", "deploy/web", "svc/web-svc"]);
        assert_eq!(output.matches("\n\nNAME").count(), 2);
        assert!(output.lines().all(|line| line == line.trim_end()));
    }

    #[test]
    fn test_authority_has_no_meshed_column() {
        let output = render_stat_stats(&[row(ResourceKind::Authority, "web.svc:80")], &StatOptions::default());
        assert!(!output.contains("MESHED"));
        let json = render_stat_stats(&[row(ResourceKind::Authority, "web.svc:80")], &StatOptions {
            output_format: OutputFormat::Json,
            ..StatOptions::default()
        });
        assert!(!json.contains("\"meshed\""));
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(render_stat_stats(&[], &StatOptions::default()), "No traffic found.\n");
        let json = render_stat_stats(&[], &StatOptions {
            output_format: OutputFormat::Json,
            ..StatOptions::default()
        });
        assert_eq!(json, "[]\n");
    }

    #[test]
    #[should_panic(expected = "query-only kind")]
    fn test_rejects_all_kind_rows() {
        let _ = render_stat_stats(&[row(ResourceKind::All, "web")], &StatOptions::default());
    }

    #[test]
    #[should_panic(expected = "carries a pod status")]
    fn test_rejects_status_on_non_pod_rows() {
        let mut namespace = row(ResourceKind::Namespace, "emojivoto");
        namespace.pod_counts.status = Some("Running".to_owned());
        let mut pod = row(ResourceKind::Pod, "web-1");
        pod.pod_counts.status = Some("Running".to_owned());
        let _ = render_stat_stats(&[namespace, pod], &StatOptions::default());
    }

    #[test]
    fn test_accepts_status_on_pod_rows() {
        let mut pod = row(ResourceKind::Pod, "web-1");
        pod.pod_counts.status = Some("Running".to_owned());
        let output = render_stat_stats(&[pod], &StatOptions::default());
        assert!(output.contains("Running"));
    }
}
