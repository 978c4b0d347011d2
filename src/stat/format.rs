/// Cell formatters shared by the table layouts.
///
/// Output never depends on the locale: fixed precision, `.` as the decimal
/// separator, no thousands grouping.
use super::rows::PodCounts;

/// Shown in place of a value the API did not report.
pub const NO_DATA: &str = "-";

#[must_use]
pub fn format_meshed(counts: &PodCounts) -> String {
    format!("{}/{}", counts.meshed, counts.running)
}

/// `0.95` → `95.00%`.
#[must_use]
pub fn format_success_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| NO_DATA.to_owned(), |r| format!("{:.2}%", r * 100.0))
}

/// `2.0` → `2.0rps`.
#[must_use]
pub fn format_request_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| NO_DATA.to_owned(), |r| format!("{r:.1}rps"))
}

#[must_use]
pub fn format_latency(ms: u64) -> String {
    format!("{ms}ms")
}

/// `120.0` → `120.0B/s`.
#[must_use]
pub fn format_byte_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| NO_DATA.to_owned(), |r| format!("{r:.1}B/s"))
}
