/// `stat` command: build requests, query the API, render the rows.
use tracing::{debug, info};

use crate::api::{ApiError, ReplayClient, StatsApi, request_stats_from_api};
use crate::cli::OutputFormat;
use crate::cli::args::StatArgs;
use crate::cli::write_rendered;
use crate::stat::{
    Row, StatOptions, StatSummaryRequest, build_stat_summary_requests, render_stat_stats,
    resp_to_rows,
};

use super::CommandError;

/// Run `meshstat stat`.
///
/// # Errors
///
/// Returns `CommandError::Stat` for rejected flags or resources (before any
/// request is sent), `CommandError::Api` if the recording cannot be loaded
/// or the API answers with an error, and `CommandError::Output` if stdout
/// cannot be written.
pub fn run(args: &StatArgs, format: OutputFormat) -> Result<(), CommandError> {
    let options = args.to_options(format);
    let requests = build_stat_summary_requests(&args.resources, &options)?;

    let client = ReplayClient::from_path(&args.replay)?;
    let output = stat_output(&client, &requests, &options)?;
    write_rendered(&output)?;
    info!(requests = requests.len(), "stat complete");
    Ok(())
}

/// Send every request and render the combined rows.
///
/// Rows from all responses are concatenated in request order and rendered
/// once.
///
/// # Errors
///
/// Returns the first `ApiError` any request fails with.
pub fn stat_output(
    client: &dyn StatsApi,
    requests: &[StatSummaryRequest],
    options: &StatOptions,
) -> Result<String, ApiError> {
    let mut rows: Vec<Row> = Vec::new();
    for request in requests {
        let response = request_stats_from_api(client, request)?;
        let batch = resp_to_rows(&response);
        debug!(selector = %request.selector, rows = batch.len(), "received stat rows");
        rows.extend(batch);
    }

    Ok(render_stat_stats(&rows, options))
}
