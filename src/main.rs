#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! meshstat: query and render service-mesh traffic statistics.

mod api;
mod cli;
mod commands;
mod stat;
mod types;

use clap::Parser;

use cli::{Cli, init_logging, write_error};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = cli.format();
    match commands::dispatch(&cli.command, format) {
        Ok(()) => {}
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            let error_output = ErrorOutput::from_command_error(&err);
            write_error(&error_output, format);
            std::process::exit(err.exit_code());
        }
    }
}
