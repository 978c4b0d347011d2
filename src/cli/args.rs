/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use crate::stat::OutputFormat;
use crate::stat::StatOptions;

/// meshstat: query and render service-mesh traffic statistics.
#[derive(Debug, Parser)]
#[command(
    name = "meshstat",
    about = "Query and render service-mesh traffic statistics from the CLI",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, global = true, value_name = "FORMAT", default_value = "table")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Log request building and API calls to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The effective output format, honouring `--json`.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display traffic stats about one or many resources.
    Stat(StatArgs),
}

/// Arguments for `meshstat stat`.
#[derive(Debug, Parser)]
pub struct StatArgs {
    /// Resource type, optionally followed by names: `deploy`, `deploy web`,
    /// `deploy/web po/web-1`. Types: namespace, pod, deployment,
    /// replicationcontroller, service, authority, all.
    #[arg(required = true, value_name = "RESOURCE")]
    pub resources: Vec<String>,

    /// Namespace of the specified resource.
    #[arg(short, long, env = "MESHSTAT_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Stat window (for example: "10s", "1m", "10m", "1h").
    #[arg(short, long, value_name = "WINDOW", default_value = "1m")]
    pub time_window: String,

    /// Only show traffic sent to this resource.
    #[arg(long, value_name = "RESOURCE")]
    pub to: Option<String>,

    /// Namespace of the --to resource (defaults to --namespace).
    #[arg(long, value_name = "NAMESPACE")]
    pub to_namespace: Option<String>,

    /// Only show traffic coming from this resource.
    #[arg(long, value_name = "RESOURCE")]
    pub from: Option<String>,

    /// Namespace of the --from resource (defaults to --namespace).
    #[arg(long, value_name = "NAMESPACE")]
    pub from_namespace: Option<String>,

    /// Query every namespace; the NAMESPACE column is added to the output.
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Recorded stat summary response (JSON) to answer requests from; `-` reads stdin.
    #[arg(long, value_name = "FILE")]
    pub replay: PathBuf,
}

impl StatArgs {
    /// Freeze these arguments into the options for one invocation.
    #[must_use]
    pub fn to_options(&self, output_format: OutputFormat) -> StatOptions {
        StatOptions {
            namespace: self.namespace.clone(),
            time_window: self.time_window.clone(),
            to_resource: self.to.clone(),
            to_namespace: self.to_namespace.clone(),
            from_resource: self.from.clone(),
            from_namespace: self.from_namespace.clone(),
            all_namespaces: self.all_namespaces,
            output_format,
        }
    }
}
