/// CLI layer: argument parsing, logging and output writing.
pub mod args;
pub mod output;

pub use args::{Cli, OutputFormat};
pub use output::{init_logging, write_error, write_rendered};
