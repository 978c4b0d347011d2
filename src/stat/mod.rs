/// Stat domain layer: request building, response flattening, rendering.
pub mod errors;
pub mod format;
pub mod options;
pub mod render;
pub mod request;
pub mod resource;
pub mod rows;

pub use errors::StatError;
pub use options::{OutputFormat, StatOptions};
pub use render::render_stat_stats;
pub use request::{StatSummaryRequest, build_stat_summary_requests};
pub use resource::ResourceKind;
pub use rows::{Row, resp_to_rows};
