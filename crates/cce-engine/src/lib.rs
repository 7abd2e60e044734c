//! Pipeline stage runners
//!
//! One module per CLI verb: ingest → plan → generate → review → export.
//! Data flows strictly forward through per-`(client, month)` artifacts;
//! each stage overwrites only its own artifact and fails fast (before
//! writing anything) when its predecessor artifact is missing or empty.

pub mod export;
pub mod generate;
pub mod ingest;
pub mod paths;
pub mod plan;
pub mod review;

pub use export::{ExportSummary, run_export};
pub use generate::{GenerateSummary, run_generate};
pub use ingest::{IngestSummary, run_ingest};
pub use paths::ClientPaths;
pub use plan::{PlanSummary, parse_month, run_plan};
pub use review::{ReviewSummary, run_review};
