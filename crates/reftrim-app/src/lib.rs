//! Use case orchestration for reftrim.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod analyze;
mod explain;
mod ignore;
mod render;
mod report;

pub use analyze::{AnalyzeError, AnalyzeInput, AnalyzeOutput, run_analyze, try_analyze};
pub use explain::{
    CodeOutcome, ExplainOutput, ExplainTopic, format_explanation, format_not_found, run_explain,
};
pub use ignore::LabelIgnore;
pub use render::{render_annotations, render_markdown};
pub use report::{
    parse_report_json, runtime_error_report, serialize_report, skip_report, to_renderable,
    without_timing,
};
