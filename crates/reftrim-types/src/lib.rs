//! Stable DTOs and IDs used across the reftrim workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs, codes and the four diagnostic categories
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod category;
pub mod explain;
pub mod ids;
pub mod receipt;

pub use category::DiagnosticCategory;
pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use receipt::{
    Finding, Location, ReftrimData, ReftrimReport, ReportEnvelope, RunMeta, SCHEMA_REPORT_V1,
    Severity, ToolMeta, Verdict, VerdictCounts, VerdictStatus,
};
