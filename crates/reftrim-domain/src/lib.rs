//! Reference usage resolution (no IO).
//!
//! Input: declared references, a resolved package graph and the compiler's
//! used-module report, all constructed elsewhere.
//! Output: per-reference assessments, findings, verdict and summary data.

#![forbid(unsafe_code)]

pub mod classify;
pub mod emit;
pub mod fingerprint;
pub mod graph;
pub mod model;
pub mod policy;
pub mod report;
pub mod transitive;

mod engine;

pub use engine::{AnalysisInput, evaluate};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
