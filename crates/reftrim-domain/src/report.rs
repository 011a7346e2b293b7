use crate::classify::Status;
use crate::model::ReferenceKind;
use reftrim_types::{Finding, ReftrimData, Severity, VerdictStatus};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = SeverityCounts::default();
        for f in findings {
            match f.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
            }
        }
        counts
    }
}

/// Classification outcome of one reference (or package group), diagnosed or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceOutcome {
    pub label: String,
    pub kind: ReferenceKind,
    pub status: Status,
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: VerdictStatus,
    pub findings: Vec<Finding>,
    pub data: ReftrimData,
    pub counts: SeverityCounts,
    pub outcomes: Vec<ReferenceOutcome>,
}
