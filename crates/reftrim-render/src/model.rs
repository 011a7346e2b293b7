#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: Option<String>,
    pub code: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub help: Option<String>,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub project: String,
    pub target: Option<String>,
    pub findings_emitted: u32,
    pub findings_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub reasons: Vec<String>,
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}
