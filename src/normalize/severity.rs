use crate::models::{Severity, ToolId};

/// A per-tool severity vocabulary: an enumerated token table plus the
/// fallback used for unrecognized tokens. Kept as plain data so each tool's
/// mapping can be tested and extended independently.
#[derive(Debug, Clone, Copy)]
pub struct SeverityMap {
    pub tool: ToolId,
    entries: &'static [(&'static str, Severity)],
    fallback: Severity,
}

impl SeverityMap {
    /// Map a raw severity token to the canonical scale. Total: trims and
    /// lowercases the token, then falls back rather than failing, so an
    /// unrecognized severity never aborts ingestion of a finding.
    pub fn resolve(&self, raw: &str) -> Severity {
        let token = raw.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, severity)| *severity)
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Severity {
        self.fallback
    }
}

/// Psalm reports `error`/`warning`/`info` (plus `notice` from plugins).
const PSALM: SeverityMap = SeverityMap {
    tool: ToolId::Psalm,
    entries: &[
        ("error", Severity::High),
        ("warning", Severity::Medium),
        ("info", Severity::Low),
        ("notice", Severity::Low),
    ],
    fallback: Severity::Medium,
};

/// psecio/parse uses free-text categories.
const PARSE: SeverityMap = SeverityMap {
    tool: ToolId::Parse,
    entries: &[
        ("critical", Severity::Critical),
        ("error", Severity::High),
        ("warning", Severity::Medium),
        ("notice", Severity::Low),
        ("info", Severity::Low),
    ],
    fallback: Severity::Medium,
};

/// ProgPilot emits textual tokens or numeric levels 1-4.
const PROGPILOT: SeverityMap = SeverityMap {
    tool: ToolId::Progpilot,
    entries: &[
        ("critical", Severity::Critical),
        ("error", Severity::High),
        ("warning", Severity::Medium),
        ("notice", Severity::Low),
        ("info", Severity::Low),
        ("4", Severity::Critical),
        ("3", Severity::High),
        ("2", Severity::Medium),
        ("1", Severity::Low),
    ],
    fallback: Severity::Medium,
};

/// The severity table for a given tool.
pub fn severity_map(tool: ToolId) -> &'static SeverityMap {
    match tool {
        ToolId::Psalm => &PSALM,
        ToolId::Parse => &PARSE,
        ToolId::Progpilot => &PROGPILOT,
    }
}

/// Convenience wrapper over the per-tool tables.
pub fn map_severity(tool: ToolId, raw_severity: &str) -> Severity {
    severity_map(tool).resolve(raw_severity)
}
