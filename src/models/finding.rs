use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical severity scale shared by every scanner, ordered from most to
/// least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the scanner that produced a finding. Closed set: one variant
/// per integrated tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    Psalm,
    Parse,
    Progpilot,
}

impl ToolId {
    pub const ALL: [ToolId; 3] = [ToolId::Psalm, ToolId::Parse, ToolId::Progpilot];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Psalm => "psalm",
            ToolId::Parse => "parse",
            ToolId::Progpilot => "progpilot",
        }
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized security finding.
///
/// Every field is fully populated before the finding leaves its normalizer:
/// unknown locations are the empty string / line 0, never nulls, and the
/// string fields are already truncated to their documented bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// The scanner that reported this finding.
    pub tool: ToolId,
    /// Short human description, at most 500 characters.
    pub title: String,
    /// Reported file path, at most 1000 characters; empty when unknown.
    pub file: String,
    /// 1-based line number; 0 means unknown or not applicable.
    pub line: u32,
    pub severity: Severity,
    /// Source snippet, at most 1000 characters; empty when not reported.
    pub code: String,
    /// Tool-specific auxiliary fields (rule id, doc link, confidence).
    /// String values are individually bounded to 500 characters.
    pub metadata: BTreeMap<String, serde_json::Value>,
}
