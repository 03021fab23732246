use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::finding::{Finding, Severity};

/// Per-severity finding counts. A fixed struct rather than a map so all four
/// keys are always present in the serialized report, zero or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub critical: u64,
}

impl SeverityCounts {
    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.low + self.medium + self.high + self.critical
    }
}

/// Summary statistics computed once at aggregation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_findings: u64,
    /// Count per invoked tool. Every tool that ran appears here, including
    /// tools that reported nothing or failed outright (count 0).
    pub by_tool: BTreeMap<String, u64>,
    pub by_severity: SeverityCounts,
    /// ISO-8601 UTC, set once when aggregation completes.
    pub scan_timestamp: String,
    /// Version of this orchestrator, not of any scanner.
    pub tool_version: String,
}

/// The aggregate root: constructed once per scan, serialized once, then
/// discarded. Findings keep tool-invocation order, then the normalizer's
/// original order within each tool. Never re-sorted, never deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub findings: Vec<Finding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_counts_increment_and_total() {
        let mut counts = SeverityCounts::default();
        counts.increment(Severity::High);
        counts.increment(Severity::High);
        counts.increment(Severity::Low);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn severity_counts_serialize_all_keys_when_empty() {
        let json = serde_json::to_value(SeverityCounts::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["low", "medium", "high", "critical"] {
            assert_eq!(obj[key], 0, "missing or non-zero key {key}");
        }
    }

    #[test]
    fn summary_round_trip() {
        let mut by_tool = BTreeMap::new();
        by_tool.insert("psalm".to_string(), 3u64);
        by_tool.insert("parse".to_string(), 0u64);
        let summary = Summary {
            total_findings: 3,
            by_tool,
            by_severity: SeverityCounts {
                high: 3,
                ..Default::default()
            },
            scan_timestamp: "2025-01-01T00:00:00Z".to_string(),
            tool_version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: Summary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_findings, 3);
        assert_eq!(back.by_tool["parse"], 0);
    }
}
