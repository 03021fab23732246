//! Combines per-tool normalized batches into the final report.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};

use crate::models::{Finding, Report, SeverityCounts, Summary, ToolId};

/// Merge per-tool findings into one `Report`.
///
/// `per_tool_results` is ordered: callers pass tools in invocation order and
/// that order is preserved in the output, with each tool's own findings kept
/// in normalizer order. Every invoked tool gets a `by_tool` entry, so a tool
/// that failed or found nothing still shows up with a count of 0. The counts
/// are a single tally pass over the concatenated findings; nothing is
/// re-sorted or deduplicated.
pub fn aggregate(per_tool_results: Vec<(ToolId, Vec<Finding>)>, version: &str) -> Report {
    let mut by_tool: BTreeMap<String, u64> = per_tool_results
        .iter()
        .map(|(tool, _)| (tool.as_str().to_string(), 0))
        .collect();

    let mut findings = Vec::new();
    for (_, tool_findings) in per_tool_results {
        findings.extend(tool_findings);
    }

    let mut by_severity = SeverityCounts::default();
    for finding in &findings {
        *by_tool.entry(finding.tool.as_str().to_string()).or_insert(0) += 1;
        by_severity.increment(finding.severity);
    }

    Report {
        summary: Summary {
            total_findings: findings.len() as u64,
            by_tool,
            by_severity,
            scan_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tool_version: version.to_string(),
        },
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use std::collections::BTreeMap;

    fn finding(tool: ToolId, title: &str, severity: Severity) -> Finding {
        Finding {
            tool,
            title: title.to_string(),
            file: String::new(),
            line: 0,
            severity,
            code: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn counts_are_conserved() {
        let report = aggregate(
            vec![
                (
                    ToolId::Psalm,
                    vec![
                        finding(ToolId::Psalm, "a", Severity::High),
                        finding(ToolId::Psalm, "b", Severity::Low),
                    ],
                ),
                (
                    ToolId::Parse,
                    vec![finding(ToolId::Parse, "c", Severity::High)],
                ),
                (ToolId::Progpilot, vec![]),
            ],
            "0.1.0",
        );

        assert_eq!(report.summary.total_findings, 3);
        let tool_sum: u64 = report.summary.by_tool.values().sum();
        assert_eq!(tool_sum, report.summary.total_findings);
        assert_eq!(
            report.summary.by_severity.total(),
            report.summary.total_findings
        );
    }

    #[test]
    fn failed_tool_still_appears_with_zero() {
        let report = aggregate(
            vec![
                (
                    ToolId::Psalm,
                    vec![
                        finding(ToolId::Psalm, "a", Severity::Medium),
                        finding(ToolId::Psalm, "b", Severity::Medium),
                        finding(ToolId::Psalm, "c", Severity::Medium),
                    ],
                ),
                (ToolId::Parse, vec![]),
            ],
            "0.1.0",
        );
        assert_eq!(report.summary.total_findings, 3);
        assert_eq!(report.summary.by_tool["psalm"], 3);
        assert_eq!(report.summary.by_tool["parse"], 0);
        assert!(!report.summary.by_tool.contains_key("progpilot"));
    }

    #[test]
    fn invocation_order_is_preserved() {
        let report = aggregate(
            vec![
                (
                    ToolId::Progpilot,
                    vec![finding(ToolId::Progpilot, "first", Severity::Low)],
                ),
                (
                    ToolId::Psalm,
                    vec![
                        finding(ToolId::Psalm, "second", Severity::Low),
                        finding(ToolId::Psalm, "third", Severity::Low),
                    ],
                ),
            ],
            "0.1.0",
        );
        let titles: Vec<&str> = report.findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_scan_has_complete_summary() {
        let report = aggregate(
            ToolId::ALL.iter().map(|t| (*t, Vec::new())).collect(),
            "0.1.0",
        );
        assert_eq!(report.summary.total_findings, 0);
        assert_eq!(report.summary.by_tool.len(), 3);
        assert_eq!(report.summary.by_severity, SeverityCounts::default());
        assert_eq!(report.summary.tool_version, "0.1.0");
    }

    #[test]
    fn timestamp_is_utc_iso8601() {
        let report = aggregate(vec![], "0.1.0");
        assert!(report.summary.scan_timestamp.ends_with('Z'));
        assert!(report.summary.scan_timestamp.contains('T'));
    }
}
