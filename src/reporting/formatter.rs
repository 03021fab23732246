use std::path::Path;

use console::style;

use crate::models::Report;

/// Human summary printed to stdout after a scan. The JSON report is the
/// artifact; this block is for the operator at the terminal.
pub fn format_scan_summary(
    report: &Report,
    tools_reporting: usize,
    tools_invoked: usize,
    report_path: &Path,
) -> String {
    let divider = "=".repeat(60);
    let severity = &report.summary.by_severity;

    let mut out = String::new();
    out.push_str(&format!("{divider}\n"));
    out.push_str(&format!(
        "{} — scan complete ({tools_reporting}/{tools_invoked} tools reporting)\n",
        style("PHALANX").bold()
    ));
    out.push_str(&format!("{divider}\n"));
    out.push_str(&format!(
        "Total findings: {}\n",
        style(report.summary.total_findings).bold()
    ));
    out.push_str(&format!(
        "  Critical: {}\n",
        style(severity.critical).red().bold()
    ));
    out.push_str(&format!("  High:     {}\n", style(severity.high).red()));
    out.push_str(&format!("  Medium:   {}\n", style(severity.medium).yellow()));
    out.push_str(&format!("  Low:      {}\n", style(severity.low).green()));
    out.push_str("\nFindings by tool:\n");
    for (tool, count) in &report.summary.by_tool {
        out.push_str(&format!("  {tool}: {count}\n"));
    }
    out.push_str(&format!("\nReport saved to: {}\n", report_path.display()));
    out.push_str(&format!("{divider}\n"));
    out
}
