//! Renders the aggregated report to its persisted JSON form.

use std::path::Path;

use tracing::info;

use crate::errors::PhalanxError;
use crate::models::Report;

/// Serialize the report to pretty-printed UTF-8 JSON. serde_json escapes
/// quotes, control characters, and arbitrary snippet content, so the output
/// stays valid JSON no matter what the scanned sources contained. This is
/// the one step of the pipeline where failure is fatal: without it the user
/// gets no output at all.
pub fn serialize(report: &Report) -> Result<String, PhalanxError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| PhalanxError::Serialization(format!("cannot serialize report: {e}")))
}

/// Serialize and persist the report.
pub async fn write_report(report: &Report, path: &Path) -> Result<(), PhalanxError> {
    let json = serialize(report)?;
    tokio::fs::write(path, &json).await.map_err(|e| {
        PhalanxError::Serialization(format!("cannot write report to {}: {e}", path.display()))
    })?;
    info!(
        path = %path.display(),
        findings = report.summary.total_findings,
        "Report written"
    );
    Ok(())
}
