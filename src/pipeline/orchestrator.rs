use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::container::{ContainerManager, ToolInvocation, ToolOutcome, ToolRun};
use crate::errors::PhalanxError;
use crate::models::{Finding, Report, ToolId};
use crate::normalize::normalizer_for;
use crate::reporting::{aggregate, write_report};

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub scan_id: String,
    /// Validated, absolute path to the PHP project being scanned.
    pub target: PathBuf,
    pub output_path: PathBuf,
    pub image: String,
    pub docker_dir: PathBuf,
    pub rebuild: bool,
    pub quiet: bool,
    /// Enabled tools in invocation order.
    pub tools: Vec<ToolInvocation>,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub report: Report,
    pub tools_reporting: usize,
    pub tools_invoked: usize,
}

pub struct ScanOrchestrator {
    config: ScanConfig,
    container: ContainerManager,
}

impl ScanOrchestrator {
    pub fn new(config: ScanConfig) -> Result<Self, PhalanxError> {
        let container = ContainerManager::new(&config.image)?;
        Ok(Self { config, container })
    }

    /// Run every enabled tool, normalize, aggregate, and persist the report.
    ///
    /// A tool that crashes, times out, or emits garbage degrades the report;
    /// only two things fail the scan: every tool failing, or the report
    /// itself being unwritable.
    pub async fn run(&self) -> Result<ScanOutcome, PhalanxError> {
        info!(
            scan_id = %self.config.scan_id,
            target = %self.config.target.display(),
            "Starting scan"
        );

        self.container
            .ensure_image(&self.config.docker_dir, self.config.rebuild)
            .await?;

        let short_id = &self.config.scan_id[..self.config.scan_id.len().min(8)];
        let mut runs = Vec::new();
        for invocation in &self.config.tools {
            let spinner = self.spinner(invocation.tool);
            let container_name = format!("phalanx-{}-{}", invocation.tool, short_id);
            let run = self
                .container
                .run_tool(&container_name, invocation, &self.config.target)
                .await;
            if let Some(pb) = spinner {
                match &run.outcome {
                    ToolOutcome::Completed { .. } => {
                        pb.finish_with_message(format!("{} finished", invocation.tool));
                    }
                    ToolOutcome::Failed { reason } => {
                        pb.finish_with_message(format!("{} failed: {reason}", invocation.tool));
                    }
                }
            }
            runs.push(run);
        }

        let tools_invoked = runs.len();
        let (per_tool, tools_reporting) = normalize_tool_runs(&runs);
        if tools_invoked > 0 && tools_reporting == 0 {
            return Err(PhalanxError::ScanFailed(format!(
                "all {tools_invoked} tools failed to produce output"
            )));
        }

        let report = aggregate(per_tool, env!("CARGO_PKG_VERSION"));
        write_report(&report, &self.config.output_path).await?;

        info!(
            scan_id = %self.config.scan_id,
            total_findings = report.summary.total_findings,
            tools_reporting,
            tools_invoked,
            "Scan completed"
        );

        Ok(ScanOutcome {
            report,
            tools_reporting,
            tools_invoked,
        })
    }

    fn spinner(&self, tool: ToolId) -> Option<ProgressBar> {
        if self.config.quiet {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("static spinner template"),
        );
        pb.set_message(format!("Running {tool}..."));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}

/// Turn raw tool runs into per-tool finding batches, preserving invocation
/// order. Failed runs contribute an empty batch under their tool id so the
/// report stays explicit about what was invoked. Returns the batches and the
/// number of tools that actually produced output.
pub fn normalize_tool_runs(runs: &[ToolRun]) -> (Vec<(ToolId, Vec<Finding>)>, usize) {
    let mut per_tool = Vec::new();
    let mut reporting = 0;

    for run in runs {
        match &run.outcome {
            ToolOutcome::Completed { stdout } => {
                reporting += 1;
                let batch = normalizer_for(run.tool).normalize(stdout);
                for error in &batch.errors {
                    warn!(tool = %run.tool, error = %error, "Recovered normalization problem");
                }
                info!(
                    tool = %run.tool,
                    findings = batch.findings.len(),
                    recovered_errors = batch.errors.len(),
                    "Tool output normalized"
                );
                per_tool.push((run.tool, batch.findings));
            }
            ToolOutcome::Failed { reason } => {
                warn!(tool = %run.tool, reason = %reason, "Tool contributed no findings");
                per_tool.push((run.tool, Vec::new()));
            }
        }
    }

    (per_tool, reporting)
}
