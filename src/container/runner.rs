use std::path::Path;
use std::time::Duration;

use bollard::container::{
    Config, CreateContainerOptions, LogOutput, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, WaitContainerOptions,
};
use bollard::models::HostConfig;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::errors::PhalanxError;
use crate::models::ToolId;

use super::manager::ContainerManager;

/// How to launch one scanner inside the image.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool: ToolId,
    pub cmd: Vec<String>,
    /// Where the target project is bind-mounted (read-only) for this tool.
    pub mount_point: &'static str,
    pub timeout_secs: u64,
}

impl ToolInvocation {
    pub fn for_tool(tool: ToolId, timeout_secs: u64) -> Self {
        let (cmd, mount_point): (&[&str], &'static str) = match tool {
            ToolId::Psalm => (&["psalm", "--output-format=json"], "/app"),
            ToolId::Parse => (&["parse", "scan", "/app", "--format", "json"], "/app"),
            ToolId::Progpilot => (
                &[
                    "php",
                    "/home/phalanx/progpilot/src/ProgPilot.php",
                    "--level",
                    "high",
                    "--target",
                    "/workspace",
                    "--output=json",
                ],
                "/workspace",
            ),
        };
        Self {
            tool,
            cmd: cmd.iter().map(|s| s.to_string()).collect(),
            mount_point,
            timeout_secs,
        }
    }
}

/// What came out of one tool invocation. A failure carries no findings but
/// still counts as "this tool was invoked" downstream.
#[derive(Debug)]
pub enum ToolOutcome {
    Completed { stdout: String },
    Failed { reason: String },
}

#[derive(Debug)]
pub struct ToolRun {
    pub tool: ToolId,
    pub outcome: ToolOutcome,
}

impl ContainerManager {
    /// Run one scanner in an ephemeral hardened container and capture its
    /// stdout. Execution problems (daemon errors, crashes, timeouts) are
    /// folded into the returned `ToolRun`; they never abort the scan.
    pub async fn run_tool(
        &self,
        container_name: &str,
        invocation: &ToolInvocation,
        target_dir: &Path,
    ) -> ToolRun {
        let outcome = match self.try_run_tool(container_name, invocation, target_dir).await {
            Ok(stdout) => ToolOutcome::Completed { stdout },
            Err(e) => {
                warn!(tool = %invocation.tool, error = %e, "Tool execution failed");
                self.remove_container(container_name).await;
                ToolOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        ToolRun {
            tool: invocation.tool,
            outcome,
        }
    }

    async fn try_run_tool(
        &self,
        container_name: &str,
        invocation: &ToolInvocation,
        target_dir: &Path,
    ) -> Result<String, PhalanxError> {
        let host_config = HostConfig {
            binds: Some(vec![format!(
                "{}:{}:ro",
                target_dir.display(),
                invocation.mount_point
            )]),
            security_opt: Some(vec!["no-new-privileges".to_string()]),
            cap_drop: Some(vec!["ALL".to_string()]),
            network_mode: Some("none".to_string()),
            ..Default::default()
        };

        let config = Config {
            image: Some(self.image().to_string()),
            cmd: Some(invocation.cmd.clone()),
            host_config: Some(host_config),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: container_name,
            platform: None,
        };

        self.docker()
            .create_container(Some(options), config)
            .await
            .map_err(|e| PhalanxError::Container(format!("Failed to create container: {e}")))?;

        self.docker()
            .start_container(container_name, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| PhalanxError::Container(format!("Failed to start container: {e}")))?;

        let stdout = tokio::time::timeout(
            Duration::from_secs(invocation.timeout_secs),
            self.wait_and_collect(container_name, invocation.tool),
        )
        .await
        .map_err(|_| {
            PhalanxError::Timeout(format!(
                "{} timed out after {}s",
                invocation.tool, invocation.timeout_secs
            ))
        })??;

        self.remove_container(container_name).await;
        Ok(stdout)
    }

    /// Wait for the container to exit, then collect its stdout. A non-zero
    /// exit code is not a failure: scanners exit non-zero when they find
    /// issues, and the JSON payload is on stdout either way.
    async fn wait_and_collect(
        &self,
        container_name: &str,
        tool: ToolId,
    ) -> Result<String, PhalanxError> {
        let mut wait_stream = self
            .docker()
            .wait_container(container_name, None::<WaitContainerOptions<String>>);
        if let Some(result) = wait_stream.next().await {
            match result {
                Ok(response) => {
                    debug!(tool = %tool, status = response.status_code, "Container exited");
                }
                // bollard reports non-zero exits as errors on some daemons;
                // the logs are still there to collect.
                Err(e) => debug!(tool = %tool, error = %e, "Container wait ended with error"),
            }
        }

        let mut logs = self.docker().logs(
            container_name,
            Some(LogsOptions::<String> {
                stdout: true,
                stderr: true,
                ..Default::default()
            }),
        );

        let mut collected = String::new();
        while let Some(chunk) = logs.next().await {
            match chunk {
                Ok(LogOutput::StdOut { message }) => {
                    collected.push_str(&String::from_utf8_lossy(&message));
                }
                Ok(LogOutput::StdErr { message }) => {
                    debug!(tool = %tool, stderr = %String::from_utf8_lossy(&message).trim_end(), "Tool stderr");
                }
                Ok(_) => {}
                Err(e) => {
                    return Err(PhalanxError::Container(format!(
                        "Failed to collect output: {e}"
                    )));
                }
            }
        }

        Ok(collected)
    }

    async fn remove_container(&self, container_name: &str) {
        let result = self
            .docker()
            .remove_container(
                container_name,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await;
        if let Err(e) = result {
            debug!(container = %container_name, error = %e, "Container removal failed");
        }
    }
}
