use serde::{Deserialize, Serialize};

use crate::models::ToolId;

/// Default per-tool wall-clock timeout.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PhalanxConfig {
    pub container: Option<ContainerConfig>,
    pub tools: Option<ToolsConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerConfig {
    /// Image tag holding all three scanners.
    pub image: Option<String>,
    /// Build context used when the image is missing or `--rebuild` is set.
    pub docker_dir: Option<String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            image: Some("phalanx".to_string()),
            docker_dir: Some("./docker".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ToolsConfig {
    pub psalm: Option<ToolConfig>,
    pub parse: Option<ToolConfig>,
    pub progpilot: Option<ToolConfig>,
}

impl ToolsConfig {
    pub fn for_tool(&self, tool: ToolId) -> Option<&ToolConfig> {
        match tool {
            ToolId::Psalm => self.psalm.as_ref(),
            ToolId::Parse => self.parse.as_ref(),
            ToolId::Progpilot => self.progpilot.as_ref(),
        }
    }

    /// A tool is enabled unless its config explicitly disables it.
    pub fn is_enabled(&self, tool: ToolId) -> bool {
        self.for_tool(tool)
            .and_then(|t| t.enabled)
            .unwrap_or(true)
    }

    pub fn timeout_secs(&self, tool: ToolId) -> u64 {
        self.for_tool(tool)
            .and_then(|t| t.timeout_secs)
            .unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ToolConfig {
    pub enabled: Option<bool>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub directory: Option<String>,
}
