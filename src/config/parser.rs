use std::path::Path;

use tracing::warn;

use crate::errors::PhalanxError;
use crate::models::ToolId;

use super::schema::CONFIG_SCHEMA;
use super::types::PhalanxConfig;

pub async fn parse_config(path: &Path) -> Result<PhalanxConfig, PhalanxError> {
    if !path.exists() {
        return Err(PhalanxError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(PhalanxError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: PhalanxConfig = serde_yaml::from_value(yaml)?;

    // Semantic validation
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), PhalanxError> {
    // Convert YAML value to JSON for schema validation
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| PhalanxError::Config(format!("Config conversion error: {e}")))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| PhalanxError::Config(format!("Config conversion error: {e}")))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| PhalanxError::Config(format!("Schema compilation error: {e}")))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Warn but don't fail — schema validation is advisory
        for err in errors {
            warn!(validation_error = %err, path = %err.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// A scan with every scanner disabled can never produce a report.
fn validate_semantics(config: &PhalanxConfig) -> Result<(), PhalanxError> {
    if let Some(tools) = &config.tools {
        if ToolId::ALL.iter().all(|tool| !tools.is_enabled(*tool)) {
            return Err(PhalanxError::Config(
                "All tools are disabled; enable at least one of psalm, parse, progpilot".into(),
            ));
        }
    }
    Ok(())
}
