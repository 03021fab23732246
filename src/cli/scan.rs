use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cli::commands::ScanArgs;
use crate::config::{self, PhalanxConfig, ToolsConfig};
use crate::container::ToolInvocation;
use crate::errors::PhalanxError;
use crate::models::ToolId;
use crate::pipeline::{ScanConfig, ScanOrchestrator};
use crate::reporting::formatter::format_scan_summary;

pub async fn handle_scan(args: ScanArgs, quiet: bool) -> Result<(), PhalanxError> {
    info!(target = %args.target, "Starting PHP security scan");

    let file_config = if let Some(config_path) = &args.config {
        Some(config::parse_config(&PathBuf::from(config_path)).await?)
    } else {
        None
    };

    let target = validate_target(&args.target)?;
    let scan_config = build_scan_config(&args, target, file_config.as_ref(), quiet)?;
    let output_path = scan_config.output_path.clone();

    let orchestrator = ScanOrchestrator::new(scan_config)?;
    let outcome = orchestrator.run().await?;

    if !quiet {
        print!(
            "{}",
            format_scan_summary(
                &outcome.report,
                outcome.tools_reporting,
                outcome.tools_invoked,
                &output_path,
            )
        );
    }

    Ok(())
}

/// The target must be an existing, readable directory; everything else about
/// it (contents, size) is the scanners' business.
fn validate_target(raw: &str) -> Result<PathBuf, PhalanxError> {
    let path = Path::new(raw);
    if !path.is_dir() {
        return Err(PhalanxError::InvalidTarget(format!(
            "'{raw}' is not a directory"
        )));
    }
    path.canonicalize()
        .map_err(|e| PhalanxError::InvalidTarget(format!("cannot resolve '{raw}': {e}")))
}

fn build_scan_config(
    args: &ScanArgs,
    target: PathBuf,
    file_config: Option<&PhalanxConfig>,
    quiet: bool,
) -> Result<ScanConfig, PhalanxError> {
    let container = file_config
        .and_then(|c| c.container.clone())
        .unwrap_or_default();
    let default_tools = ToolsConfig::default();
    let tools_config = file_config.and_then(|c| c.tools.as_ref()).unwrap_or(&default_tools);

    // Fixed invocation order; config can only drop tools, not reorder them.
    let tools: Vec<ToolInvocation> = ToolId::ALL
        .iter()
        .filter(|tool| tools_config.is_enabled(**tool))
        .map(|tool| {
            let timeout = args.timeout.unwrap_or_else(|| tools_config.timeout_secs(*tool));
            ToolInvocation::for_tool(*tool, timeout)
        })
        .collect();

    if tools.is_empty() {
        return Err(PhalanxError::Config(
            "No tools enabled; nothing to scan with".into(),
        ));
    }

    Ok(ScanConfig {
        scan_id: uuid::Uuid::new_v4().to_string(),
        target,
        output_path: resolve_output_path(args.output.as_deref(), file_config),
        image: container.image.unwrap_or_else(|| "phalanx".to_string()),
        docker_dir: PathBuf::from(
            container.docker_dir.unwrap_or_else(|| "./docker".to_string()),
        ),
        rebuild: args.rebuild,
        quiet,
        tools,
    })
}

fn resolve_output_path(requested: Option<&str>, file_config: Option<&PhalanxConfig>) -> PathBuf {
    match requested {
        Some(raw) => {
            let mut path = PathBuf::from(raw);
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                warn!(path = %path.display(), "Output file should have .json extension, appending it");
                let mut name = path.file_name().unwrap_or_default().to_os_string();
                name.push(".json");
                path.set_file_name(name);
            }
            path
        }
        None => {
            let directory = file_config
                .and_then(|c| c.output.as_ref())
                .and_then(|o| o.directory.clone())
                .unwrap_or_else(|| ".".to_string());
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(directory).join(format!("phalanx-report-{timestamp}.json"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_args(output: Option<&str>) -> ScanArgs {
        ScanArgs {
            target: ".".to_string(),
            output: output.map(|s| s.to_string()),
            config: None,
            rebuild: false,
            timeout: None,
        }
    }

    #[test]
    fn invalid_target_is_rejected() {
        assert!(matches!(
            validate_target("/definitely/not/a/real/dir"),
            Err(PhalanxError::InvalidTarget(_))
        ));
    }

    #[test]
    fn json_extension_is_appended() {
        let path = resolve_output_path(Some("/tmp/report"), None);
        assert_eq!(path, PathBuf::from("/tmp/report.json"));
        let kept = resolve_output_path(Some("/tmp/report.json"), None);
        assert_eq!(kept, PathBuf::from("/tmp/report.json"));
    }

    #[test]
    fn default_output_is_timestamped_json() {
        let path = resolve_output_path(None, None);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("phalanx-report-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn all_tools_run_by_default_in_fixed_order() {
        let config =
            build_scan_config(&scan_args(None), PathBuf::from("."), None, false).unwrap();
        let order: Vec<ToolId> = config.tools.iter().map(|t| t.tool).collect();
        assert_eq!(order, vec![ToolId::Psalm, ToolId::Parse, ToolId::Progpilot]);
    }

    #[test]
    fn cli_timeout_overrides_config() {
        let mut args = scan_args(None);
        args.timeout = Some(30);
        let config = build_scan_config(&args, PathBuf::from("."), None, false).unwrap();
        assert!(config.tools.iter().all(|t| t.timeout_secs == 30));
    }

    #[test]
    fn disabled_tool_is_not_invoked() {
        let file_config = PhalanxConfig {
            tools: Some(ToolsConfig {
                parse: Some(crate::config::ToolConfig {
                    enabled: Some(false),
                    timeout_secs: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = build_scan_config(
            &scan_args(None),
            PathBuf::from("."),
            Some(&file_config),
            false,
        )
        .unwrap();
        let order: Vec<ToolId> = config.tools.iter().map(|t| t.tool).collect();
        assert_eq!(order, vec![ToolId::Psalm, ToolId::Progpilot]);
    }
}
