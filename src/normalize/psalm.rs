//! Normalizer for Psalm (`psalm --output-format=json`).
//!
//! Psalm reports issues under a top-level `issues` array. Its stdout can
//! interleave progress lines around the JSON document, so the payload is
//! extracted rather than parsed verbatim. The `type` and `link` fields are
//! carried into metadata for rule identification and documentation.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{Finding, ToolId};
use crate::utils::truncation::{truncate_code, truncate_file, truncate_title};

use super::severity::{severity_map, SeverityMap};
use super::{
    extract_json_payload, json_type_name, line_field, metadata_value, text_field,
    NormalizationError, NormalizedBatch, Normalizer,
};

pub struct PsalmNormalizer;

impl Normalizer for PsalmNormalizer {
    fn tool(&self) -> ToolId {
        ToolId::Psalm
    }

    fn severity_map(&self) -> &'static SeverityMap {
        severity_map(ToolId::Psalm)
    }

    fn normalize(&self, raw_output: &str) -> NormalizedBatch {
        let mut batch = NormalizedBatch::new(self.tool());
        if raw_output.trim().is_empty() {
            return batch;
        }

        let Some(payload) = extract_json_payload(raw_output) else {
            batch.errors.push(NormalizationError::Parse {
                message: "no JSON document found in Psalm output".to_string(),
            });
            return batch;
        };

        let issues = match payload.get("issues") {
            None => return batch,
            Some(Value::Array(items)) => items,
            Some(other) => {
                batch.errors.push(NormalizationError::Parse {
                    message: format!("expected \"issues\" array, got {}", json_type_name(other)),
                });
                return batch;
            }
        };

        for (index, issue) in issues.iter().enumerate() {
            if !issue.is_object() {
                batch.errors.push(NormalizationError::PartialRecord {
                    record_index: index,
                    message: format!("expected object, got {}", json_type_name(issue)),
                });
                continue;
            }

            let severity = self.severity_map().resolve(&text_field(issue, &["severity"]));
            let mut metadata = BTreeMap::new();
            metadata.insert("type".to_string(), metadata_value(issue, "type"));
            metadata.insert("link".to_string(), metadata_value(issue, "link"));

            batch.findings.push(Finding {
                tool: self.tool(),
                title: truncate_title(&text_field(issue, &["message"])),
                file: truncate_file(&text_field(issue, &["file_name"])),
                line: line_field(issue, "line_from"),
                severity,
                code: truncate_code(text_field(issue, &["snippet"]).trim()),
                metadata,
            });
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn normalize(raw: &str) -> NormalizedBatch {
        PsalmNormalizer.normalize(raw)
    }

    #[test]
    fn maps_issue_fields() {
        let raw = r#"{"issues": [{
            "message": "Possibly unused variable",
            "file_name": "/app/src/User.php",
            "line_from": 42,
            "severity": "error",
            "snippet": "  $unused = load();  ",
            "type": "UnusedVariable",
            "link": "https://psalm.dev/024"
        }]}"#;
        let batch = normalize(raw);
        assert!(batch.errors.is_empty());
        assert_eq!(batch.findings.len(), 1);
        let finding = &batch.findings[0];
        assert_eq!(finding.tool, ToolId::Psalm);
        assert_eq!(finding.title, "Possibly unused variable");
        assert_eq!(finding.file, "/app/src/User.php");
        assert_eq!(finding.line, 42);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.code, "$unused = load();");
        assert_eq!(finding.metadata["type"], "UnusedVariable");
        assert_eq!(finding.metadata["link"], "https://psalm.dev/024");
    }

    #[test]
    fn extracts_payload_from_noisy_stdout() {
        let raw = "Scanning files...\nTarget PHP version 8.2\n{\"issues\":[{\"message\":\"x\",\"severity\":\"info\"}]}";
        let batch = normalize(raw);
        assert_eq!(batch.findings.len(), 1);
        assert_eq!(batch.findings[0].severity, Severity::Low);
    }

    #[test]
    fn empty_inputs_yield_empty_batch_without_errors() {
        for raw in ["", "   \n", "{}", r#"{"issues": []}"#] {
            let batch = normalize(raw);
            assert!(batch.findings.is_empty(), "input {raw:?}");
            assert!(batch.errors.is_empty(), "input {raw:?}");
        }
    }

    #[test]
    fn garbage_yields_recoverable_parse_error() {
        let batch = normalize("not json at all");
        assert!(batch.findings.is_empty());
        assert_eq!(batch.errors.len(), 1);
        assert!(matches!(batch.errors[0], NormalizationError::Parse { .. }));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let batch = normalize(r#"{"issues": [{}]}"#);
        assert_eq!(batch.findings.len(), 1);
        let finding = &batch.findings[0];
        assert_eq!(finding.title, "");
        assert_eq!(finding.file, "");
        assert_eq!(finding.line, 0);
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.metadata["type"], "");
        assert_eq!(finding.metadata["link"], "");
    }

    #[test]
    fn malformed_record_does_not_lose_the_rest() {
        let raw = r#"{"issues": [17, {"message": "kept", "severity": "warning"}]}"#;
        let batch = normalize(raw);
        assert_eq!(batch.findings.len(), 1);
        assert_eq!(batch.findings[0].title, "kept");
        assert_eq!(batch.errors.len(), 1);
        assert!(matches!(
            batch.errors[0],
            NormalizationError::PartialRecord { record_index: 0, .. }
        ));
    }

    #[test]
    fn long_title_truncates_to_valid_prefix() {
        let long = "a".repeat(2_000);
        let raw = format!(r#"{{"issues": [{{"message": "{long}"}}]}}"#);
        let batch = normalize(&raw);
        let title = &batch.findings[0].title;
        assert_eq!(title.chars().count(), 500);
        assert!(long.starts_with(title));
    }
}
