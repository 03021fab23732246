//! Normalizer for psecio/parse (`parse scan --format json`).
//!
//! Findings live under a top-level `findings` array. The scanner titles
//! records inconsistently (`title` or `message`) and may report `null` for
//! locations it could not attribute; nulls map to the unknown defaults. A
//! record without a severity counts as a `warning`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{Finding, ToolId};
use crate::utils::truncation::{truncate_code, truncate_file, truncate_title};

use super::severity::{severity_map, SeverityMap};
use super::{
    json_type_name, line_field, metadata_value, text_field, NormalizationError, NormalizedBatch,
    Normalizer,
};

pub struct ParseNormalizer;

impl Normalizer for ParseNormalizer {
    fn tool(&self) -> ToolId {
        ToolId::Parse
    }

    fn severity_map(&self) -> &'static SeverityMap {
        severity_map(ToolId::Parse)
    }

    fn normalize(&self, raw_output: &str) -> NormalizedBatch {
        let mut batch = NormalizedBatch::new(self.tool());
        if raw_output.trim().is_empty() {
            return batch;
        }

        let payload: Value = match serde_json::from_str(raw_output.trim()) {
            Ok(value) => value,
            Err(err) => {
                batch.errors.push(NormalizationError::Parse {
                    message: err.to_string(),
                });
                return batch;
            }
        };

        let findings = match payload.get("findings") {
            None => return batch,
            Some(Value::Array(items)) => items,
            Some(other) => {
                batch.errors.push(NormalizationError::Parse {
                    message: format!("expected \"findings\" array, got {}", json_type_name(other)),
                });
                return batch;
            }
        };

        for (index, record) in findings.iter().enumerate() {
            if !record.is_object() {
                batch.errors.push(NormalizationError::PartialRecord {
                    record_index: index,
                    message: format!("expected object, got {}", json_type_name(record)),
                });
                continue;
            }

            let raw_severity = match record.get("severity") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => "warning".to_string(),
            };
            let mut metadata = BTreeMap::new();
            metadata.insert("rule".to_string(), metadata_value(record, "rule"));

            batch.findings.push(Finding {
                tool: self.tool(),
                title: truncate_title(&text_field(record, &["title", "message"])),
                file: truncate_file(&text_field(record, &["file"])),
                line: line_field(record, "line"),
                severity: self.severity_map().resolve(&raw_severity),
                code: truncate_code(&text_field(record, &["code"])),
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
        ParseNormalizer.normalize(raw)
    }

    #[test]
    fn maps_finding_fields() {
        let raw = r#"{"findings": [{
            "title": "Avoid eval()",
            "file": "/app/legacy.php",
            "line": 7,
            "severity": "critical",
            "code": "eval($input);",
            "rule": "no-eval"
        }]}"#;
        let batch = normalize(raw);
        assert!(batch.errors.is_empty());
        let finding = &batch.findings[0];
        assert_eq!(finding.tool, ToolId::Parse);
        assert_eq!(finding.title, "Avoid eval()");
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.metadata["rule"], "no-eval");
    }

    #[test]
    fn title_falls_back_to_message() {
        let raw = r#"{"findings": [{"message": "from message"}]}"#;
        let batch = normalize(raw);
        assert_eq!(batch.findings[0].title, "from message");
    }

    #[test]
    fn null_locations_become_unknown_defaults() {
        let raw = r#"{"findings": [{"title": "t", "file": null, "line": null}]}"#;
        let batch = normalize(raw);
        let finding = &batch.findings[0];
        assert_eq!(finding.file, "");
        assert_eq!(finding.line, 0);
    }

    #[test]
    fn missing_severity_counts_as_warning() {
        let raw = r#"{"findings": [{"title": "t"}]}"#;
        let batch = normalize(raw);
        assert_eq!(batch.findings[0].severity, Severity::Medium);
    }

    #[test]
    fn missing_line_defaults_to_zero_not_error() {
        let raw = r#"{"findings": [{"title": "t", "file": "/app/a.php"}]}"#;
        let batch = normalize(raw);
        assert!(batch.errors.is_empty());
        assert_eq!(batch.findings[0].line, 0);
    }

    #[test]
    fn empty_inputs_yield_empty_batch() {
        for raw in ["", "{}", r#"{"findings": []}"#] {
            let batch = normalize(raw);
            assert!(batch.findings.is_empty());
            assert!(batch.errors.is_empty());
        }
    }

    #[test]
    fn garbage_yields_recoverable_parse_error() {
        let batch = normalize("<html>502 Bad Gateway</html>");
        assert!(batch.findings.is_empty());
        assert!(matches!(batch.errors[0], NormalizationError::Parse { .. }));
    }
}
