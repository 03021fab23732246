//! Normalizer for ProgPilot (`--output=json`).
//!
//! ProgPilot emits one of two shapes depending on how the run went:
//! `{"results": [...]}` with structured findings, or `{"error": {...}}`
//! when its engine hit a fatal parse error. The shape is detected by key
//! presence. A `confidence` value, when reported, is preserved verbatim in
//! metadata alongside the rule name.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{Finding, ToolId};
use crate::utils::truncation::{truncate_code, truncate_file, truncate_title};

use super::severity::{severity_map, SeverityMap};
use super::{
    json_type_name, line_field, metadata_value, text_field, NormalizationError, NormalizedBatch,
    Normalizer,
};

pub struct ProgpilotNormalizer;

impl Normalizer for ProgpilotNormalizer {
    fn tool(&self) -> ToolId {
        ToolId::Progpilot
    }

    fn severity_map(&self) -> &'static SeverityMap {
        severity_map(ToolId::Progpilot)
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

        let results = match payload.get("results") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                batch.errors.push(NormalizationError::Parse {
                    message: format!("expected \"results\" array, got {}", json_type_name(other)),
                });
                return batch;
            }
            None => {
                // Fatal-error shape: the engine reports what went wrong
                // instead of findings. Recoverable; the scan goes on.
                if let Some(error) = payload.get("error") {
                    let message = match error {
                        Value::String(s) => s.clone(),
                        Value::Object(_) => text_field(error, &["message"]),
                        _ => String::new(),
                    };
                    batch.errors.push(NormalizationError::Engine {
                        message: if message.is_empty() {
                            "unspecified engine error".to_string()
                        } else {
                            message
                        },
                    });
                }
                return batch;
            }
        };

        for (index, record) in results.iter().enumerate() {
            if !record.is_object() {
                batch.errors.push(NormalizationError::PartialRecord {
                    record_index: index,
                    message: format!("expected object, got {}", json_type_name(record)),
                });
                continue;
            }

            let severity = self.severity_map().resolve(&text_field(record, &["severity"]));
            let mut metadata = BTreeMap::new();
            metadata.insert("rule_name".to_string(), metadata_value(record, "rule_name"));
            if record.get("confidence").is_some() {
                metadata.insert("confidence".to_string(), metadata_value(record, "confidence"));
            }

            batch.findings.push(Finding {
                tool: self.tool(),
                title: truncate_title(&text_field(record, &["description", "message"])),
                file: truncate_file(&text_field(record, &["file"])),
                line: line_field(record, "line"),
                severity,
                code: truncate_code(&text_field(record, &["code"])),
                metadata,
            });
        }

        batch
    }
}
