//! Per-tool output normalizers.
//!
//! Each scanner gets one `Normalizer` turning its raw stdout capture into a
//! batch of canonical `Finding`s. Normalization never fails the scan: a
//! malformed document, a broken record, or an engine-level error all become
//! recoverable `NormalizationError`s next to whatever findings survived.

pub mod parse;
pub mod progpilot;
pub mod psalm;
pub mod severity;

use serde_json::Value;
use thiserror::Error;

use crate::models::{Finding, ToolId};
use crate::utils::truncation::{truncate_metadata, MAX_METADATA_LEN};

pub use severity::{map_severity, severity_map, SeverityMap};

/// A recoverable problem encountered while normalizing one tool's output.
/// Collected, logged at warn level by the caller, never propagated.
#[derive(Debug, Clone, Error)]
pub enum NormalizationError {
    /// The capture held no parseable JSON document at all.
    #[error("output is not valid JSON: {message}")]
    Parse { message: String },

    /// A single entry inside an otherwise valid document was unusable.
    /// The rest of the batch is unaffected.
    #[error("record {record_index} is malformed: {message}")]
    PartialRecord { record_index: usize, message: String },

    /// The scanner itself reported a fatal engine error instead of results.
    #[error("scanner reported an engine error: {message}")]
    Engine { message: String },
}

/// Everything a normalizer produced for one tool invocation. The findings
/// are always fully formed; the errors describe what was lost on the way.
#[derive(Debug)]
pub struct NormalizedBatch {
    pub tool: ToolId,
    pub findings: Vec<Finding>,
    pub errors: Vec<NormalizationError>,
}

impl NormalizedBatch {
    pub fn new(tool: ToolId) -> Self {
        Self {
            tool,
            findings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// One normalizer per integrated scanner.
pub trait Normalizer: Send + Sync {
    /// The scanner this normalizer handles; stamped on every finding.
    fn tool(&self) -> ToolId;

    /// This tool's severity vocabulary.
    fn severity_map(&self) -> &'static SeverityMap;

    /// Normalize the raw stdout capture. Must not panic on any input.
    fn normalize(&self, raw_output: &str) -> NormalizedBatch;
}

/// The normalizer for a given tool.
pub fn normalizer_for(tool: ToolId) -> &'static dyn Normalizer {
    match tool {
        ToolId::Psalm => &psalm::PsalmNormalizer,
        ToolId::Parse => &parse::ParseNormalizer,
        ToolId::Progpilot => &progpilot::ProgpilotNormalizer,
    }
}

/// Extract a JSON document from a capture that may interleave non-JSON
/// diagnostic lines around the payload. Tries the whole capture first, then
/// the last non-empty line, then the widest `{..}` / `[..]` substring.
pub fn extract_json_payload(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    if let Some(last_line) = trimmed.lines().rev().find(|l| !l.trim().is_empty()) {
        if let Ok(value) = serde_json::from_str(last_line.trim()) {
            return Some(value);
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str(&trimmed[start..=end]) {
                    return Some(value);
                }
            }
        }
    }

    None
}

/// JSON type label for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First present, non-null string among `keys`; empty string when none is.
pub(crate) fn text_field(record: &Value, keys: &[&str]) -> String {
    for key in keys {
        match record.get(key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => continue,
        }
    }
    String::new()
}

/// Line number as a non-negative integer. Accepts numbers and numeric
/// strings; null, absent, negative, or unparseable all map to 0.
pub(crate) fn line_field(record: &Value, key: &str) -> u32 {
    match record.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

/// Metadata value preserved verbatim: strings are bounded, numbers pass
/// through, everything else becomes the empty string.
pub(crate) fn metadata_value(record: &Value, key: &str) -> Value {
    match record.get(key) {
        Some(Value::String(s)) => Value::String(truncate_metadata(s)),
        Some(Value::Number(n)) if n.to_string().len() <= MAX_METADATA_LEN => {
            Value::Number(n.clone())
        }
        _ => Value::String(String::new()),
    }
}
