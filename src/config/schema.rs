use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "container": {
                "type": "object",
                "properties": {
                    "image": { "type": "string" },
                    "docker_dir": { "type": "string" }
                }
            },
            "tools": {
                "type": "object",
                "properties": {
                    "psalm": { "$ref": "#/$defs/tool" },
                    "parse": { "$ref": "#/$defs/tool" },
                    "progpilot": { "$ref": "#/$defs/tool" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" }
                }
            }
        },
        "$defs": {
            "tool": {
                "type": "object",
                "properties": {
                    "enabled": { "type": "boolean" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
});
