use serde_json::{Value, json};
use winsvc_common::service::descriptor::StartupType;

pub const SCHEMA_TITLE: &str = "win32service";

/// JSON Schema (draft-07) of the payload accepted by `config get|set|delete`.
pub fn service_schema() -> Value {
    let startup_types: Vec<&str> = StartupType::ALL.iter().map(StartupType::as_str).collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": SCHEMA_TITLE,
        "type": "object",
        "required": ["name"],
        "properties": {
            "_exist": {
                "description": "Indicates whether the service already exists.",
                "type": ["boolean", "null"]
            },
            "name": {
                "description": "The name of the Windows service.",
                "type": "string"
            },
            "path": {
                "description": "The executable path of the Windows service.",
                "type": "string"
            },
            "startupType": {
                "description": "The startup type of the Windows service.",
                "type": "string",
                "enum": startup_types
            },
            "displayName": {
                "description": "The display name of the Windows service.",
                "type": ["string", "null"]
            },
            "description": {
                "description": "The description of the Windows service.",
                "type": ["string", "null"]
            },
            "dependencies": {
                "description": "The dependencies of the Windows service.",
                "type": ["array", "null"],
                "items": { "type": "string" }
            },
            "username": {
                "description": "The username for the Windows service logon.",
                "type": ["string", "null"]
            },
            "password": {
                "description": "The password for the Windows service logon.",
                "type": ["string", "null"]
            }
        },
        "additionalProperties": false
    })
}
