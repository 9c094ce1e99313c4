use serde_json::{Map, Value};
use tracing::{debug, error};
use winsvc_common::error::{Error, Result};
use winsvc_common::localization::{Localizer, keys};

use crate::VALIDATION_TARGET;

const REDACTED: &str = "********";
const SECRET_PROPERTIES: &[&str] = &["password"];

/// Parses `input` as a JSON object and checks that every `required` property is present.
///
/// A required property explicitly set to `null` counts as missing. All missing properties
/// are reported at once. The parsed object is returned untouched; defaults are applied
/// further downstream.
pub fn validate_json_input(
    input: &str,
    required: &[&str],
    messages: &dyn Localizer,
) -> Result<Map<String, Value>> {
    let parsed: Value = serde_json::from_str(input).map_err(|err| {
        error!(target: VALIDATION_TARGET, "{}", messages.text(keys::JSON_PARSE_ERROR, &[&err]));
        Error::InvalidJson(err)
    })?;

    let Value::Object(properties) = parsed else {
        error!(target: VALIDATION_TARGET, "{}", messages.text(keys::JSON_NOT_OBJECT, &[]));
        return Err(Error::NotAnObject);
    };

    debug!(
        target: VALIDATION_TARGET,
        "{}",
        messages.text(keys::JSON_PARSE_SUCCESS, &[&redacted(&properties)])
    );
    debug!(
        target: VALIDATION_TARGET,
        "{}",
        messages.text(keys::JSON_CHECK_PROPERTIES, &[&format!("{required:?}")])
    );

    let missing: Vec<String> = required
        .iter()
        .filter(|property| properties.get(**property).is_none_or(Value::is_null))
        .map(|property| property.to_string())
        .collect();

    if !missing.is_empty() {
        error!(
            target: VALIDATION_TARGET,
            "{}",
            messages.text(keys::JSON_MISSING_PROPS, &[&missing.join(", ")])
        );
        return Err(Error::MissingProperties(missing));
    }

    Ok(properties)
}

/// Reads a string property, reporting a shape error when it holds another JSON type.
pub fn string_property(properties: &Map<String, Value>, key: &str) -> Result<String> {
    let value = properties.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(Error::InvalidProperty)
}

/// Copy of `properties` safe to write to the log.
pub fn redacted(properties: &Map<String, Value>) -> Value {
    let mut copy = properties.clone();
    for key in SECRET_PROPERTIES {
        if let Some(value) = copy.get_mut(*key) {
            if !value.is_null() {
                *value = Value::String(REDACTED.to_string());
            }
        }
    }
    Value::Object(copy)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
