//! What-if results.
//!
//! A preview has the same top-level shape as the data `get` returns, so callers can treat
//! it like the result of a real apply.

use serde_json::{Map, Value, json};
use winsvc_common::service::descriptor::ServiceDescriptor;

use crate::changes::ChangeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Free-form explanation, rendered under `_metadata.whatIf`.
    Notice { name: String, messages: Vec<String> },
    /// The service exists and would change. Only desired values are reported.
    Changes {
        name: String,
        current_path: Option<String>,
        changes: ChangeSet,
    },
    /// The service already matches the desired state.
    Unchanged(ServiceDescriptor),
}

impl Preview {
    pub fn notice(name: impl Into<String>, message: impl Into<String>) -> Self {
        Preview::Notice {
            name: name.into(),
            messages: vec![message.into()],
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Preview::Notice { name, messages } => json!({
                "name": name,
                "_metadata": { "whatIf": messages }
            }),
            Preview::Changes {
                name,
                current_path,
                changes,
            } => {
                let mut result = Map::new();
                result.insert("name".into(), Value::String(name.clone()));
                result.insert("path".into(), json!(current_path));
                for (property, change) in changes.iter() {
                    result.insert(property.key().into(), change.desired.clone());
                }
                Value::Object(result)
            }
            Preview::Unchanged(descriptor) => Value::Object(descriptor.to_properties()),
        }
    }
}
