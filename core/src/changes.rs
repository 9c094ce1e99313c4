//! Property-level differences between the current state of a service and the desired one.

use std::fmt;

use serde_json::{Map, Value};

/// The properties a desired-state payload can be compared on, in comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Path,
    StartupType,
    DisplayName,
    Description,
    Dependencies,
    Logon,
}

impl Property {
    pub const COMPARABLE: [Property; 6] = [
        Property::Path,
        Property::StartupType,
        Property::DisplayName,
        Property::Description,
        Property::Dependencies,
        Property::Logon,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Property::Path => "path",
            Property::StartupType => "startupType",
            Property::DisplayName => "displayName",
            Property::Description => "description",
            Property::Dependencies => "dependencies",
            Property::Logon => "logon",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub current: Value,
    pub desired: Value,
}

/// Ordered set of property changes. Built per request and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    entries: Vec<(Property, PropertyChange)>,
}

impl ChangeSet {
    /// Compares `current` against `desired` over [`Property::COMPARABLE`].
    ///
    /// Desired properties that are absent or `null` are not compared. When `desired`
    /// carries a non-null `username`, `logon` is compared against it instead of against
    /// a desired `logon` value.
    pub fn between(current: &Map<String, Value>, desired: &Map<String, Value>) -> Self {
        let entries = Property::COMPARABLE
            .into_iter()
            .filter_map(|property| {
                let desired_value = desired_value(property, desired)?;
                let current_value = current.get(property.key()).cloned().unwrap_or(Value::Null);

                (current_value != *desired_value).then(|| {
                    let change = PropertyChange {
                        current: current_value,
                        desired: desired_value.clone(),
                    };
                    (property, change)
                })
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, property: Property) -> Option<&PropertyChange> {
        self.entries
            .iter()
            .find(|(changed, _)| *changed == property)
            .map(|(_, change)| change)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &PropertyChange)> {
        self.entries.iter().map(|(property, change)| (*property, change))
    }

    pub fn properties(&self) -> Vec<Property> {
        self.entries.iter().map(|(property, _)| *property).collect()
    }
}

fn desired_value(property: Property, desired: &Map<String, Value>) -> Option<&Value> {
    let non_null = |key: &str| desired.get(key).filter(|value| !value.is_null());

    match property {
        Property::Logon => non_null("username").or_else(|| non_null(Property::Logon.key())),
        other => non_null(other.key()),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn current() -> Map<String, Value> {
        object(json!({
            "name": "Spooler",
            "path": "C:\\Windows\\System32\\spoolsv.exe",
            "startupType": "Automatic",
            "logon": "LocalSystem",
            "state": "running",
            "displayName": "Print Spooler",
            "description": "Loads files to memory for later printing",
            "dependencies": ["RPCSS", "http"]
        }))
    }

    #[test]
    fn identical_values_produce_no_changes() {
        let desired = object(json!({
            "name": "Spooler",
            "path": "C:\\Windows\\System32\\spoolsv.exe",
            "startupType": "Automatic",
            "dependencies": ["RPCSS", "http"]
        }));
        assert!(ChangeSet::between(&current(), &desired).is_empty());
    }

    #[test]
    fn single_difference_yields_single_entry() {
        let cases = [
            ("path", json!("C:\\new\\path.exe")),
            ("startupType", json!("Manual")),
            ("displayName", json!("Spooler 2")),
            ("description", json!("something else")),
            ("dependencies", json!(["RPCSS"])),
            ("logon", json!("NT AUTHORITY\\LocalService")),
        ];

        for (key, value) in cases {
            let mut desired = current();
            desired.insert(key.to_string(), value.clone());

            let changes = ChangeSet::between(&current(), &desired);
            assert_eq!(changes.len(), 1, "{key}");

            let (property, change) = changes.iter().next().unwrap();
            assert_eq!(property.key(), key);
            assert_eq!(change.desired, value);
            assert_eq!(change.current, current()[key]);
        }
    }

    #[test]
    fn null_and_absent_desired_values_are_ignored() {
        let desired = object(json!({"name": "Spooler", "description": null, "displayName": null}));
        assert!(ChangeSet::between(&current(), &desired).is_empty());
    }

    #[test]
    fn missing_current_value_compares_as_null() {
        let mut without_description = current();
        without_description.remove("description");
        let desired = object(json!({"description": "new"}));

        let changes = ChangeSet::between(&without_description, &desired);
        let change = changes.get(Property::Description).unwrap();
        assert_eq!(change.current, Value::Null);
        assert_eq!(change.desired, json!("new"));
    }

    #[test]
    fn username_overrides_logon_comparison() {
        let desired = object(json!({
            "username": ".\\svc-user",
            "password": "pw",
            "logon": "LocalSystem"
        }));
        let changes = ChangeSet::between(&current(), &desired);

        let change = changes.get(Property::Logon).unwrap();
        assert_eq!(change.current, json!("LocalSystem"));
        assert_eq!(change.desired, json!(".\\svc-user"));
    }

    #[test]
    fn username_equal_to_logon_is_not_a_change() {
        let desired =
            object(json!({"username": "LocalSystem", "password": "pw", "logon": "Other"}));
        assert!(ChangeSet::between(&current(), &desired).is_empty());
    }

    #[test]
    fn null_username_falls_back_to_logon() {
        let desired = object(json!({"username": null, "logon": "Other"}));
        let changes = ChangeSet::between(&current(), &desired);
        assert_eq!(changes.get(Property::Logon).unwrap().desired, json!("Other"));
    }

    #[test]
    fn changes_follow_comparison_order() {
        let desired = object(json!({
            "logon": "Other",
            "dependencies": [],
            "path": "C:\\other.exe"
        }));
        let changes = ChangeSet::between(&current(), &desired);
        assert_eq!(
            changes.properties(),
            vec![Property::Path, Property::Dependencies, Property::Logon]
        );
    }

    #[test]
    fn read_only_properties_are_never_compared() {
        let desired = object(json!({"state": "stopped", "name": "Other"}));
        assert!(ChangeSet::between(&current(), &desired).is_empty());
    }
}
