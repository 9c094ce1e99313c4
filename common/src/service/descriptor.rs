use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::service::directory::ServiceConfig;
use crate::service::translate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartupType {
    Automatic,
    Manual,
    Disabled,
}

impl StartupType {
    pub const ALL: [StartupType; 3] = [
        StartupType::Automatic,
        StartupType::Manual,
        StartupType::Disabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StartupType::Automatic => "Automatic",
            StartupType::Manual => "Manual",
            StartupType::Disabled => "Disabled",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for StartupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime state as reported by the directory. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    Unknown,
}

/// One service as seen by callers of `get` and `export`.
///
/// A lookup that finds nothing yields a descriptor holding only `name` and `_exist: false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_type: Option<StartupType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServiceState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(rename = "_exist", default, skip_serializing_if = "Option::is_none")]
    pub exist: Option<bool>,
}

impl ServiceDescriptor {
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exist: Some(false),
            ..Self::default()
        }
    }

    /// Builds a descriptor from a directory configuration read and a raw status code.
    pub fn from_config(name: impl Into<String>, config: &ServiceConfig, status_code: u32) -> Self {
        Self {
            name: name.into(),
            path: Some(config.executable_path.clone()),
            startup_type: Some(translate::startup_type_from_code(Some(config.start_code))),
            logon: config.account_name.clone(),
            state: Some(translate::state_from_status(status_code)),
            display_name: Some(config.display_name.clone()),
            description: config.description.clone(),
            dependencies: Some(config.dependencies.clone()),
            exist: None,
        }
    }

    pub fn exists(&self) -> bool {
        !self.name.is_empty() && self.exist != Some(false)
    }

    /// Drops the `_exist` sentinel; it only carries meaning for "not found".
    pub fn without_exist_marker(mut self) -> Self {
        self.exist = None;
        self
    }

    /// The descriptor as a JSON object, keyed by the caller-facing property names.
    pub fn to_properties(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(properties)) => properties,
            _ => Map::new(),
        }
    }
}

/// The desired configuration parsed from a validated `set` payload.
///
/// `startupType` stays a raw string so that unknown names can be treated as "no change"
/// by the translator instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredService {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub startup_type: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl DesiredService {
    pub fn from_properties(properties: &Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(properties.clone())).map_err(Error::InvalidProperty)
    }

    /// Startup type name to apply; an absent value means `Disabled`.
    pub fn startup_type_name(&self) -> &str {
        self.startup_type
            .as_deref()
            .unwrap_or(StartupType::Disabled.as_str())
    }

    pub fn display_name_or_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn dependency_list(&self) -> Vec<String> {
        self.dependencies.clone().unwrap_or_default()
    }

    /// Enforces the both-or-neither rule. Empty strings count as absent.
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        let username = self.username.as_deref().filter(|value| !value.is_empty());
        let password = self.password.as_deref().filter(|value| !value.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok(Some(Credentials::new(username, password))),
            (None, None) => Ok(None),
            _ => Err(Error::PartialCredentials),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
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
