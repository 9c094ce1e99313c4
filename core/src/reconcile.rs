//! The reconciliation engine.
//!
//! [`Reconciler`] exposes one method per verb. Each call validates its input, reads the
//! current state through the injected [`ServiceDirectory`], and either applies the desired
//! state or returns a [`Preview`] of it. Errors come back as [`Error`] values; the caller
//! decides what they mean for the process.
//!
//! Create and update accept different fields. A create registers description and logon
//! credentials, while an update only touches startup type, path, dependencies and display
//! name. Existing callers depend on this, so it is kept as is.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};
use winsvc_common::error::{DirectoryError, Error, Result};
use winsvc_common::localization::{Localizer, keys};
use winsvc_common::service::descriptor::{Credentials, DesiredService, ServiceDescriptor};
use winsvc_common::service::directory::{NewService, ServiceChange, ServiceDirectory};
use winsvc_common::service::translate::{self, SERVICE_DISABLED, StartCode};

use crate::SERVICE_TARGET;
use crate::changes::ChangeSet;
use crate::preview::Preview;
use crate::validation::{self, string_property, validate_json_input};

const GET_REQUIRED: &[&str] = &["name"];
const SET_REQUIRED: &[&str] = &["name", "path"];
const DELETE_REQUIRED: &[&str] = &["name"];

#[derive(Debug, Clone, PartialEq)]
pub enum SetOutcome {
    Created,
    Updated,
    WhatIf(Preview),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    WhatIf(Preview),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportReport {
    pub services: Vec<ServiceDescriptor>,
    /// Services left out because their details could not be read.
    #[serde(skip)]
    pub skipped: Vec<String>,
}

pub struct Reconciler<'a> {
    directory: &'a dyn ServiceDirectory,
    messages: &'a dyn Localizer,
}

impl<'a> Reconciler<'a> {
    pub fn new(directory: &'a dyn ServiceDirectory, messages: &'a dyn Localizer) -> Self {
        Self {
            directory,
            messages,
        }
    }

    /// Looks up one service. A missing service is a normal result carrying `_exist: false`.
    pub fn get(&self, input: &str) -> Result<ServiceDescriptor> {
        let properties = validate_json_input(input, GET_REQUIRED, self.messages)?;
        let name = string_property(&properties, "name")?;

        debug!(target: SERVICE_TARGET, "{}", self.text(keys::SERVICE_GET_RETRIEVING, &[&name]));

        match self.find(&name) {
            Ok(Some(descriptor)) => Ok(descriptor),
            Ok(None) => {
                debug!(
                    target: SERVICE_TARGET,
                    "{}",
                    self.text(keys::SERVICE_GET_NOT_FOUND, &[&name])
                );
                Ok(ServiceDescriptor::missing(name))
            }
            Err(err) => {
                error!(
                    target: SERVICE_TARGET,
                    "{}",
                    self.text(keys::SERVICE_GET_STATUS_ERROR, &[&name, &err])
                );
                Err(err.into())
            }
        }
    }

    /// Creates or updates a service, or previews doing so when `what_if` is set.
    pub fn set(&self, input: &str, what_if: bool) -> Result<SetOutcome> {
        let properties = validate_json_input(input, SET_REQUIRED, self.messages)?;
        let desired = DesiredService::from_properties(&properties).inspect_err(|err| {
            error!(target: SERVICE_TARGET, "{}", self.text(keys::JSON_INVALID_PROPERTY, &[err]));
        })?;
        let credentials = desired.credentials().inspect_err(|_| {
            error!(target: SERVICE_TARGET, "{}", self.text(keys::CREDENTIALS_PARTIAL, &[]));
        })?;

        if what_if {
            return Ok(SetOutcome::WhatIf(self.preview_set(&desired.name, &properties)));
        }

        self.create_or_update(&properties, &desired, credentials)
    }

    /// Stops and deletes a service, or previews doing so when `what_if` is set.
    pub fn delete(&self, input: &str, what_if: bool) -> Result<DeleteOutcome> {
        let properties = validate_json_input(input, DELETE_REQUIRED, self.messages)?;
        let name = string_property(&properties, "name")?;

        if what_if {
            return Ok(DeleteOutcome::WhatIf(self.preview_delete(&name)));
        }

        self.stop_and_delete(&name)
    }

    /// Reads every service in the directory. Services whose details cannot be read are
    /// skipped with a warning instead of failing the whole export.
    pub fn export(&self) -> Result<ExportReport> {
        debug!(target: SERVICE_TARGET, "{}", self.text(keys::SERVICE_EXPORT_RETRIEVING, &[]));

        let entries = self.directory.enumerate().map_err(|err| {
            error!(target: SERVICE_TARGET, "{}", self.text(keys::SERVICE_EXPORT_ERROR, &[&err]));
            Error::from(err)
        })?;

        let mut report = ExportReport::default();
        for entry in entries {
            match self.read_descriptor(&entry.name) {
                Ok(mut descriptor) => {
                    descriptor.display_name = Some(entry.display_name);
                    report.services.push(descriptor);
                }
                Err(err) => {
                    warn!(
                        target: SERVICE_TARGET,
                        "{}",
                        self.text(keys::SERVICE_EXPORT_DETAIL_ERROR, &[&entry.name, &err])
                    );
                    report.skipped.push(entry.name);
                }
            }
        }

        Ok(report)
    }

    fn create_or_update(
        &self,
        properties: &Map<String, Value>,
        desired: &DesiredService,
        credentials: Option<Credentials>,
    ) -> Result<SetOutcome> {
        let start_code = match translate::start_code_from_name(Some(desired.startup_type_name())) {
            StartCode::Set(code) => code,
            StartCode::NoChange => SERVICE_DISABLED,
        };

        let service = NewService {
            name: desired.name.clone(),
            display_name: desired.display_name_or_name().to_string(),
            start_code,
            executable_path: desired.path.clone().unwrap_or_default(),
            dependencies: desired.dependency_list(),
            credentials,
        };

        debug!(
            target: SERVICE_TARGET,
            "{}",
            self.text(keys::SERVICE_SET_CREATING_WITH_PARAMS, &[&validation::redacted(properties)])
        );

        match self.directory.create(&service) {
            Ok(()) => {
                self.describe_created(&service.name, desired.description.as_deref())?;
                info!(
                    target: SERVICE_TARGET,
                    "{}",
                    self.text(keys::SERVICE_SET_CREATED_SUCCESS, &[&service.name])
                );
                Ok(SetOutcome::Created)
            }
            Err(DirectoryError::AlreadyExists(_)) => {
                info!(
                    target: SERVICE_TARGET,
                    "{}",
                    self.text(keys::SERVICE_SET_EXISTS_UPDATING, &[&service.name])
                );
                self.update(desired)
            }
            Err(err) => Err(self.set_failed(&service.name, err)),
        }
    }

    /// A service whose description cannot be written is removed again, so a retried `set`
    /// takes the create path instead of an update that never writes descriptions.
    fn describe_created(&self, name: &str, description: Option<&str>) -> Result<()> {
        let Some(description) = description else {
            return Ok(());
        };
        let Err(err) = self.directory.describe(name, description) else {
            return Ok(());
        };

        error!(
            target: SERVICE_TARGET,
            "{}",
            self.text(keys::SERVICE_SET_DESCRIPTION_ERROR, &[&name, &err])
        );
        if let Err(rollback) = self.directory.delete(name) {
            error!(
                target: SERVICE_TARGET,
                "{}",
                self.text(keys::SERVICE_SET_ROLLBACK_ERROR, &[&name, &rollback])
            );
        }
        Err(err.into())
    }

    fn update(&self, desired: &DesiredService) -> Result<SetOutcome> {
        let change = ServiceChange {
            start_code: translate::start_code_from_name(Some(desired.startup_type_name())),
            executable_path: desired.path.clone().unwrap_or_default(),
            dependencies: desired.dependency_list(),
            display_name: desired.display_name_or_name().to_string(),
        };

        self.directory
            .change(&desired.name, &change)
            .map_err(|err| self.set_failed(&desired.name, err))?;

        debug!(
            target: SERVICE_TARGET,
            "{}",
            self.text(keys::SERVICE_SET_UPDATED_SUCCESS, &[&desired.name])
        );
        Ok(SetOutcome::Updated)
    }

    fn set_failed(&self, name: &str, err: DirectoryError) -> Error {
        error!(
            target: SERVICE_TARGET,
            "{}",
            self.text(keys::SERVICE_SET_UPDATE_ERROR, &[&name, &err])
        );
        err.into()
    }

    fn stop_and_delete(&self, name: &str) -> Result<DeleteOutcome> {
        let delete_failed = |err: DirectoryError| -> Error {
            error!(
                target: SERVICE_TARGET,
                "{}",
                self.text(keys::SERVICE_DELETE_ERROR, &[&name, &err])
            );
            err.into()
        };

        self.directory.open(name).map_err(delete_failed)?;

        debug!(target: SERVICE_TARGET, "{}", self.text(keys::SERVICE_DELETE_STOPPING, &[&name]));
        match self.directory.stop(name) {
            Ok(()) => {}
            Err(DirectoryError::NotActive(_)) => {
                debug!(
                    target: SERVICE_TARGET,
                    "{}",
                    self.text(keys::SERVICE_DELETE_ALREADY_STOPPED, &[&name])
                );
            }
            Err(err) => {
                error!(
                    target: SERVICE_TARGET,
                    "{}",
                    self.text(keys::SERVICE_DELETE_STOP_ERROR, &[&name, &err])
                );
                return Err(err.into());
            }
        }

        debug!(target: SERVICE_TARGET, "{}", self.text(keys::SERVICE_DELETE_DELETING, &[&name]));
        self.directory.delete(name).map_err(delete_failed)?;

        info!(
            target: SERVICE_TARGET,
            "{}",
            self.text(keys::SERVICE_DELETE_DELETED_SUCCESS, &[&name])
        );
        Ok(DeleteOutcome::Deleted)
    }

    /// Never fails: lookup problems become explanatory notices.
    fn preview_set(&self, name: &str, desired: &Map<String, Value>) -> Preview {
        let current = match self.find(name) {
            Ok(Some(current)) if current.exists() => current,
            Ok(_) => {
                return Preview::notice(name, self.text(keys::WHAT_IF_SERVICE_CREATE, &[&name]));
            }
            Err(DirectoryError::AccessDenied(_)) => {
                return Preview::notice(name, self.text(keys::WHAT_IF_ACCESS_DENIED, &[&name]));
            }
            Err(err) => return Preview::notice(name, self.text(keys::WHAT_IF_QUERY_ERROR, &[&err])),
        };

        let changes = ChangeSet::between(&current.to_properties(), desired);
        if changes.is_empty() {
            debug!(target: SERVICE_TARGET, "{}", self.text(keys::WHAT_IF_NO_CHANGES, &[&name]));
            return Preview::Unchanged(current.without_exist_marker());
        }

        let changed: Vec<&str> = changes.iter().map(|(property, _)| property.key()).collect();
        debug!(
            target: SERVICE_TARGET,
            "{}",
            self.text(keys::WHAT_IF_CHANGES, &[&name, &changed.join(", ")])
        );

        Preview::Changes {
            name: name.to_string(),
            current_path: current.path,
            changes,
        }
    }

    fn preview_delete(&self, name: &str) -> Preview {
        match self.directory.open(name) {
            Ok(()) => Preview::notice(name, self.text(keys::WHAT_IF_SERVICE_DELETE, &[&name])),
            Err(_) => Preview::notice(name, self.text(keys::WHAT_IF_SERVICE_MISSING, &[&name])),
        }
    }

    /// `Ok(None)` when the directory has no such service.
    fn find(&self, name: &str) -> std::result::Result<Option<ServiceDescriptor>, DirectoryError> {
        match self.read_descriptor(name) {
            Ok(descriptor) => Ok(Some(descriptor)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn read_descriptor(
        &self,
        name: &str,
    ) -> std::result::Result<ServiceDescriptor, DirectoryError> {
        let config = self.directory.query_config(name)?;
        let status = self.directory.query_status(name)?;
        Ok(ServiceDescriptor::from_config(name, &config, status))
    }

    fn text(&self, key: &str, args: &[&dyn std::fmt::Display]) -> String {
        self.messages.text(key, args)
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
