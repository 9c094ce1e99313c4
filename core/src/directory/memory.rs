use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use winsvc_common::error::DirectoryError;
use winsvc_common::service::directory::{
    NewService, ServiceChange, ServiceConfig, ServiceDirectory, ServiceEntry,
};
use winsvc_common::service::translate::StartCode;

pub const STATUS_STOPPED: u32 = 1;
pub const STATUS_RUNNING: u32 = 4;

/// Account reported for services created without credentials.
pub const DEFAULT_ACCOUNT: &str = "LocalSystem";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    config: ServiceConfig,
    status: u32,
}

/// A service directory held in memory.
///
/// Mirrors the SCM outcomes the engine cares about: `AlreadyExists` on duplicate create,
/// `NotActive` when stopping a stopped service, `NotFound` for unknown names. Services
/// marked with [`MemoryDirectory::deny`] are listed by `enumerate` but every other
/// operation on them fails with `AccessDenied`. After [`MemoryDirectory::refuse_descriptions`]
/// every `describe` call is denied.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    records: RefCell<BTreeMap<String, Record>>,
    denied: RefCell<BTreeSet<String>>,
    descriptions_refused: Cell<bool>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(self, name: &str, config: ServiceConfig, status: u32) -> Self {
        self.insert(name, config, status);
        self
    }

    pub fn insert(&self, name: &str, config: ServiceConfig, status: u32) {
        self.records
            .borrow_mut()
            .insert(name.to_string(), Record { config, status });
    }

    pub fn deny(&self, name: &str) {
        self.denied.borrow_mut().insert(name.to_string());
    }

    pub fn refuse_descriptions(&self) {
        self.descriptions_refused.set(true);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.borrow().contains_key(name)
    }

    pub fn config(&self, name: &str) -> Option<ServiceConfig> {
        self.records.borrow().get(name).map(|record| record.config.clone())
    }

    pub fn status(&self, name: &str) -> Option<u32> {
        self.records.borrow().get(name).map(|record| record.status)
    }

    pub fn set_status(&self, name: &str, status: u32) {
        if let Some(record) = self.records.borrow_mut().get_mut(name) {
            record.status = status;
        }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn check_access(&self, name: &str) -> Result<(), DirectoryError> {
        if self.denied.borrow().contains(name) {
            return Err(DirectoryError::AccessDenied(name.to_string()));
        }
        if !self.contains(name) {
            return Err(DirectoryError::NotFound(name.to_string()));
        }
        Ok(())
    }

    fn with_record<T>(
        &self,
        name: &str,
        action: impl FnOnce(&mut Record) -> Result<T, DirectoryError>,
    ) -> Result<T, DirectoryError> {
        self.check_access(name)?;
        let mut records = self.records.borrow_mut();
        let record = records
            .get_mut(name)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))?;
        action(record)
    }
}

impl ServiceDirectory for MemoryDirectory {
    fn open(&self, name: &str) -> Result<(), DirectoryError> {
        self.check_access(name)
    }

    fn query_config(&self, name: &str) -> Result<ServiceConfig, DirectoryError> {
        self.with_record(name, |record| Ok(record.config.clone()))
    }

    fn query_status(&self, name: &str) -> Result<u32, DirectoryError> {
        self.with_record(name, |record| Ok(record.status))
    }

    fn create(&self, service: &NewService) -> Result<(), DirectoryError> {
        if self.contains(&service.name) {
            return Err(DirectoryError::AlreadyExists(service.name.clone()));
        }

        let account_name = service
            .credentials
            .as_ref()
            .map(|credentials| credentials.username.clone())
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

        let config = ServiceConfig {
            start_code: service.start_code,
            executable_path: service.executable_path.clone(),
            display_name: service.display_name.clone(),
            description: None,
            dependencies: service.dependencies.clone(),
            account_name: Some(account_name),
        };

        self.insert(&service.name, config, STATUS_STOPPED);
        Ok(())
    }

    fn change(&self, name: &str, change: &ServiceChange) -> Result<(), DirectoryError> {
        self.with_record(name, |record| {
            if let StartCode::Set(code) = change.start_code {
                record.config.start_code = code;
            }
            record.config.executable_path = change.executable_path.clone();
            record.config.dependencies = change.dependencies.clone();
            record.config.display_name = change.display_name.clone();
            Ok(())
        })
    }

    fn describe(&self, name: &str, description: &str) -> Result<(), DirectoryError> {
        if self.descriptions_refused.get() {
            return Err(DirectoryError::AccessDenied(name.to_string()));
        }
        self.with_record(name, |record| {
            record.config.description = Some(description.to_string());
            Ok(())
        })
    }

    fn stop(&self, name: &str) -> Result<(), DirectoryError> {
        self.with_record(name, |record| {
            if record.status == STATUS_STOPPED {
                return Err(DirectoryError::NotActive(name.to_string()));
            }
            record.status = STATUS_STOPPED;
            Ok(())
        })
    }

    fn delete(&self, name: &str) -> Result<(), DirectoryError> {
        self.check_access(name)?;
        self.records.borrow_mut().remove(name);
        Ok(())
    }

    fn enumerate(&self) -> Result<Vec<ServiceEntry>, DirectoryError> {
        let entries = self
            .records
            .borrow()
            .iter()
            .map(|(name, record)| ServiceEntry {
                name: name.clone(),
                display_name: record.config.display_name.clone(),
            })
            .collect();
        Ok(entries)
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
