use crate::error::DirectoryError;
use crate::service::descriptor::Credentials;
use crate::service::translate::StartCode;

/// Static configuration of one service as read from the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Raw startup code (`2` automatic, `3` manual, `4` disabled, anything else is OS specific).
    pub start_code: u32,
    pub executable_path: String,
    pub display_name: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub account_name: Option<String>,
}

/// A row of the directory enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    pub name: String,
    pub display_name: String,
}

/// Everything needed to register a new service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewService {
    pub name: String,
    pub display_name: String,
    pub start_code: u32,
    pub executable_path: String,
    pub dependencies: Vec<String>,
    pub credentials: Option<Credentials>,
}

/// The fields an existing service can be updated with.
///
/// Logon account and description are deliberately absent: updates never touch them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceChange {
    pub start_code: StartCode,
    pub executable_path: String,
    pub dependencies: Vec<String>,
    pub display_name: String,
}

/// Capability over the OS service database.
///
/// Implementations open and close whatever handles they need inside each call.
pub trait ServiceDirectory {
    /// Probes that `name` exists and can be opened for full access.
    fn open(&self, name: &str) -> Result<(), DirectoryError>;

    fn query_config(&self, name: &str) -> Result<ServiceConfig, DirectoryError>;

    /// Raw status code (`1` stopped ... `7` paused).
    fn query_status(&self, name: &str) -> Result<u32, DirectoryError>;

    /// Fails with [`DirectoryError::AlreadyExists`] when `service.name` is taken.
    fn create(&self, service: &NewService) -> Result<(), DirectoryError>;

    fn change(&self, name: &str, change: &ServiceChange) -> Result<(), DirectoryError>;

    /// Sets the free-form description of an existing service.
    fn describe(&self, name: &str, description: &str) -> Result<(), DirectoryError>;

    /// Fails with [`DirectoryError::NotActive`] when the service is not running.
    fn stop(&self, name: &str) -> Result<(), DirectoryError>;

    fn delete(&self, name: &str) -> Result<(), DirectoryError>;

    fn enumerate(&self) -> Result<Vec<ServiceEntry>, DirectoryError>;
}
