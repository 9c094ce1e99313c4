use thiserror::Error;

/// Failures reported by a [`crate::service::directory::ServiceDirectory`] implementation.
///
/// The first four variants are outcomes the engine may treat as alternate branches
/// (service already exists during create, service not running during stop, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("service '{0}' does not exist")]
    NotFound(String),

    #[error("service '{0}' already exists")]
    AlreadyExists(String),

    #[error("service '{0}' is not active")]
    NotActive(String),

    #[error("access denied to service '{0}'")]
    AccessDenied(String),

    #[error("the service directory is not available on this platform")]
    Unsupported,

    #[error("{operation} failed for '{service}' (os error {code}): {message}")]
    Os {
        operation: &'static str,
        service: String,
        code: i32,
        message: String,
    },
}

impl DirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}

/// Every way a single `winsvc` operation can fail.
///
/// Only the command façade turns these into process exit codes.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("input is not a JSON object")]
    NotAnObject,

    #[error("input property has an unexpected type: {0}")]
    InvalidProperty(#[source] serde_json::Error),

    #[error("missing required properties: {}", .0.join(", "))]
    MissingProperties(Vec<String>),

    #[error("username and password must be provided together")]
    PartialCredentials,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

pub type Result<T> = std::result::Result<T, Error>;
