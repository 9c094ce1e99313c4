use winsvc_common::error::DirectoryError;
use winsvc_common::service::directory::{
    NewService, ServiceChange, ServiceConfig, ServiceDirectory, ServiceEntry,
};

/// Every operation fails with [`DirectoryError::Unsupported`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDirectory;

impl ServiceDirectory for UnsupportedDirectory {
    fn open(&self, _name: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn query_config(&self, _name: &str) -> Result<ServiceConfig, DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn query_status(&self, _name: &str) -> Result<u32, DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn create(&self, _service: &NewService) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn change(&self, _name: &str, _change: &ServiceChange) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn describe(&self, _name: &str, _description: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn stop(&self, _name: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn delete(&self, _name: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unsupported)
    }

    fn enumerate(&self) -> Result<Vec<ServiceEntry>, DirectoryError> {
        Err(DirectoryError::Unsupported)
    }
}
