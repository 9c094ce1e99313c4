//! # Service Directory Adapters
//!
//! Concrete implementations of [`ServiceDirectory`]:
//!
//! * [`scm::ScmDirectory`]: The Windows Service Control Manager (Windows builds only).
//! * [`memory::MemoryDirectory`]: An in-memory directory with the same observable behavior.
//! * [`unsupported::UnsupportedDirectory`]: Stand-in for platforms without a service manager.

use winsvc_common::service::directory::ServiceDirectory;

pub mod memory;
#[cfg(windows)]
pub mod scm;
pub mod unsupported;

/// The directory of the machine this process runs on.
pub fn local() -> Box<dyn ServiceDirectory> {
    #[cfg(windows)]
    {
        Box::new(scm::ScmDirectory::new())
    }
    #[cfg(not(windows))]
    {
        Box::new(unsupported::UnsupportedDirectory)
    }
}
