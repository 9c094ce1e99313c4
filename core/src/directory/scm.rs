//! Windows Service Control Manager adapter.
//!
//! Opening, querying, stopping and deleting go through `windows-service`. Create, change,
//! the description and the enumeration use the raw Win32 API via the `windows` crate, so
//! the binary path reaches the SCM exactly as given, arguments and quoting included.
//! Every raw handle is closed when the guard owning it goes out of scope, including on
//! error paths.

use std::ffi::c_void;

use ::windows::Win32::System::Services::{
    ChangeServiceConfig2W, ChangeServiceConfigW, CloseServiceHandle, CreateServiceW,
    ENUM_SERVICE_STATUS_PROCESSW, ENUM_SERVICE_TYPE, EnumServicesStatusExW, OpenSCManagerW,
    OpenServiceW, QueryServiceConfig2W, SC_ENUM_PROCESS_INFO, SC_HANDLE, SC_MANAGER_CONNECT,
    SC_MANAGER_CREATE_SERVICE, SC_MANAGER_ENUMERATE_SERVICE, SERVICE_CHANGE_CONFIG,
    SERVICE_CONFIG_DESCRIPTION, SERVICE_DESCRIPTIONW, SERVICE_ERROR, SERVICE_ERROR_NORMAL,
    SERVICE_NO_CHANGE, SERVICE_QUERY_CONFIG, SERVICE_START_TYPE, SERVICE_STATE_ALL,
    SERVICE_WIN32, SERVICE_WIN32_OWN_PROCESS,
};
use ::windows::core::{PCWSTR, PWSTR};
use tracing::trace;
use windows_service::service::ServiceAccess;
use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};
use winsvc_common::error::DirectoryError;
use winsvc_common::service::directory::{
    NewService, ServiceChange, ServiceConfig, ServiceDirectory, ServiceEntry,
};
use winsvc_common::service::translate::StartCode;

use crate::SERVICE_TARGET;

const ERROR_ACCESS_DENIED: i32 = 5;
const ERROR_MORE_DATA: i32 = 234;
const ERROR_INSUFFICIENT_BUFFER: i32 = 122;
const ERROR_SERVICE_DOES_NOT_EXIST: i32 = 1060;
const ERROR_SERVICE_NOT_ACTIVE: i32 = 1062;
const ERROR_SERVICE_EXISTS: i32 = 1073;

/// Name used for errors raised while opening the manager itself.
const MANAGER: &str = "ServiceControlManager";

#[derive(Debug, Default, Clone, Copy)]
pub struct ScmDirectory;

impl ScmDirectory {
    pub fn new() -> Self {
        Self
    }

    fn manager(&self, access: ServiceManagerAccess) -> Result<ServiceManager, DirectoryError> {
        trace!(target: SERVICE_TARGET, "opening service control manager");
        ServiceManager::local_computer(None::<&str>, access)
            .map_err(|err| from_service_error("OpenSCManager", MANAGER, err))
    }

    fn open_service(
        &self,
        name: &str,
        access: ServiceAccess,
    ) -> Result<windows_service::service::Service, DirectoryError> {
        let manager = self.manager(ServiceManagerAccess::CONNECT)?;
        trace!(target: SERVICE_TARGET, "opening service '{name}'");
        manager
            .open_service(name, access)
            .map_err(|err| from_service_error("OpenService", name, err))
    }
}

impl ServiceDirectory for ScmDirectory {
    fn open(&self, name: &str) -> Result<(), DirectoryError> {
        self.open_service(name, ServiceAccess::all()).map(drop)
    }

    fn query_config(&self, name: &str) -> Result<ServiceConfig, DirectoryError> {
        let service = self.open_service(name, ServiceAccess::QUERY_CONFIG)?;
        let config = service
            .query_config()
            .map_err(|err| from_service_error("QueryServiceConfig", name, err))?;
        drop(service);

        let description = query_description(name)?;

        Ok(ServiceConfig {
            start_code: config.start_type as u32,
            executable_path: config.executable_path.to_string_lossy().into_owned(),
            display_name: config.display_name.to_string_lossy().into_owned(),
            description,
            dependencies: config
                .dependencies
                .iter()
                .map(|dependency| dependency.to_system_identifier().to_string_lossy().into_owned())
                .collect(),
            account_name: config
                .account_name
                .map(|account| account.to_string_lossy().into_owned()),
        })
    }

    fn query_status(&self, name: &str) -> Result<u32, DirectoryError> {
        let service = self.open_service(name, ServiceAccess::QUERY_STATUS)?;
        let status = service
            .query_status()
            .map_err(|err| from_service_error("QueryServiceStatus", name, err))?;
        Ok(status.current_state as u32)
    }

    fn create(&self, service: &NewService) -> Result<(), DirectoryError> {
        let manager = ScHandle::open_manager(SC_MANAGER_CONNECT | SC_MANAGER_CREATE_SERVICE)?;

        let name = to_wide(&service.name);
        let display_name = to_wide(&service.display_name);
        let binary_path = to_wide(&service.executable_path);
        let dependencies = to_multi_wide(&service.dependencies);
        let account = service.credentials.as_ref().map(|c| to_wide(&c.username));
        let password = service.credentials.as_ref().map(|c| to_wide(&c.password));

        trace!(target: SERVICE_TARGET, "creating service '{}'", service.name);
        let created = unsafe {
            CreateServiceW(
                manager.raw(),
                pcwstr(&name),
                pcwstr(&display_name),
                SERVICE_CHANGE_CONFIG,
                SERVICE_WIN32_OWN_PROCESS,
                start_type(StartCode::Set(service.start_code)),
                SERVICE_ERROR_NORMAL,
                pcwstr(&binary_path),
                PCWSTR::null(),
                None,
                pcwstr(&dependencies),
                account.as_deref().map_or(PCWSTR::null(), pcwstr),
                password.as_deref().map_or(PCWSTR::null(), pcwstr),
            )
        }
        .map_err(|err| from_windows_error("CreateService", &service.name, &err))?;
        drop(ScHandle(created));
        Ok(())
    }

    fn change(&self, name: &str, change: &ServiceChange) -> Result<(), DirectoryError> {
        let manager = ScHandle::open_manager(SC_MANAGER_CONNECT)?;
        let service = manager.open_service(name, SERVICE_CHANGE_CONFIG)?;

        let display_name = to_wide(&change.display_name);
        let binary_path = to_wide(&change.executable_path);
        let dependencies = to_multi_wide(&change.dependencies);

        // Null account and password leave the logon identity untouched.
        unsafe {
            ChangeServiceConfigW(
                service.raw(),
                ENUM_SERVICE_TYPE(SERVICE_NO_CHANGE),
                start_type(change.start_code),
                SERVICE_ERROR(SERVICE_NO_CHANGE),
                pcwstr(&binary_path),
                PCWSTR::null(),
                None,
                pcwstr(&dependencies),
                PCWSTR::null(),
                PCWSTR::null(),
                pcwstr(&display_name),
            )
        }
        .map_err(|err| from_windows_error("ChangeServiceConfig", name, &err))
    }

    fn describe(&self, name: &str, description: &str) -> Result<(), DirectoryError> {
        let manager = ScHandle::open_manager(SC_MANAGER_CONNECT)?;
        let service = manager.open_service(name, SERVICE_CHANGE_CONFIG)?;

        let mut text = to_wide(description);
        let info = SERVICE_DESCRIPTIONW {
            lpDescription: PWSTR(text.as_mut_ptr()),
        };
        unsafe {
            ChangeServiceConfig2W(
                service.raw(),
                SERVICE_CONFIG_DESCRIPTION,
                Some(&info as *const SERVICE_DESCRIPTIONW as *const c_void),
            )
        }
        .map_err(|err| from_windows_error("ChangeServiceConfig2", name, &err))
    }

    fn stop(&self, name: &str) -> Result<(), DirectoryError> {
        let service = self.open_service(name, ServiceAccess::STOP)?;
        service
            .stop()
            .map(drop)
            .map_err(|err| from_service_error("ControlService", name, err))
    }

    fn delete(&self, name: &str) -> Result<(), DirectoryError> {
        let service = self.open_service(name, ServiceAccess::DELETE)?;
        service
            .delete()
            .map_err(|err| from_service_error("DeleteService", name, err))
    }

    fn enumerate(&self) -> Result<Vec<ServiceEntry>, DirectoryError> {
        let manager = ScHandle::open_manager(SC_MANAGER_CONNECT | SC_MANAGER_ENUMERATE_SERVICE)?;

        let mut entries = Vec::new();
        let mut buffer: Vec<u64> = Vec::new();
        let mut resume_handle: u32 = 0;

        loop {
            let mut bytes_needed: u32 = 0;
            let mut returned: u32 = 0;
            let bytes = as_bytes_mut(&mut buffer);
            let result = unsafe {
                EnumServicesStatusExW(
                    manager.raw(),
                    SC_ENUM_PROCESS_INFO,
                    SERVICE_WIN32,
                    SERVICE_STATE_ALL,
                    (!bytes.is_empty()).then_some(bytes),
                    &mut bytes_needed,
                    &mut returned,
                    Some(&mut resume_handle),
                    PCWSTR::null(),
                )
            };

            entries.extend(unsafe { read_entries(&buffer, returned) });

            match result {
                Ok(()) => break,
                Err(err) if win32_code(&err) == ERROR_MORE_DATA => {
                    let words = (bytes_needed as usize).div_ceil(size_of::<u64>());
                    if words > buffer.len() {
                        buffer.resize(words, 0);
                    }
                }
                Err(err) => return Err(from_windows_error("EnumServicesStatusEx", MANAGER, &err)),
            }
        }

        Ok(entries)
    }
}

/// Owned `SC_HANDLE`, closed on drop.
struct ScHandle(SC_HANDLE);

impl ScHandle {
    fn open_manager(access: u32) -> Result<Self, DirectoryError> {
        unsafe { OpenSCManagerW(PCWSTR::null(), PCWSTR::null(), access) }
            .map(ScHandle)
            .map_err(|err| from_windows_error("OpenSCManager", MANAGER, &err))
    }

    fn open_service(&self, name: &str, access: u32) -> Result<Self, DirectoryError> {
        let wide = to_wide(name);
        unsafe { OpenServiceW(self.0, PCWSTR(wide.as_ptr()), access) }
            .map(ScHandle)
            .map_err(|err| from_windows_error("OpenService", name, &err))
    }

    fn raw(&self) -> SC_HANDLE {
        self.0
    }
}

impl Drop for ScHandle {
    fn drop(&mut self) {
        let _ = unsafe { CloseServiceHandle(self.0) };
    }
}

fn query_description(name: &str) -> Result<Option<String>, DirectoryError> {
    let manager = ScHandle::open_manager(SC_MANAGER_CONNECT)?;
    let service = manager.open_service(name, SERVICE_QUERY_CONFIG)?;

    let mut bytes_needed: u32 = 0;
    let probe = unsafe {
        QueryServiceConfig2W(service.raw(), SERVICE_CONFIG_DESCRIPTION, None, &mut bytes_needed)
    };
    if let Err(err) = probe {
        if win32_code(&err) != ERROR_INSUFFICIENT_BUFFER {
            return Err(from_windows_error("QueryServiceConfig2", name, &err));
        }
    }
    if bytes_needed == 0 {
        return Ok(None);
    }

    let mut buffer = vec![0u64; (bytes_needed as usize).div_ceil(size_of::<u64>())];
    unsafe {
        QueryServiceConfig2W(
            service.raw(),
            SERVICE_CONFIG_DESCRIPTION,
            Some(as_bytes_mut(&mut buffer)),
            &mut bytes_needed,
        )
    }
    .map_err(|err| from_windows_error("QueryServiceConfig2", name, &err))?;

    let description = unsafe { &*(buffer.as_ptr() as *const SERVICE_DESCRIPTIONW) };
    if description.lpDescription.is_null() {
        return Ok(None);
    }
    Ok(Some(String::from_utf16_lossy(unsafe {
        description.lpDescription.as_wide()
    })))
}

/// # Safety
/// `buffer` must hold `count` entries written by `EnumServicesStatusExW`.
unsafe fn read_entries(buffer: &[u64], count: u32) -> Vec<ServiceEntry> {
    if buffer.is_empty() || count == 0 {
        return Vec::new();
    }

    let statuses = unsafe {
        std::slice::from_raw_parts(
            buffer.as_ptr() as *const ENUM_SERVICE_STATUS_PROCESSW,
            count as usize,
        )
    };

    statuses
        .iter()
        .map(|status| ServiceEntry {
            name: String::from_utf16_lossy(unsafe { status.lpServiceName.as_wide() }),
            display_name: String::from_utf16_lossy(unsafe { status.lpDisplayName.as_wide() }),
        })
        .collect()
}

fn as_bytes_mut(buffer: &mut [u64]) -> &mut [u8] {
    let len = std::mem::size_of_val(buffer);
    unsafe { std::slice::from_raw_parts_mut(buffer.as_mut_ptr() as *mut u8, len) }
}

fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Names as a `REG_MULTI_SZ` style list: each entry nul-terminated, then one more nul.
/// An empty list is a lone pair of nuls, which clears the dependencies on change.
fn to_multi_wide(names: &[String]) -> Vec<u16> {
    let mut wide: Vec<u16> = names
        .iter()
        .flat_map(|name| name.encode_utf16().chain(std::iter::once(0)))
        .collect();
    if wide.is_empty() {
        wide.push(0);
    }
    wide.push(0);
    wide
}

fn pcwstr(wide: &[u16]) -> PCWSTR {
    PCWSTR(wide.as_ptr())
}

fn start_type(code: StartCode) -> SERVICE_START_TYPE {
    SERVICE_START_TYPE(match code {
        StartCode::Set(code) => code,
        StartCode::NoChange => SERVICE_NO_CHANGE,
    })
}

/// Win32 error code carried by an HRESULT built from one, or the HRESULT itself.
fn win32_code(err: &::windows::core::Error) -> i32 {
    let hresult = err.code().0 as u32;
    if hresult & 0xFFFF_0000 == 0x8007_0000 {
        (hresult & 0xFFFF) as i32
    } else {
        hresult as i32
    }
}

fn from_windows_error(
    operation: &'static str,
    service: &str,
    err: &::windows::core::Error,
) -> DirectoryError {
    classify(operation, service, win32_code(err), err.message().to_string())
}

fn from_service_error(
    operation: &'static str,
    service: &str,
    err: windows_service::Error,
) -> DirectoryError {
    match err {
        windows_service::Error::Winapi(io_err) => {
            let code = io_err.raw_os_error().unwrap_or(-1);
            classify(operation, service, code, io_err.to_string())
        }
        other => classify(operation, service, -1, other.to_string()),
    }
}

fn classify(operation: &'static str, service: &str, code: i32, message: String) -> DirectoryError {
    match code {
        ERROR_SERVICE_DOES_NOT_EXIST => DirectoryError::NotFound(service.to_string()),
        ERROR_SERVICE_EXISTS => DirectoryError::AlreadyExists(service.to_string()),
        ERROR_SERVICE_NOT_ACTIVE => DirectoryError::NotActive(service.to_string()),
        ERROR_ACCESS_DENIED => DirectoryError::AccessDenied(service.to_string()),
        _ => DirectoryError::Os {
            operation,
            service: service.to_string(),
            code,
            message,
        },
    }
}
