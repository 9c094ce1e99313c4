//! Process exit codes. This is the only place errors are turned into codes.

use tracing::{debug, error};
use winsvc_common::error::Error;
use winsvc_common::localization::{Localizer, keys};
use winsvc_core::SERVICE_TARGET;

pub const MISSING_PROPERTY: u8 = 1;
pub const INVALID_CREDENTIALS: u8 = 2;
pub const DIRECTORY_FAILURE: u8 = 3;
pub const INVALID_INPUT: u8 = 4;

/// Logs `err` and returns its exit code. Typed errors were already logged where they
/// arose; anything else gets its one localized ERROR line here.
pub fn report(err: &anyhow::Error, messages: &dyn Localizer) -> u8 {
    if err.downcast_ref::<Error>().is_some() {
        debug!(target: SERVICE_TARGET, "{err:#}");
    } else {
        let cause = format!("{err:#}");
        error!(target: SERVICE_TARGET, "{}", messages.text(keys::LOG_COMMAND_FAILED, &[&cause]));
    }
    for_error(err)
}

pub fn for_error(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Error>()
        .map(code)
        .unwrap_or(DIRECTORY_FAILURE)
}

pub fn code(err: &Error) -> u8 {
    match err {
        Error::InvalidJson(_) | Error::NotAnObject | Error::InvalidProperty(_) => INVALID_INPUT,
        Error::MissingProperties(_) => MISSING_PROPERTY,
        Error::PartialCredentials => INVALID_CREDENTIALS,
        Error::Directory(_) => DIRECTORY_FAILURE,
    }
}
