//! State translator between caller vocabulary and the directory's integer codes.
//!
//! Reads are lossy: unknown startup codes read as `Disabled`, unknown status codes as
//! `unknown`. Writes never fail: an unknown startup name becomes [`StartCode::NoChange`].

use crate::service::descriptor::{ServiceState, StartupType};

pub const SERVICE_AUTO_START: u32 = 2;
pub const SERVICE_DEMAND_START: u32 = 3;
pub const SERVICE_DISABLED: u32 = 4;

/// Name used by callers for "leave the startup type alone".
pub const UNKNOWN_STARTUP_NAME: &str = "Unknown";

/// Startup code to hand to a directory write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCode {
    Set(u32),
    NoChange,
}

impl StartCode {
    pub fn code(&self) -> Option<u32> {
        match self {
            StartCode::Set(code) => Some(*code),
            StartCode::NoChange => None,
        }
    }
}

impl StartupType {
    pub fn code(&self) -> u32 {
        match self {
            StartupType::Automatic => SERVICE_AUTO_START,
            StartupType::Manual => SERVICE_DEMAND_START,
            StartupType::Disabled => SERVICE_DISABLED,
        }
    }
}

pub fn startup_type_from_code(code: Option<u32>) -> StartupType {
    match code {
        Some(SERVICE_AUTO_START) => StartupType::Automatic,
        Some(SERVICE_DEMAND_START) => StartupType::Manual,
        _ => StartupType::Disabled,
    }
}

pub fn start_code_from_name(name: Option<&str>) -> StartCode {
    match name {
        None | Some(UNKNOWN_STARTUP_NAME) => StartCode::NoChange,
        Some(name) => StartupType::from_name(name)
            .map(|kind| StartCode::Set(kind.code()))
            .unwrap_or(StartCode::NoChange),
    }
}

pub fn state_from_status(code: u32) -> ServiceState {
    match code {
        1 => ServiceState::Stopped,
        2 => ServiceState::StartPending,
        3 => ServiceState::StopPending,
        4 => ServiceState::Running,
        5 => ServiceState::ContinuePending,
        6 => ServiceState::PausePending,
        7 => ServiceState::Paused,
        _ => ServiceState::Unknown,
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

    #[test]
    fn startup_codes_round_trip_through_names() {
        for kind in StartupType::ALL {
            assert_eq!(startup_type_from_code(Some(kind.code())), kind);
            assert_eq!(start_code_from_name(Some(kind.as_str())), StartCode::Set(kind.code()));
        }
    }

    #[test]
    fn unknown_startup_codes_read_as_disabled() {
        assert_eq!(startup_type_from_code(None), StartupType::Disabled);
        assert_eq!(startup_type_from_code(Some(0)), StartupType::Disabled);
        assert_eq!(startup_type_from_code(Some(1)), StartupType::Disabled);
        assert_eq!(startup_type_from_code(Some(99)), StartupType::Disabled);
    }

    #[test]
    fn unknown_startup_names_mean_no_change() {
        assert_eq!(start_code_from_name(None), StartCode::NoChange);
        assert_eq!(start_code_from_name(Some("Unknown")), StartCode::NoChange);
        assert_eq!(start_code_from_name(Some("automatic")), StartCode::NoChange);
        assert_eq!(start_code_from_name(Some("Boot")), StartCode::NoChange);
        assert_eq!(StartCode::NoChange.code(), None);
    }

    #[test]
    fn status_codes_map_to_state_names() {
        assert_eq!(state_from_status(1), ServiceState::Stopped);
        assert_eq!(state_from_status(4), ServiceState::Running);
        assert_eq!(state_from_status(7), ServiceState::Paused);
        assert_eq!(state_from_status(0), ServiceState::Unknown);
        assert_eq!(state_from_status(8), ServiceState::Unknown);
    }
}
