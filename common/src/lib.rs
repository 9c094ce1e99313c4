//! # winsvc common
//!
//! Shared vocabulary for the `winsvc` workspace. Nothing in this crate talks to the
//! operating system.
//!
//! * **[`service`]**: The service descriptor model, the state translator and the
//!   [`service::directory::ServiceDirectory`] port implemented by `winsvc-core`.
//! * **[`error`]**: The error taxonomy shared by every layer.
//! * **[`localization`]**: Message catalog used for every human readable line.
//! * **[`config`]**: Per-process settings resolved from the environment.

pub mod config;
pub mod error;
pub mod localization;
pub mod service;
