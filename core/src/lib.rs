//! # winsvc core
//!
//! Desired-state reconciliation for Windows services.
//!
//! * **[`validation`]**: Parses caller JSON and checks required properties.
//! * **[`changes`]**: Property-level diff between a current descriptor and desired values.
//! * **[`reconcile`]**: The [`reconcile::Reconciler`], one method per verb (get/set/delete/export).
//! * **[`preview`]**: What-if result shapes.
//! * **[`schema`]**: JSON Schema of the accepted input.
//! * **[`directory`]**: Implementations of the `ServiceDirectory` port (Windows SCM, in-memory).

pub mod changes;
pub mod directory;
pub mod preview;
pub mod reconcile;
pub mod schema;
pub mod validation;

/// Log target for engine and adapter events.
pub const SERVICE_TARGET: &str = "service";
/// Log target for input parsing and validation events.
pub const VALIDATION_TARGET: &str = "input validation";
