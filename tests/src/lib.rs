//! End-to-end scenarios for the reconciliation engine.
//!
//! `reconcile` runs against the in-memory directory on every platform.
//! `scm` talks to the real Service Control Manager and only builds on Windows.

mod reconcile;
mod scm;
