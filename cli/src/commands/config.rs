use std::io::Write;

use serde_json::Value;
use tracing::info;
use winsvc_common::localization::{Localizer, keys};
use winsvc_common::service::directory::ServiceDirectory;
use winsvc_core::SERVICE_TARGET;
use winsvc_core::reconcile::{DeleteOutcome, Reconciler, SetOutcome};
use winsvc_core::validation::redacted;

use crate::commands::ConfigAction;
use crate::terminal::print;

/// Runs one `config` action. Results go to `out`; a successful apply writes nothing.
pub fn run(
    action: ConfigAction,
    directory: &dyn ServiceDirectory,
    messages: &dyn Localizer,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let reconciler = Reconciler::new(directory, messages);

    match action {
        ConfigAction::Get { input } => {
            info!(
                target: SERVICE_TARGET,
                "{}",
                messages.text(keys::LOG_GET_SERVICE, &[&loggable(&input)])
            );
            let descriptor = reconciler.get(&input)?;
            print::json(out, &descriptor)
        }
        ConfigAction::Set { input, what_if } => {
            info!(
                target: SERVICE_TARGET,
                "{}",
                messages.text(keys::LOG_SET_SERVICE, &[&loggable(&input)])
            );
            match reconciler.set(&input, what_if)? {
                SetOutcome::WhatIf(preview) => print::json(out, &preview.to_json()),
                SetOutcome::Created | SetOutcome::Updated => Ok(()),
            }
        }
        ConfigAction::Delete { input, what_if } => {
            info!(
                target: SERVICE_TARGET,
                "{}",
                messages.text(keys::LOG_DELETE_SERVICE, &[&loggable(&input)])
            );
            match reconciler.delete(&input, what_if)? {
                DeleteOutcome::WhatIf(preview) => print::json(out, &preview.to_json()),
                DeleteOutcome::Deleted => Ok(()),
            }
        }
        ConfigAction::Export { .. } => {
            info!(target: SERVICE_TARGET, "{}", messages.text(keys::LOG_EXPORT_SERVICES, &[]));
            let report = reconciler.export()?;
            print::json(out, &report)
        }
    }
}

/// Input as it may appear in the log: passwords masked when the input parses.
fn loggable(input: &str) -> String {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(properties)) => redacted(&properties).to_string(),
        _ => input.to_string(),
    }
}
