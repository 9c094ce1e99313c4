#![cfg(test)]
use serde_json::{json, Value};
use winsvc_common::error::Error;
use winsvc_common::localization::Catalog;
use winsvc_common::service::directory::{ServiceConfig, ServiceDirectory};
use winsvc_core::changes::ChangeSet;
use winsvc_core::directory::memory::{MemoryDirectory, STATUS_RUNNING, STATUS_STOPPED};
use winsvc_core::preview::Preview;
use winsvc_core::reconcile::{DeleteOutcome, Reconciler, SetOutcome};

fn config(start_code: u32, path: &str, display_name: &str) -> ServiceConfig {
    ServiceConfig {
        start_code,
        executable_path: path.to_string(),
        display_name: display_name.to_string(),
        description: None,
        dependencies: Vec::new(),
        account_name: Some("LocalSystem".to_string()),
    }
}

fn machine() -> MemoryDirectory {
    MemoryDirectory::new()
        .with_service(
            "Spooler",
            config(2, r"C:\Windows\System32\spoolsv.exe", "Print Spooler"),
            STATUS_RUNNING,
        )
        .with_service(
            "W32Time",
            config(3, r"C:\Windows\system32\svchost.exe -k LocalService", "Windows Time"),
            STATUS_STOPPED,
        )
}

fn get_json(reconciler: &Reconciler<'_>, name: &str) -> Value {
    let input = json!({ "name": name }).to_string();
    serde_json::to_value(reconciler.get(&input).unwrap()).unwrap()
}

/// Desired state for `set`, built from an observed descriptor.
fn as_desired(observed: &Value) -> String {
    let mut desired = observed.as_object().unwrap().clone();
    desired.remove("state");
    desired.remove("logon");
    Value::Object(desired).to_string()
}

#[test]
fn missing_name_is_reported_for_every_verb() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let get = reconciler.get("{}").unwrap_err();
    let set = reconciler.set("{}", false).unwrap_err();
    let delete = reconciler.delete("{}", true).unwrap_err();

    assert!(matches!(get, Error::MissingProperties(ref m) if m == &["name"]));
    assert!(matches!(set, Error::MissingProperties(ref m) if m == &["name", "path"]));
    assert!(matches!(delete, Error::MissingProperties(ref m) if m == &["name"]));
}

#[test]
fn malformed_input_is_rejected_before_the_directory_is_touched() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    assert!(matches!(reconciler.set("{\"name\":", false), Err(Error::InvalidJson(_))));
    assert!(matches!(reconciler.set("[1, 2]", false), Err(Error::NotAnObject)));
    assert_eq!(directory.len(), 2);
}

#[test]
fn half_a_credential_pair_never_reaches_the_directory() {
    let directory = MemoryDirectory::new();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    for what_if in [false, true] {
        let input = json!({"name": "Demo", "path": "C:\\demo.exe", "password": "x"}).to_string();
        assert!(matches!(reconciler.set(&input, what_if), Err(Error::PartialCredentials)));
    }
    assert!(directory.is_empty());
}

#[test]
fn unknown_service_reads_as_absent() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    assert_eq!(
        get_json(&reconciler, "NoSuchSvc123"),
        json!({"name": "NoSuchSvc123", "_exist": false})
    );
}

#[test]
fn applying_observed_state_is_a_no_op() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let before = get_json(&reconciler, "Spooler");
    let desired = as_desired(&before);

    let SetOutcome::WhatIf(preview) = reconciler.set(&desired, true).unwrap() else {
        panic!("dry run must produce a preview");
    };
    assert!(matches!(preview, Preview::Unchanged(_)));

    assert_eq!(reconciler.set(&desired, false).unwrap(), SetOutcome::Updated);
    assert_eq!(get_json(&reconciler, "Spooler"), before);
}

#[test]
fn dry_runs_leave_the_machine_untouched() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let before = reconciler.export().unwrap();

    let change = json!({"name": "Spooler", "path": "C:\\other.exe", "startupType": "Manual"});
    let create = json!({"name": "Fresh", "path": "C:\\fresh.exe"});
    reconciler.set(&change.to_string(), true).unwrap();
    reconciler.set(&create.to_string(), true).unwrap();
    reconciler.delete(r#"{"name":"Spooler"}"#, true).unwrap();
    reconciler.delete(r#"{"name":"Fresh"}"#, true).unwrap();

    assert_eq!(reconciler.export().unwrap(), before);
    assert_eq!(directory.status("Spooler"), Some(STATUS_RUNNING));
}

#[test]
fn created_service_reads_back_as_requested() {
    let directory = MemoryDirectory::new();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let desired = json!({
        "name": "Demo",
        "path": "C:\\demo.exe",
        "startupType": "Manual",
        "displayName": "Demo Service",
        "description": "Does demo things.",
        "dependencies": ["RPCSS", "Tcpip"]
    });
    assert_eq!(reconciler.set(&desired.to_string(), false).unwrap(), SetOutcome::Created);

    let observed = get_json(&reconciler, "Demo");
    for key in ["name", "path", "startupType", "displayName", "description", "dependencies"] {
        assert_eq!(observed[key], desired[key], "{key} differs after create");
    }
    assert_eq!(observed["state"], "stopped");
}

#[test]
fn change_set_lists_exactly_the_differing_properties() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let current = get_json(&reconciler, "W32Time");
    let desired = json!({
        "name": "W32Time",
        "path": current["path"],
        "startupType": "Automatic",
        "displayName": "Windows Time",
        "description": null
    });

    let changes = ChangeSet::between(current.as_object().unwrap(), desired.as_object().unwrap());
    let keys: Vec<&str> = changes.properties().iter().map(|property| property.key()).collect();
    assert_eq!(keys, ["startupType"]);
}

#[test]
fn what_if_with_unchanged_path_reports_only_startup_type() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let input = json!({
        "name": "Spooler",
        "path": "C:\\Windows\\System32\\spoolsv.exe",
        "startupType": "Manual"
    });
    let SetOutcome::WhatIf(preview) = reconciler.set(&input.to_string(), true).unwrap() else {
        panic!("dry run must produce a preview");
    };

    assert_eq!(
        preview.to_json(),
        json!({
            "name": "Spooler",
            "path": "C:\\Windows\\System32\\spoolsv.exe",
            "startupType": "Manual"
        })
    );
}

#[test]
fn what_if_new_path_for_spooler_reports_the_desired_path() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);
    let before = get_json(&reconciler, "Spooler");

    let input = json!({"name": "Spooler", "path": "C:\\new\\path.exe"});
    let SetOutcome::WhatIf(preview) = reconciler.set(&input.to_string(), true).unwrap() else {
        panic!("dry run must produce a preview");
    };

    assert_eq!(preview.to_json(), json!({"name": "Spooler", "path": "C:\\new\\path.exe"}));
    assert_eq!(get_json(&reconciler, "Spooler"), before);
    assert_eq!(
        directory.config("Spooler").unwrap().executable_path,
        r"C:\Windows\System32\spoolsv.exe"
    );
}

#[test]
fn export_leaves_out_unreadable_services() {
    let directory = machine();
    directory.deny("W32Time");
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let report = reconciler.export().unwrap();
    let names: Vec<&str> = report.services.iter().map(|service| service.name.as_str()).collect();

    assert_eq!(directory.enumerate().unwrap().len(), 2);
    assert_eq!(names, ["Spooler"]);
    assert_eq!(report.skipped, ["W32Time"]);
}

#[test]
fn deleting_an_absent_service_fails() {
    let directory = machine();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let err = reconciler.delete(r#"{"name":"NoSuchSvc123"}"#, false).unwrap_err();
    assert!(matches!(err, Error::Directory(ref cause) if cause.is_not_found()));
}

#[test]
fn full_lifecycle() {
    let directory = MemoryDirectory::new();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);
    let input =
        json!({"name": "Demo", "path": "C:\\demo.exe", "startupType": "Automatic"}).to_string();

    assert_eq!(reconciler.set(&input, false).unwrap(), SetOutcome::Created);
    directory.set_status("Demo", STATUS_RUNNING);
    assert_eq!(reconciler.delete(r#"{"name":"Demo"}"#, false).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(get_json(&reconciler, "Demo")["_exist"], false);
}
