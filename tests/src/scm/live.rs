#![cfg(all(test, windows))]
//! These talk to the local Service Control Manager. Run them from an elevated
//! prompt with `cargo test -p winsvc-integration-tests -- --ignored`.

use serde_json::{json, Value};
use winsvc_common::localization::Catalog;
use winsvc_core::directory::scm::ScmDirectory;
use winsvc_core::preview::Preview;
use winsvc_core::reconcile::{DeleteOutcome, Reconciler, SetOutcome};

const SCRATCH_SERVICE: &str = "WinsvcScratchTest";

#[test]
#[ignore = "queries the live service control manager"]
fn missing_service_reads_as_absent() {
    let directory = ScmDirectory::new();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let descriptor = reconciler.get(r#"{"name":"NoSuchSvc123"}"#).unwrap();
    assert_eq!(
        serde_json::to_value(descriptor).unwrap(),
        json!({"name": "NoSuchSvc123", "_exist": false})
    );
}

#[test]
#[ignore = "queries the live service control manager"]
fn spooler_what_if_reports_startup_change() {
    let directory = ScmDirectory::new();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);

    let current = serde_json::to_value(reconciler.get(r#"{"name":"Spooler"}"#).unwrap()).unwrap();
    let flipped = if current["startupType"] == "Manual" { "Automatic" } else { "Manual" };
    let input = json!({"name": "Spooler", "path": current["path"], "startupType": flipped});

    let SetOutcome::WhatIf(preview) = reconciler.set(&input.to_string(), true).unwrap() else {
        panic!("dry run must produce a preview");
    };
    let preview = preview.to_json();
    assert_eq!(preview["startupType"], Value::from(flipped));

    let after = serde_json::to_value(reconciler.get(r#"{"name":"Spooler"}"#).unwrap()).unwrap();
    assert_eq!(after["startupType"], current["startupType"]);
}

#[test]
#[ignore = "creates and deletes a service; needs administrator rights"]
fn scratch_service_lifecycle() {
    let directory = ScmDirectory::new();
    let catalog = Catalog::default();
    let reconciler = Reconciler::new(&directory, &catalog);
    let query = json!({ "name": SCRATCH_SERVICE }).to_string();
    let desired = json!({
        "name": SCRATCH_SERVICE,
        "path": "C:\\Windows\\System32\\svchost.exe -k winsvcscratch",
        "startupType": "Manual",
        "displayName": "Winsvc Scratch",
        "description": "Created by the winsvc test suite.",
        "dependencies": ["RpcSs"]
    });
    let read_back = || serde_json::to_value(reconciler.get(&query).unwrap()).unwrap();

    assert_eq!(reconciler.set(&desired.to_string(), false).unwrap(), SetOutcome::Created);
    let created = read_back();
    for key in ["path", "startupType", "displayName", "description", "dependencies"] {
        assert_eq!(created[key], desired[key], "{key} differs after create");
    }

    let mut changed = desired.clone();
    changed["path"] = json!("\"C:\\Program Files\\Winsvc Scratch\\svc.exe\" --flag");
    changed["displayName"] = json!("Winsvc Scratch Updated");
    changed["dependencies"] = json!([]);
    assert_eq!(reconciler.set(&changed.to_string(), false).unwrap(), SetOutcome::Updated);
    let updated = read_back();
    for key in ["path", "startupType", "displayName", "dependencies"] {
        assert_eq!(updated[key], changed[key], "{key} differs after update");
    }

    let SetOutcome::WhatIf(preview) = reconciler.set(&changed.to_string(), true).unwrap() else {
        panic!("dry run must produce a preview");
    };
    assert!(matches!(preview, Preview::Unchanged(_)));

    assert_eq!(reconciler.delete(&query, false).unwrap(), DeleteOutcome::Deleted);
}
