// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end lifecycle through the public facade: build a tree, persist it
//! in both formats, mutate it through ops, and index it in a workspace.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use apinox::model::{
    Folder, FolderId, Interface, Operation, Project, ProjectId, Request, RequestId, StepConfig,
    TestCase, TestCaseId, TestStep, TestStepId, TestSuite, TestSuiteId,
};
use apinox::ops::{self, EntityKey, EntityKind, InterfaceDiff, MatchedBy};
use apinox::store::{self, workspace, ProjectLocation, ProjectRegistry};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("apinox-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn build_project() -> Project {
    let mut project = Project::new("Orders");
    project.set_id(Some(ProjectId::new("p-orders").unwrap()));
    project.set_description(Some("Order service contract tests".to_owned()));

    let mut iface = Interface::new("OrderService", "wsdl");
    iface.set_binding_name(Some("OrderBinding".to_owned()));
    let mut place = Operation::new("PlaceOrder");
    place.set_action(Some("urn:PlaceOrder".to_owned()));
    let mut request = Request::new("Small Order", "<PlaceOrder><qty>1</qty></PlaceOrder>");
    request.set_id(Some(RequestId::new("r-place-1").unwrap()));
    request.set_endpoint(Some("http://localhost:9000/orders".to_owned()));
    request.set_method(Some("POST".to_owned()));
    place.requests_mut().push(request);
    iface.operations_mut().push(place);
    project.interfaces_mut().push(iface);

    let mut folder = Folder::new(FolderId::new("f-drafts").unwrap(), "Drafts");
    let mut draft = Request::new("Bulk Order", "<PlaceOrder><qty>100</qty></PlaceOrder>");
    draft.set_id(Some(RequestId::new("r-draft-1").unwrap()));
    folder.requests_mut().push(draft);
    project.folders_mut().push(folder);

    let mut suite = TestSuite::new(TestSuiteId::new("s-orders").unwrap(), "Order Flow");
    let mut case = TestCase::new(TestCaseId::new("c-happy").unwrap(), "Happy Path");
    case.steps_mut().push(TestStep::new(
        TestStepId::new("st-wait").unwrap(),
        "Settle",
        StepConfig::Delay { millis: 100 },
    ));
    suite.test_cases_mut().push(case);
    project.test_suites_mut().push(suite);

    project
}

#[test]
fn full_lifecycle_across_formats_ops_and_workspace() {
    let tmp = TempDir::new("lifecycle");
    let project_dir = tmp.path().join("orders");
    let project = build_project();

    // Folder format via the facade.
    let location = ProjectLocation::infer(&project_dir);
    assert!(matches!(location, ProjectLocation::Directory(_)));
    store::save_project(&project, &location).unwrap();

    let mut loaded = store::load_project(&location).unwrap();
    assert!(loaded.same_content(&project));

    // Rename deep in the tree, persist, reload: the change sticks and the
    // old on-disk segment does not linger.
    let outcome = ops::rename(
        &mut loaded,
        EntityKind::Request,
        &EntityKey::by_id("r-place-1"),
        "Tiny Order",
    )
    .unwrap();
    assert_eq!(outcome.matched_by, MatchedBy::Id);
    store::save_project(&loaded, &location).unwrap();

    let op_dir = project_dir.join("interfaces/OrderService/PlaceOrder");
    assert!(op_dir.join("Tiny_Order.xml").is_file());
    assert!(!op_dir.join("Small_Order.xml").exists());

    let reloaded = store::load_project(&location).unwrap();
    assert_eq!(
        reloaded.interfaces()[0].operations()[0].requests()[0].name(),
        "Tiny Order"
    );

    // Schema diff: a new operation appears alongside the saved one.
    let mut cancel = Operation::new("CancelOrder");
    cancel.set_action(Some("urn:CancelOrder".to_owned()));
    let diff = InterfaceDiff {
        added_operations: vec![cancel],
        ..InterfaceDiff::default()
    };
    let mut synced = reloaded;
    let delta =
        ops::apply_interface_diff(&mut synced, &EntityKey::by_name("OrderService"), &diff)
            .unwrap();
    assert_eq!(delta.added.len(), 1);
    assert_eq!(synced.interfaces()[0].operations().len(), 2);
    store::save_project(&synced, &location).unwrap();

    // Legacy export is lossy but keeps the interfaces.
    let legacy_path = tmp.path().join("orders-export.xml");
    let legacy_location = ProjectLocation::infer(&legacy_path);
    assert!(matches!(legacy_location, ProjectLocation::LegacyDocument(_)));
    store::save_project(&synced, &legacy_location).unwrap();

    let exported = store::load_project(&legacy_location).unwrap();
    assert_eq!(exported.name(), "Orders");
    assert_eq!(exported.interfaces().len(), 1);
    assert!(exported.folders().is_empty());
    assert!(exported.test_suites().is_empty());

    // Workspace indexes both, and a registry tracks what is loaded.
    let ws_path = tmp.path().join("workspace.xml");
    let mut ws_projects = vec![synced.clone(), exported];
    workspace::save_workspace(&mut ws_projects, &ws_path).unwrap();

    let ws = workspace::load_workspace(&ws_path).unwrap();
    assert!(ws.skipped.is_empty());
    assert_eq!(ws.projects.len(), 2);

    let mut registry = ProjectRegistry::new();
    for loaded in ws.projects {
        let location = loaded.location().expect("loaded projects carry a location");
        registry.insert(location.to_path_buf(), loaded);
    }
    assert_eq!(registry.len(), 2);
    assert!(registry.get(&project_dir).is_some());
}
