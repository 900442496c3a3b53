// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use rstest::{fixture, rstest};

use super::{
    apply_interface_diff, rename, Delta, EntityKey, EntityKind, InterfaceDiff, MatchedBy,
    OperationRef, OpsError,
};
use crate::model::fixtures;
use crate::model::{Operation, Project};

#[fixture]
fn project() -> Project {
    fixtures::sample_project()
}

#[rstest]
fn rename_folder_at_depth_touches_only_the_target(mut project: Project) {
    let before = project.clone();

    let outcome = rename(
        &mut project,
        EntityKind::Folder,
        &EntityKey::by_id("f-leaf"),
        "Boundary Cases",
    )
    .unwrap();

    assert_eq!(outcome.matched_by, MatchedBy::Id);
    assert_eq!(outcome.old_name, "Edge Cases");

    let root = &project.folders()[0];
    let mid = &root.folders()[0];
    let leaf = &mid.folders()[0];
    assert_eq!(leaf.name(), "Boundary Cases");

    // Siblings and ancestors keep their names and contents.
    assert_eq!(root.name(), before.folders()[0].name());
    assert_eq!(mid.name(), before.folders()[0].folders()[0].name());
    assert_eq!(mid.requests(), before.folders()[0].folders()[0].requests());
    assert_eq!(leaf.id(), before.folders()[0].folders()[0].folders()[0].id());
    assert_eq!(project.interfaces(), before.interfaces());
    assert_eq!(project.test_suites(), before.test_suites());
}

#[rstest]
fn rename_request_reaches_operations_and_folders(mut project: Project) {
    let outcome = rename(
        &mut project,
        EntityKind::Request,
        &EntityKey::by_id("r-login-1"),
        "Login v2",
    )
    .unwrap();
    assert_eq!(outcome.old_name, "Basic Login");
    assert_eq!(
        project.interfaces()[0].operations()[0].requests()[0].name(),
        "Login v2"
    );

    let outcome = rename(
        &mut project,
        EntityKind::Request,
        &EntityKey::by_id("r-edge-1"),
        "Expired Token v2",
    )
    .unwrap();
    assert_eq!(outcome.old_name, "Expired Token");
    let leaf = &project.folders()[0].folders()[0].folders()[0];
    assert_eq!(leaf.requests()[0].name(), "Expired Token v2");
}

#[rstest]
fn rename_test_step_by_id(mut project: Project) {
    let outcome = rename(
        &mut project,
        EntityKind::TestStep,
        &EntityKey::by_id("st-2"),
        "Verify Session",
    )
    .unwrap();
    assert_eq!(outcome.old_name, "Check Session");

    let steps = project.test_suites()[0].test_cases()[0].steps();
    assert_eq!(steps[1].name(), "Verify Session");
    assert_eq!(steps[0].name(), "Call Login");
}

#[rstest]
fn rename_project_matches_id_before_name(mut project: Project) {
    let outcome = rename(
        &mut project,
        EntityKind::Project,
        &EntityKey::by_id("p-payments"),
        "Payments v2",
    )
    .unwrap();
    assert_eq!(outcome.matched_by, MatchedBy::Id);
    assert_eq!(project.name(), "Payments v2");
}

#[test]
fn rename_project_falls_back_to_name_for_legacy_data() {
    // Legacy documents load without a project id.
    let mut project = Project::new("Imported");

    let outcome = rename(
        &mut project,
        EntityKind::Project,
        &EntityKey::by_name("Imported"),
        "Imported v2",
    )
    .unwrap();
    assert_eq!(outcome.matched_by, MatchedBy::Name);
    assert_eq!(outcome.old_name, "Imported");
    assert_eq!(project.name(), "Imported v2");
}

#[rstest]
fn name_matching_is_refused_below_the_project(mut project: Project) {
    let err = rename(
        &mut project,
        EntityKind::Folder,
        &EntityKey::by_name("Smoke"),
        "Renamed",
    )
    .unwrap_err();
    match err {
        OpsError::TargetNotFound { kind } => assert_eq!(kind, EntityKind::Folder),
        other => panic!("expected TargetNotFound, got: {other:?}"),
    }
    assert_eq!(project.folders()[0].name(), "Smoke");
}

#[rstest]
fn empty_new_name_is_rejected(mut project: Project) {
    let err = rename(
        &mut project,
        EntityKind::Folder,
        &EntityKey::by_id("f-root"),
        "   ",
    )
    .unwrap_err();
    assert!(matches!(err, OpsError::EmptyName));
}

#[rstest]
fn unknown_id_is_target_not_found(mut project: Project) {
    let err = rename(
        &mut project,
        EntityKind::TestSuite,
        &EntityKey::by_id("s-nope"),
        "Renamed",
    )
    .unwrap_err();
    assert!(matches!(err, OpsError::TargetNotFound { kind: EntityKind::TestSuite }));
}

#[rstest]
fn diff_added_operations_join_without_requests(mut project: Project) {
    let mut refresh = Operation::new("RefreshToken");
    refresh.set_action(Some("urn:RefreshToken".to_owned()));
    refresh.requests_mut().push(fixtures::request("Leftover", "r-x", "<X/>"));

    let diff = InterfaceDiff {
        added_operations: vec![refresh],
        ..InterfaceDiff::default()
    };

    let delta =
        apply_interface_diff(&mut project, &EntityKey::by_name("AuthService"), &diff).unwrap();

    assert_eq!(
        delta,
        Delta {
            added: vec![OperationRef {
                interface: "AuthService".to_owned(),
                operation: "RefreshToken".to_owned(),
            }],
            ..Delta::default()
        }
    );

    let iface = &project.interfaces()[0];
    let added = iface.operations().iter().find(|op| op.name() == "RefreshToken").unwrap();
    assert_eq!(added.action(), Some("urn:RefreshToken"));
    assert!(added.requests().is_empty());
}

#[rstest]
fn diff_removed_operation_takes_its_requests_with_it(mut project: Project) {
    let diff = InterfaceDiff {
        removed_operation_names: vec!["Logout".to_owned()],
        ..InterfaceDiff::default()
    };

    let delta =
        apply_interface_diff(&mut project, &EntityKey::by_name("AuthService"), &diff).unwrap();
    assert_eq!(delta.removed.len(), 1);
    assert_eq!(delta.removed[0].operation, "Logout");

    let iface = &project.interfaces()[0];
    assert!(iface.operations().iter().all(|op| op.name() != "Logout"));
}

#[rstest]
fn diff_changed_operation_preserves_saved_requests(mut project: Project) {
    let mut changed = Operation::new("Login");
    changed.set_action(Some("urn:LoginV2".to_owned()));

    let diff = InterfaceDiff {
        changed_operations: vec![changed],
        ..InterfaceDiff::default()
    };

    let delta =
        apply_interface_diff(&mut project, &EntityKey::by_name("AuthService"), &diff).unwrap();
    assert_eq!(delta.updated.len(), 1);
    assert_eq!(delta.updated[0].operation, "Login");

    let login = project.interfaces()[0]
        .operations()
        .iter()
        .find(|op| op.name() == "Login")
        .unwrap();
    assert_eq!(login.action(), Some("urn:LoginV2"));
    assert_eq!(login.requests().len(), 1);
    assert_eq!(login.requests()[0].name(), "Basic Login");
}

#[rstest]
fn diff_against_unknown_interface_is_an_error(mut project: Project) {
    let err = apply_interface_diff(
        &mut project,
        &EntityKey::by_name("NoSuchService"),
        &InterfaceDiff::default(),
    )
    .unwrap_err();
    match err {
        OpsError::InterfaceNotFound { key } => assert!(key.contains("NoSuchService")),
        other => panic!("expected InterfaceNotFound, got: {other:?}"),
    }
}

#[rstest]
fn removing_then_readding_an_operation_resets_it(mut project: Project) {
    let diff = InterfaceDiff {
        removed_operation_names: vec!["Login".to_owned()],
        added_operations: vec![Operation::new("Login")],
        ..InterfaceDiff::default()
    };

    let delta =
        apply_interface_diff(&mut project, &EntityKey::by_name("AuthService"), &diff).unwrap();
    assert_eq!(delta.removed.len(), 1);
    assert_eq!(delta.added.len(), 1);

    let login = project.interfaces()[0]
        .operations()
        .iter()
        .find(|op| op.name() == "Login")
        .unwrap();
    assert!(login.requests().is_empty());
    assert_eq!(login.action(), None);
}
