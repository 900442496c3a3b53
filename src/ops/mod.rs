// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutation operations on a loaded project tree.
//!
//! Operations mutate the tree in place and report what changed, so a caller
//! holding derived state (open editors, tree views) can refresh selectively
//! instead of rebuilding everything. Persistence is the caller's job; these
//! functions never touch disk.

use std::fmt;

use crate::model::{Folder, Operation, Project, Request};

/// The renameable entity kinds. Interfaces and operations are owned by the
/// schema importer and are not renamed through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Folder,
    Request,
    TestSuite,
    TestCase,
    TestStep,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Project => "project",
            Self::Folder => "folder",
            Self::Request => "request",
            Self::TestSuite => "test suite",
            Self::TestCase => "test case",
            Self::TestStep => "test step",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub enum OpsError {
    /// No entity of the requested kind matched the key.
    TargetNotFound { kind: EntityKind },
    InterfaceNotFound { key: String },
    EmptyName,
}

impl fmt::Display for OpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound { kind } => write!(f, "no {kind} matched the given key"),
            Self::InterfaceNotFound { key } => write!(f, "no interface matched {key}"),
            Self::EmptyName => f.write_str("name must not be empty"),
        }
    }
}

impl std::error::Error for OpsError {}

/// Two-tier identity for addressing an entity: a stable id when the caller
/// has one, a display name for legacy data that never carried ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityKey {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl EntityKey {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), name: None }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self { id: None, name: Some(name.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    Id,
    Name,
}

/// What a successful rename actually did. `matched_by` lets the caller warn
/// when a rename resolved through the ambiguous name tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub matched_by: MatchedBy,
    pub old_name: String,
}

/// Renames one entity addressed by kind and key, depth-first, first match
/// wins. Id matches are authoritative; matching by name is allowed only for
/// the project itself, because legacy documents load without a project id.
/// Nothing but the matched entity's name is touched.
pub fn rename(
    project: &mut Project,
    kind: EntityKind,
    key: &EntityKey,
    new_name: &str,
) -> Result<RenameOutcome, OpsError> {
    if new_name.trim().is_empty() {
        return Err(OpsError::EmptyName);
    }

    if kind == EntityKind::Project {
        return rename_project(project, key, new_name);
    }

    let Some(id) = key.id.as_deref() else {
        return Err(OpsError::TargetNotFound { kind });
    };

    let old_name = match kind {
        EntityKind::Project => None,
        EntityKind::Folder => rename_folder(project, id, new_name),
        EntityKind::Request => rename_request(project, id, new_name),
        EntityKind::TestSuite => rename_test_suite(project, id, new_name),
        EntityKind::TestCase => rename_test_case(project, id, new_name),
        EntityKind::TestStep => rename_test_step(project, id, new_name),
    };

    match old_name {
        Some(old_name) => Ok(RenameOutcome { matched_by: MatchedBy::Id, old_name }),
        None => Err(OpsError::TargetNotFound { kind }),
    }
}

fn rename_project(
    project: &mut Project,
    key: &EntityKey,
    new_name: &str,
) -> Result<RenameOutcome, OpsError> {
    let id_matches = match (key.id.as_deref(), project.id()) {
        (Some(key_id), Some(project_id)) => key_id == project_id.as_str(),
        _ => false,
    };
    let matched_by = if id_matches {
        MatchedBy::Id
    } else if key.name.as_deref() == Some(project.name()) {
        MatchedBy::Name
    } else {
        return Err(OpsError::TargetNotFound { kind: EntityKind::Project });
    };

    let old_name = project.name().to_owned();
    project.set_name(new_name);
    Ok(RenameOutcome { matched_by, old_name })
}

fn rename_request(project: &mut Project, id: &str, new_name: &str) -> Option<String> {
    for iface in project.interfaces_mut() {
        for operation in iface.operations_mut() {
            if let Some(old) = rename_request_in(operation.requests_mut(), id, new_name) {
                return Some(old);
            }
        }
    }
    project
        .folders_mut()
        .iter_mut()
        .find_map(|folder| rename_request_in_folder(folder, id, new_name))
}

fn rename_request_in_folder(folder: &mut Folder, id: &str, new_name: &str) -> Option<String> {
    if let Some(old) = rename_request_in(folder.requests_mut(), id, new_name) {
        return Some(old);
    }
    folder
        .folders_mut()
        .iter_mut()
        .find_map(|child| rename_request_in_folder(child, id, new_name))
}

fn rename_request_in(requests: &mut [Request], id: &str, new_name: &str) -> Option<String> {
    let request = requests
        .iter_mut()
        .find(|request| request.id().is_some_and(|rid| rid.as_str() == id))?;
    let old = request.name().to_owned();
    request.set_name(new_name);
    Some(old)
}

fn rename_folder(project: &mut Project, id: &str, new_name: &str) -> Option<String> {
    fn walk(folder: &mut Folder, id: &str, new_name: &str) -> Option<String> {
        if folder.id().as_str() == id {
            let old = folder.name().to_owned();
            folder.set_name(new_name);
            return Some(old);
        }
        folder.folders_mut().iter_mut().find_map(|child| walk(child, id, new_name))
    }
    project.folders_mut().iter_mut().find_map(|folder| walk(folder, id, new_name))
}

fn rename_test_suite(project: &mut Project, id: &str, new_name: &str) -> Option<String> {
    let suite = project
        .test_suites_mut()
        .iter_mut()
        .find(|suite| suite.id().as_str() == id)?;
    let old = suite.name().to_owned();
    suite.set_name(new_name);
    Some(old)
}

fn rename_test_case(project: &mut Project, id: &str, new_name: &str) -> Option<String> {
    for suite in project.test_suites_mut() {
        if let Some(case) =
            suite.test_cases_mut().iter_mut().find(|case| case.id().as_str() == id)
        {
            let old = case.name().to_owned();
            case.set_name(new_name);
            return Some(old);
        }
    }
    None
}

fn rename_test_step(project: &mut Project, id: &str, new_name: &str) -> Option<String> {
    for suite in project.test_suites_mut() {
        for case in suite.test_cases_mut() {
            if let Some(step) = case.steps_mut().iter_mut().find(|step| step.id().as_str() == id)
            {
                let old = step.name().to_owned();
                step.set_name(new_name);
                return Some(old);
            }
        }
    }
    None
}

/// A schema re-import reduced to the operation level. Operations are matched
/// by name; the importer never sees user data, so requests are not part of
/// the diff.
#[derive(Debug, Clone, Default)]
pub struct InterfaceDiff {
    /// New operations; any requests on them are discarded on apply.
    pub added_operations: Vec<Operation>,
    pub removed_operation_names: Vec<String>,
    /// Operations whose schema attributes changed; saved requests survive.
    pub changed_operations: Vec<Operation>,
}

/// One affected operation, named rather than referenced: operations have no
/// ids, their name is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OperationRef {
    pub interface: String,
    pub operation: String,
}

/// Coarse change report for a diff application: which operations appeared,
/// vanished, or had attributes replaced. Removed requests are implied by
/// their removed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub added: Vec<OperationRef>,
    pub removed: Vec<OperationRef>,
    pub updated: Vec<OperationRef>,
}

/// Applies a schema diff to one interface. Added operations join with empty
/// request lists, removed operations take their requests with them, and
/// changed operations swap schema attributes while keeping requests intact.
/// A changed operation that does not exist yet is treated as added.
pub fn apply_interface_diff(
    project: &mut Project,
    interface_key: &EntityKey,
    diff: &InterfaceDiff,
) -> Result<Delta, OpsError> {
    let iface = project
        .interfaces_mut()
        .iter_mut()
        .find(|iface| {
            match interface_key.id.as_deref() {
                Some(key_id) => iface.id() == Some(key_id),
                None => interface_key.name.as_deref() == Some(iface.name()),
            }
        })
        .ok_or_else(|| OpsError::InterfaceNotFound {
            key: describe_key(interface_key),
        })?;

    let interface_name = iface.name().to_owned();
    let op_ref = |operation: &str| OperationRef {
        interface: interface_name.clone(),
        operation: operation.to_owned(),
    };
    let mut delta = Delta::default();

    for removed_name in &diff.removed_operation_names {
        let before = iface.operations().len();
        iface.operations_mut().retain(|op| op.name() != removed_name.as_str());
        if iface.operations().len() != before {
            delta.removed.push(op_ref(removed_name));
        }
    }

    for changed in &diff.changed_operations {
        match iface.operations_mut().iter_mut().find(|op| op.name() == changed.name()) {
            Some(existing) => {
                existing.set_action(changed.action().map(ToOwned::to_owned));
                delta.updated.push(op_ref(changed.name()));
            }
            None => {
                iface.operations_mut().push(without_requests(changed));
                delta.added.push(op_ref(changed.name()));
            }
        }
    }

    for added in &diff.added_operations {
        if iface.operations().iter().any(|op| op.name() == added.name()) {
            continue;
        }
        iface.operations_mut().push(without_requests(added));
        delta.added.push(op_ref(added.name()));
    }

    Ok(delta)
}

fn without_requests(operation: &Operation) -> Operation {
    let mut operation = operation.clone();
    operation.requests_mut().clear();
    operation
}

fn describe_key(key: &EntityKey) -> String {
    match (key.id.as_deref(), key.name.as_deref()) {
        (Some(id), _) => format!("id {id:?}"),
        (None, Some(name)) => format!("name {name:?}"),
        (None, None) => "an empty key".to_owned(),
    }
}

#[cfg(test)]
mod tests;
