// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workspace descriptor: a legacy-schema XML file listing project references.
//!
//! A workspace is only an index. Loading resolves each reference against the
//! workspace directory and dispatches to the backend the path's shape
//! selects; one broken reference never takes down the rest of the workspace.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::Project;

use super::xml::parse_xml_file;
use super::{write_atomic, ProjectLocation, StoreError, WriteDurability};

const ROOT_ELEMENT: &str = "con:soapui-workspace";
const CON_NS: &str = "http://eviware.com/soapui/config";
const SOAPUI_VERSION: &str = "5.7.0";

/// Result of loading a workspace: the projects that resolved plus a record
/// of every reference that did not.
#[derive(Debug, Default)]
pub struct WorkspaceLoad {
    pub projects: Vec<Project>,
    pub skipped: Vec<SkippedProjectRef>,
}

/// One project reference that could not be loaded, kept inspectable so the
/// caller can report it instead of silently shrinking the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProjectRef {
    /// The reference string as written in the workspace file.
    pub reference: String,
    /// The resolved path the load was attempted against.
    pub path: PathBuf,
    pub reason: String,
}

/// Loads every project referenced by the workspace file. Per-reference
/// failures are logged, recorded in `skipped`, and never abort the rest;
/// only an unreadable or malformed workspace document itself is fatal.
pub fn load_workspace(path: &Path) -> Result<WorkspaceLoad, StoreError> {
    let root = parse_xml_file(path)?;
    if root.name != ROOT_ELEMENT {
        return Err(StoreError::InvalidDocument {
            path: path.to_path_buf(),
            reason: format!("expected {ROOT_ELEMENT} root, found {}", root.name),
        });
    }

    let workspace_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut load = WorkspaceLoad::default();

    for ref_el in root.children_named("con:project") {
        // Current writers put the path in the element text; older ones used
        // a `ref` attribute.
        let reference = Some(ref_el.text.trim())
            .filter(|text| !text.is_empty())
            .or_else(|| ref_el.attr("ref"))
            .map(ToOwned::to_owned);
        let Some(reference) = reference else {
            log::warn!("skipping workspace entry in {path:?}: no project path");
            load.skipped.push(SkippedProjectRef {
                reference: String::new(),
                path: path.to_path_buf(),
                reason: "project reference has no path".to_owned(),
            });
            continue;
        };

        let project_path = resolve_reference(workspace_dir, &reference);
        let location = ProjectLocation::infer(&project_path);
        match super::load_project(&location) {
            Ok(project) => load.projects.push(project),
            Err(err) => {
                log::warn!("skipping project reference {reference:?}: {err}");
                load.skipped.push(SkippedProjectRef {
                    reference,
                    path: project_path,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(load)
}

/// Writes the workspace file. Projects that have never been saved are
/// persisted first as legacy documents next to the workspace, so every
/// written reference points at something that exists.
pub fn save_workspace(projects: &mut [Project], path: &Path) -> Result<(), StoreError> {
    let workspace_dir = path.parent().unwrap_or_else(|| Path::new("."));

    for project in projects.iter_mut() {
        if project.location().is_some() {
            continue;
        }
        let file_name = format!("{}.xml", default_project_file_stem(project.name()));
        let project_path = workspace_dir.join(file_name);
        let location = ProjectLocation::LegacyDocument(project_path.clone());
        super::save_project(project, &location)?;
        project.set_location(Some(project_path));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, projects, path, workspace_dir).map_err(|source| {
        StoreError::Xml {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    write_atomic(path, &xml, WriteDurability::default())
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    projects: &[Project],
    path: &Path,
    workspace_dir: &Path,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_owned());
    let mut root = BytesStart::new(ROOT_ELEMENT);
    root.push_attribute(("name", name.as_str()));
    root.push_attribute(("soapui-version", SOAPUI_VERSION));
    root.push_attribute(("xmlns:con", CON_NS));
    writer.write_event(Event::Start(root))?;

    for project in projects {
        // Every project has a location by the time we get here.
        let Some(location) = project.location() else {
            continue;
        };
        let reference = location
            .strip_prefix(workspace_dir)
            .unwrap_or(location)
            .to_string_lossy()
            .into_owned();

        let mut entry = BytesStart::new("con:project");
        entry.push_attribute(("name", project.name()));
        writer.write_event(Event::Start(entry))?;
        writer.write_event(Event::Text(BytesText::new(&reference)))?;
        writer.write_event(Event::End(BytesEnd::new("con:project")))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
}

fn resolve_reference(workspace_dir: &Path, reference: &str) -> PathBuf {
    let reference = Path::new(reference);
    if reference.is_absolute() {
        reference.to_path_buf()
    } else {
        workspace_dir.join(reference)
    }
}

/// File stem for auto-persisted projects: lowercased, alphanumerics only.
fn default_project_file_stem(name: &str) -> String {
    let stem = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>();
    if stem.is_empty() {
        "untitled".to_owned()
    } else {
        stem
    }
}
