// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};

use super::folder::Folder;
use super::ids::ProjectId;
use super::interface::Interface;
use super::test_suite::TestSuite;

/// The root persistence unit.
///
/// `id` is optional because projects loaded from legacy documents never
/// carried one; rename falls back to name matching for exactly this case.
/// `location` is set on first save/load and `dirty` is transient state that
/// callers recompute on mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: Option<ProjectId>,
    name: String,
    description: Option<String>,
    location: Option<PathBuf>,
    dirty: bool,
    interfaces: Vec<Interface>,
    folders: Vec<Folder>,
    test_suites: Vec<TestSuite>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            location: None,
            dirty: false,
            interfaces: Vec::new(),
            folders: Vec::new(),
            test_suites: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&ProjectId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<ProjectId>) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: Option<PathBuf>) {
        self.location = location;
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interfaces_mut(&mut self) -> &mut Vec<Interface> {
        &mut self.interfaces
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folders_mut(&mut self) -> &mut Vec<Folder> {
        &mut self.folders
    }

    pub fn test_suites(&self) -> &[TestSuite] {
        &self.test_suites
    }

    pub fn test_suites_mut(&mut self) -> &mut Vec<TestSuite> {
        &mut self.test_suites
    }

    /// Semantic equality for round-trip checks: ignores `dirty` and
    /// `location`, which are runtime state rather than tree content.
    pub fn same_content(&self, other: &Project) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.interfaces == other.interfaces
            && self.folders == other.folders
            && self.test_suites == other.test_suites
    }
}
