// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory-per-entity persistence backend.
//!
//! Layout rooted at the project directory:
//!
//! ```text
//! properties.json
//! interfaces/<iface>/interface.json
//! interfaces/<iface>/<operation>/operation.json
//! interfaces/<iface>/<operation>/<request>.xml + <request>.json
//! folders/01_<folder>.json
//! tests/<suite>/suite.json
//! tests/<suite>/<case>/case.json
//! tests/<suite>/<case>/01_<step>.json
//! ```
//!
//! Saving is an upsert-then-prune reconcile at every container level: all
//! current children are written first, then on-disk entries with no matching
//! segment are deleted recursively. Order-significant containers (test steps,
//! root folders) use a numeric filename prefix and are rewritten as a whole
//! set instead, since reordering renames every file.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{
    Assertion, AssertionConfig, Folder, FolderId, Interface, Operation, Project, ProjectId,
    Request, RequestId, StepConfig, TestCase, TestCaseId, TestStep, TestStepId, TestSuite,
    TestSuiteId,
};

use super::{sanitize_name, write_atomic, StoreError, WriteDurability};

const PROPERTIES_FILENAME: &str = "properties.json";
const INTERFACE_META_FILENAME: &str = "interface.json";
const OPERATION_META_FILENAME: &str = "operation.json";
const OPERATION_META_STEM: &str = "operation";
const SUITE_META_FILENAME: &str = "suite.json";
const CASE_META_FILENAME: &str = "case.json";
const INTERFACES_DIRNAME: &str = "interfaces";
const FOLDERS_DIRNAME: &str = "folders";
const TESTS_DIRNAME: &str = "tests";
const FORMAT_TAG: &str = "APInox-v1";

/// Folder-format store for one project directory.
#[derive(Debug, Clone)]
pub struct ProjectFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl ProjectFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn properties_path(&self) -> PathBuf {
        self.root.join(PROPERTIES_FILENAME)
    }

    /// Saves the whole tree, reconciling the interfaces, folders, and tests
    /// levels independently. Writes are atomic per file; a failure aborts the
    /// current subtree without rolling back siblings written earlier.
    pub fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let props = ProjectPropertiesJson {
            name: project.name().to_owned(),
            description: project.description().map(ToOwned::to_owned),
            id: project.id().map(|id| id.to_string()),
            format: FORMAT_TAG.to_owned(),
        };
        self.write_json(&self.properties_path(), &props)?;

        self.save_interfaces(project.interfaces())?;
        self.save_folders(project.folders())?;
        self.save_test_suites(project.test_suites())?;

        Ok(())
    }

    /// Loads the whole tree. A missing or unparsable `properties.json` is a
    /// fatal `NotAProjectDir`; every nested metadata document degrades to
    /// synthesized defaults instead.
    ///
    /// The layout encodes order only where it is significant (root folders,
    /// test steps). Interfaces, operations, suites, and cases come back in
    /// directory-name order, which may differ from the order they were saved
    /// in.
    pub fn load_project(&self) -> Result<Project, StoreError> {
        let props_path = self.properties_path();
        let props: ProjectPropertiesJson = match read_json_file(&props_path) {
            Ok(props) => props,
            Err(StoreError::Io { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                return Err(StoreError::NotAProjectDir {
                    path: self.root.clone(),
                });
            }
            Err(StoreError::Json { .. }) => {
                return Err(StoreError::NotAProjectDir {
                    path: self.root.clone(),
                });
            }
            Err(err) => return Err(err),
        };

        let mut project = Project::new(props.name);
        project.set_description(props.description);
        project.set_id(props.id.and_then(|raw| ProjectId::new(raw).ok()));
        project.set_location(Some(self.root.clone()));

        self.load_interfaces(&mut project)?;
        self.load_folders(&mut project)?;
        self.load_test_suites(&mut project)?;

        Ok(project)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(path, format!("{json}\n").as_bytes(), self.durability)
    }
}

// Extracted reconcile, codec, and filesystem helpers for `ProjectFolder`.
include!("project_folder/helpers.rs");
