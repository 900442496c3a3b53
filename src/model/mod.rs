// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data model.
//!
//! A `Project` owns interfaces (schema-derived), folders (freeform), and test
//! suites. Ownership is strictly tree-structural: a parent exclusively owns
//! its children and no entity is reachable from two parents.

pub mod folder;
pub mod ids;
pub mod interface;
pub mod project;
pub mod request;
pub mod test_suite;

#[cfg(test)]
pub(crate) mod fixtures;

pub use folder::Folder;
pub use ids::{
    FolderId, Id, IdError, ProjectId, RequestId, TestCaseId, TestStepId, TestSuiteId,
};
pub use interface::{Interface, Operation};
pub use project::Project;
pub use request::{Assertion, AssertionConfig, Request};
pub use test_suite::{StepConfig, TestCase, TestStep, TestSuite};
