// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Apinox — project tree persistence and synchronization engine.
//!
//! The crate owns the durable representation of an API-testing project
//! (interfaces, saved requests, folders, test suites): saving a tree to disk,
//! loading it back, pruning orphaned entries, and merging schema diffs into a
//! loaded tree. Request execution, schema fetching, and any UI are external
//! collaborators that only ever hand trees in and out.

pub mod model;
pub mod ops;
pub mod store;
