// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::request::Request;

/// One service/port definition imported from a schema (WSDL or similar).
///
/// Interface attributes are owned by the schema importer; the persistence
/// engine round-trips them and `apply_interface_diff` replaces them when the
/// upstream contract changes. User data hangs off the operations below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    id: Option<String>,
    name: String,
    kind: String,
    binding_name: Option<String>,
    protocol_version: Option<String>,
    definition_source: Option<String>,
    operations: Vec<Operation>,
}

impl Interface {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: kind.into(),
            binding_name: None,
            protocol_version: None,
            definition_source: None,
            operations: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn binding_name(&self) -> Option<&str> {
        self.binding_name.as_deref()
    }

    pub fn set_binding_name(&mut self, binding_name: Option<String>) {
        self.binding_name = binding_name;
    }

    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    pub fn set_protocol_version(&mut self, protocol_version: Option<String>) {
        self.protocol_version = protocol_version;
    }

    pub fn definition_source(&self) -> Option<&str> {
        self.definition_source.as_deref()
    }

    pub fn set_definition_source(&mut self, definition_source: Option<String>) {
        self.definition_source = definition_source;
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.operations
    }
}

/// One invocable action within an interface. The name is the identity key:
/// schema diffs match operations by name, not by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    action: Option<String>,
    requests: Vec<Request>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: None,
            requests: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn set_action(&mut self, action: Option<String>) {
        self.action = action;
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn requests_mut(&mut self) -> &mut Vec<Request> {
        &mut self.requests
    }
}
