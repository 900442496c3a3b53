// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use super::ids::RequestId;

/// A saved, executable invocation: body payload plus transport metadata.
///
/// A request lives either under an `Operation` (schema-derived) or under a
/// `Folder` (freeform), never both. The `dirty` flag is transient runtime
/// state and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    id: Option<RequestId>,
    name: String,
    body: String,
    endpoint: Option<String>,
    method: Option<String>,
    content_type: Option<String>,
    headers: BTreeMap<String, String>,
    assertions: Vec<Assertion>,
    dirty: bool,
}

impl Request {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            body: body.into(),
            endpoint: None,
            method: None,
            content_type: None,
            headers: BTreeMap::new(),
            assertions: Vec::new(),
            dirty: false,
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<RequestId>) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn set_endpoint(&mut self, endpoint: Option<String>) {
        self.endpoint = endpoint;
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn set_method(&mut self, method: Option<String>) {
        self.method = method;
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: Option<String>) {
        self.content_type = content_type;
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.headers
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn assertions_mut(&mut self) -> &mut Vec<Assertion> {
        &mut self.assertions
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

/// A response check attached to a request (contains, SLA, XPath, ...).
///
/// The `kind` string is the open classification used by the legacy format
/// (e.g. "Simple Contains", "Response SLA"); the engine stores it verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assertion {
    pub kind: String,
    pub name: Option<String>,
    pub id: Option<String>,
    pub configuration: AssertionConfig,
}

impl Assertion {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssertionConfig {
    pub token: Option<String>,
    pub ignore_case: Option<bool>,
    pub sla: Option<String>,
    pub xpath: Option<String>,
    pub expected_content: Option<String>,
}
