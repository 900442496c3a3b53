// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Legacy single-document persistence in the SoapUI 5.x interchange schema.
//!
//! This backend exists for exchange with other tools and is deliberately
//! lossy: folders, test suites, and request ids have no representation in the
//! legacy schema and are omitted on save. Bodies are written twice, once as
//! escaped `con:request` text for foreign readers and once under the
//! `apx:requestContent` extension element, which takes precedence on load.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::{
    Assertion, AssertionConfig, Interface, Operation, Project, ProjectId, Request,
};

use super::xml::{parse_xml_file, XmlElement};
use super::{write_atomic, StoreError, WriteDurability};

const CON_NS: &str = "http://eviware.com/soapui/config";
const APX_NS: &str = "http://apinox.dev/schema/project-ext";
const SOAPUI_VERSION: &str = "5.7.0";
const ROOT_ELEMENT: &str = "con:soapui-project";

/// Legacy-format store for one project document.
#[derive(Debug, Clone)]
pub struct LegacyDocument {
    path: PathBuf,
    durability: WriteDurability,
}

impl LegacyDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exports the project as a single legacy document. Folders and test
    /// suites are not representable and are dropped.
    pub fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        write_document(&mut writer, project).map_err(|source| StoreError::Xml {
            path: self.path.clone(),
            source,
        })?;

        let mut xml = writer.into_inner();
        xml.push(b'\n');
        write_atomic(&self.path, &xml, self.durability)
    }

    /// Loads a legacy document. Missing sub-elements are tolerated
    /// everywhere; only a wrong root element is fatal.
    pub fn load_project(&self) -> Result<Project, StoreError> {
        let root = parse_xml_file(&self.path)?;
        if root.name != ROOT_ELEMENT {
            return Err(StoreError::InvalidDocument {
                path: self.path.clone(),
                reason: format!("expected {ROOT_ELEMENT} root, found {}", root.name),
            });
        }

        let mut project = Project::new(self.project_name(&root));
        project.set_id(root.attr("id").and_then(|raw| ProjectId::new(raw).ok()));
        project.set_description(root.child_text("con:description").map(ToOwned::to_owned));
        project.set_location(Some(self.path.clone()));

        for iface_el in root.children_named("con:interface") {
            project.interfaces_mut().push(interface_from_element(iface_el));
        }

        Ok(project)
    }

    /// Some writers put the full file path into the `name` attribute; a name
    /// containing path separators falls back to the document's file stem.
    fn project_name(&self, root: &XmlElement) -> String {
        let raw = root.attr("name").unwrap_or_default();
        if raw.is_empty() || raw.contains('/') || raw.contains('\\') {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Imported Project".to_owned())
        } else {
            raw.to_owned()
        }
    }
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    project: &Project,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    if let Some(id) = project.id() {
        root.push_attribute(("id", id.as_str()));
    }
    root.push_attribute(("name", project.name()));
    root.push_attribute(("soapui-version", SOAPUI_VERSION));
    root.push_attribute(("xmlns:con", CON_NS));
    root.push_attribute(("xmlns:apx", APX_NS));
    writer.write_event(Event::Start(root))?;

    if let Some(description) = project.description() {
        write_text_element(writer, "con:description", description)?;
    }
    for iface in project.interfaces() {
        write_interface(writer, iface)?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
}

fn write_interface(
    writer: &mut Writer<Vec<u8>>,
    iface: &Interface,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("con:interface");
    start.push_attribute(("name", iface.name()));
    start.push_attribute(("type", iface.kind()));
    if let Some(binding_name) = iface.binding_name() {
        start.push_attribute(("bindingName", binding_name));
    }
    if let Some(protocol_version) = iface.protocol_version() {
        start.push_attribute(("soapVersion", protocol_version));
    }
    if let Some(definition_source) = iface.definition_source() {
        start.push_attribute(("definition", definition_source));
    }
    writer.write_event(Event::Start(start))?;

    for operation in iface.operations() {
        write_operation(writer, operation)?;
    }

    writer.write_event(Event::End(BytesEnd::new("con:interface")))
}

fn write_operation(
    writer: &mut Writer<Vec<u8>>,
    operation: &Operation,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("con:operation");
    // Constant attributes other consumers of the schema expect to see.
    start.push_attribute(("isOneWay", "false"));
    if let Some(action) = operation.action() {
        start.push_attribute(("action", action));
    }
    start.push_attribute(("name", operation.name()));
    start.push_attribute(("bindingOperationName", operation.name()));
    start.push_attribute(("type", "Request-Response"));
    start.push_attribute(("sendsAttachments", "false"));
    start.push_attribute(("anonymous", "optional"));
    writer.write_event(Event::Start(start))?;

    for request in operation.requests() {
        write_call(writer, request)?;
    }

    writer.write_event(Event::End(BytesEnd::new("con:operation")))
}

fn write_call(writer: &mut Writer<Vec<u8>>, request: &Request) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("con:call");
    start.push_attribute(("name", request.name()));
    writer.write_event(Event::Start(start))?;

    if let Some(endpoint) = request.endpoint() {
        write_text_element(writer, "con:endpoint", endpoint)?;
    }

    let mut req_el = BytesStart::new("con:request");
    req_el.push_attribute(("mediaType", request.content_type().unwrap_or("text/xml")));
    req_el.push_attribute(("method", request.method().unwrap_or("POST")));
    writer.write_event(Event::Start(req_el))?;
    writer.write_event(Event::Text(BytesText::new(request.body())))?;
    writer.write_event(Event::End(BytesEnd::new("con:request")))?;

    for assertion in request.assertions() {
        write_assertion(writer, assertion)?;
    }

    for (key, value) in request.headers() {
        let mut header = BytesStart::new("apx:headers");
        header.push_attribute(("key", key.as_str()));
        header.push_attribute(("value", value.as_str()));
        writer.write_event(Event::Empty(header))?;
    }

    write_text_element(writer, "apx:requestContent", request.body())?;

    writer.write_event(Event::End(BytesEnd::new("con:call")))
}

fn write_assertion(
    writer: &mut Writer<Vec<u8>>,
    assertion: &Assertion,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("con:assertion");
    start.push_attribute(("type", assertion.kind.as_str()));
    start.push_attribute(("name", assertion.name.as_deref().unwrap_or(&assertion.kind)));
    if let Some(id) = assertion.id.as_deref() {
        start.push_attribute(("id", id));
    }
    writer.write_event(Event::Start(start))?;

    writer.write_event(Event::Start(BytesStart::new("con:configuration")))?;
    let config = &assertion.configuration;
    if let Some(token) = config.token.as_deref() {
        write_text_element(writer, "token", token)?;
    }
    if let Some(ignore_case) = config.ignore_case {
        write_text_element(writer, "ignoreCase", if ignore_case { "true" } else { "false" })?;
    }
    if let Some(sla) = config.sla.as_deref() {
        write_text_element(writer, "sla", sla)?;
    }
    if let Some(xpath) = config.xpath.as_deref() {
        write_text_element(writer, "path", xpath)?;
    }
    if let Some(expected_content) = config.expected_content.as_deref() {
        write_text_element(writer, "content", expected_content)?;
    }
    writer.write_event(Event::End(BytesEnd::new("con:configuration")))?;

    writer.write_event(Event::End(BytesEnd::new("con:assertion")))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn interface_from_element(el: &XmlElement) -> Interface {
    let mut iface = Interface::new(
        el.attr("name").unwrap_or_default(),
        el.attr("type").unwrap_or("wsdl"),
    );
    iface.set_binding_name(el.attr("bindingName").map(ToOwned::to_owned));
    iface.set_protocol_version(el.attr("soapVersion").map(ToOwned::to_owned));
    iface.set_definition_source(el.attr("definition").map(ToOwned::to_owned));

    for op_el in el.children_named("con:operation") {
        iface.operations_mut().push(operation_from_element(op_el));
    }
    iface
}

fn operation_from_element(el: &XmlElement) -> Operation {
    let mut operation = Operation::new(el.attr("name").unwrap_or_default());
    operation.set_action(el.attr("action").map(ToOwned::to_owned));

    for call_el in el.children_named("con:call") {
        operation.requests_mut().push(request_from_element(call_el));
    }
    operation
}

fn request_from_element(el: &XmlElement) -> Request {
    let mut request = Request::new(el.attr("name").unwrap_or_default(), call_body(el));
    request.set_endpoint(el.child_text("con:endpoint").map(ToOwned::to_owned));

    if let Some(req_el) = el.child("con:request") {
        request.set_content_type(Some(
            req_el.attr("mediaType").unwrap_or("application/soap+xml").to_owned(),
        ));
        request.set_method(req_el.attr("method").map(ToOwned::to_owned));
    }

    for assertion_el in el.children_named("con:assertion") {
        request.assertions_mut().push(assertion_from_element(assertion_el));
    }

    for header_el in el.children_named("apx:headers") {
        if let (Some(key), Some(value)) = (header_el.attr("key"), header_el.attr("value")) {
            request.headers_mut().insert(key.to_owned(), value.to_owned());
        }
    }

    request
}

/// The extension element wins over the escaped `con:request` text; both get
/// carriage returns stripped, including the literal two-character `\r`
/// sequence some exporters leave behind.
fn call_body(el: &XmlElement) -> String {
    let raw = el
        .child_text("apx:requestContent")
        .or_else(|| el.child_text("con:request"))
        .unwrap_or_default();
    raw.replace("\\r", "").replace('\r', "")
}

fn assertion_from_element(el: &XmlElement) -> Assertion {
    let config = el.child("con:configuration");
    Assertion {
        kind: el.attr("type").unwrap_or_default().to_owned(),
        name: el.attr("name").map(ToOwned::to_owned),
        id: el.attr("id").map(ToOwned::to_owned),
        configuration: AssertionConfig {
            token: config.and_then(|c| c.child_text("token")).map(ToOwned::to_owned),
            ignore_case: config
                .and_then(|c| c.child_text("ignoreCase"))
                .map(|v| v == "true"),
            sla: config.and_then(|c| c.child_text("sla")).map(ToOwned::to_owned),
            xpath: config.and_then(|c| c.child_text("path")).map(ToOwned::to_owned),
            expected_content: config
                .and_then(|c| c.child_text("content"))
                .map(ToOwned::to_owned),
        },
    }
}
