// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal XML element tree used by the legacy document and workspace
//! readers. The writers emit events directly; only reading goes through this
//! intermediate form, so the two mapping directions stay explicit and
//! symmetrical with the JSON wire structs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|child| child.text.as_str())
            .filter(|text| !text.is_empty())
    }
}

/// Reads and parses `path`, returning the document's root element.
pub(crate) fn parse_xml_file(path: &Path) -> Result<XmlElement, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_xml(&contents, path)
}

fn parse_xml(contents: &str, path: &Path) -> Result<XmlElement, StoreError> {
    let mut reader = Reader::from_str(contents);
    reader.trim_text(true);

    let xml_err = |source: quick_xml::Error| StoreError::Xml {
        path: path.to_path_buf(),
        source,
    };

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(start) => {
                let mut element = XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    ..XmlElement::default()
                };
                for attr in start.attributes() {
                    let attr = attr.map_err(|source| StoreError::Xml {
                        path: path.to_path_buf(),
                        source: quick_xml::Error::from(source),
                    })?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value().map_err(xml_err)?.into_owned();
                    element.attrs.insert(key, value);
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                let mut element = XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    ..XmlElement::default()
                };
                for attr in start.attributes() {
                    let attr = attr.map_err(|source| StoreError::Xml {
                        path: path.to_path_buf(),
                        source: quick_xml::Error::from(source),
                    })?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value().map_err(xml_err)?.into_owned();
                    element.attrs.insert(key, value);
                }
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape().map_err(xml_err)?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| StoreError::InvalidDocument {
                    path: path.to_path_buf(),
                    reason: "unbalanced closing tag".to_owned(),
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions.
            _ => {}
        }
    }

    root.ok_or_else(|| StoreError::InvalidDocument {
        path: path.to_path_buf(),
        reason: "document has no root element".to_owned(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::parse_xml;

    #[test]
    fn parses_nested_elements_attributes_and_text() {
        let doc = r#"<?xml version="1.0"?>
<root name="top">
  <child key="a">hello &amp; goodbye</child>
  <child key="b"/>
</root>"#;

        let root = parse_xml(doc, Path::new("test.xml")).unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.attr("name"), Some("top"));
        assert_eq!(root.children_named("child").count(), 2);
        assert_eq!(root.child_text("child"), Some("hello & goodbye"));
        assert_eq!(root.children[1].attr("key"), Some("b"));
    }

    #[test]
    fn empty_document_is_invalid() {
        let err = parse_xml("  ", Path::new("empty.xml")).unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }
}
