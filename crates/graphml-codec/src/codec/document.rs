//! Minimal namespace-aware XML tree for GraphML input.
//!
//! The reader needs random access to a graph's children (nodes before edges,
//! keys before data), so the input is materialized once. Element text is kept
//! exactly as written; CDATA sections are merged into it.

use std::borrow::Cow;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::error::DecodeError;
use crate::format::GRAPHML_NAMESPACE;

/// Namespace an element name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNamespace {
    /// No prefix and no default namespace in scope.
    None,
    /// Bound to a namespace URI.
    Bound(String),
    /// Prefix with no binding in scope.
    Unbound(String),
}

/// An attribute, namespace declarations excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub prefix: Option<String>,
    pub local_name: String,
    pub value: String,
}

/// An element with its attributes, children and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: XmlNamespace,
    pub prefix: Option<String>,
    pub local_name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
    pub text: String,
    /// Byte offset of the start tag.
    pub position: u64,
}

impl XmlElement {
    /// Returns true if the element is in the GraphML namespace or in none.
    pub fn is_graphml(&self) -> bool {
        match &self.namespace {
            XmlNamespace::None => true,
            XmlNamespace::Bound(uri) => uri == GRAPHML_NAMESPACE,
            XmlNamespace::Unbound(_) => false,
        }
    }

    /// Returns true if this is the GraphML element `name`.
    pub fn is(&self, name: &str) -> bool {
        self.local_name == name && self.is_graphml()
    }

    /// Value of the unprefixed attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.prefix.is_none() && a.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Children in the GraphML namespace.
    pub fn graphml_children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter(|c| c.is_graphml())
    }

    /// Name as written, prefix included.
    pub fn qualified_name(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}:{}", self.local_name)),
            None => Cow::Borrowed(&self.local_name),
        }
    }
}

/// Parses `input` and returns its root element, if it has one.
pub fn parse_document(input: &str) -> Result<Option<XmlElement>, DecodeError> {
    let mut reader = NsReader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((resolved, event)) => (resolve(resolved), event),
            Err(e) => {
                return Err(DecodeError::Xml {
                    position,
                    message: e.to_string(),
                });
            }
        };

        match event {
            Event::Start(start) => {
                stack.push(open_element(&start, namespace, position)?);
            }
            Event::Empty(start) => {
                let element = open_element(&start, namespace, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element, position)?;
                }
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| xml_error(position, e))?;
                    top.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DecodeError::Xml {
            position: open.position,
            message: format!("element <{}> is never closed", open.qualified_name()),
        });
    }
    Ok(root)
}

fn resolve(resolved: ResolveResult<'_>) -> XmlNamespace {
    match resolved {
        ResolveResult::Bound(ns) => XmlNamespace::Bound(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => XmlNamespace::None,
        ResolveResult::Unknown(prefix) => XmlNamespace::Unbound(String::from_utf8_lossy(&prefix).into_owned()),
    }
}

fn open_element(start: &BytesStart<'_>, namespace: XmlNamespace, position: u64) -> Result<XmlElement, DecodeError> {
    let name = start.name();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| xml_error(position, e))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let value = attribute.unescape_value().map_err(|e| xml_error(position, e))?;
        attributes.push(XmlAttribute {
            prefix: attribute
                .key
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
            local_name: String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(XmlElement {
        namespace,
        prefix: name.prefix().map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
        local_name: String::from_utf8_lossy(name.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
        text: String::new(),
        position,
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: u64,
) -> Result<(), DecodeError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(DecodeError::Xml {
            position,
            message: "document has more than one root element".to_string(),
        });
    }
    Ok(())
}

fn xml_error(position: u64, e: impl std::fmt::Display) -> DecodeError {
    DecodeError::Xml {
        position,
        message: e.to_string(),
    }
}
