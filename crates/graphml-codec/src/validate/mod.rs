//! Strict validation of GraphML documents.
//!
//! Checks a parsed document against the structure of the GraphML schema:
//! required attributes, enumerated attribute values, numeric parse hints and
//! which GraphML elements may nest where. Content of `<data>`, `<default>`
//! and `<desc>` is free, as are elements in foreign namespaces.
//!
//! Findings that do not make the document unreadable are returned as
//! warnings instead of errors.

use crate::codec::document::{XmlElement, XmlNamespace};
use crate::error::ValidationError;
use crate::format::{EDGE_DEFAULTS, KEY_SCOPES, PARSE_IDS, PARSE_ORDERS};

/// A non-fatal finding of strict validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Qualified name of the element concerned.
    pub element: String,
    /// Byte offset of its start tag.
    pub position: u64,
    pub message: String,
}

struct Rule {
    name: &'static str,
    required: &'static [&'static str],
    attributes: &'static [&'static str],
    /// `None` when any content is allowed.
    children: Option<&'static [&'static str]>,
}

const ATTR_TYPES: &[&str] = &["boolean", "int", "long", "float", "double", "string"];
const BOOLEANS: &[&str] = &["true", "false"];
const ENDPOINT_TYPES: &[&str] = &["in", "out", "undir"];

const COUNTS: &[&str] = &[
    "parse.nodes",
    "parse.edges",
    "parse.maxindegree",
    "parse.maxoutdegree",
    "parse.indegree",
    "parse.outdegree",
    "parse.degree",
];

const RULES: &[Rule] = &[
    Rule {
        name: "graphml",
        required: &[],
        attributes: &[],
        children: Some(&["desc", "key", "data", "graph"]),
    },
    Rule {
        name: "key",
        required: &["id"],
        attributes: &["id", "for", "attr.name", "attr.type", "attr.default"],
        children: Some(&["desc", "default"]),
    },
    Rule {
        name: "graph",
        required: &["edgedefault"],
        attributes: &[
            "id",
            "edgedefault",
            "parse.nodeids",
            "parse.edgeids",
            "parse.order",
            "parse.nodes",
            "parse.edges",
            "parse.maxindegree",
            "parse.maxoutdegree",
        ],
        children: Some(&["desc", "data", "node", "edge", "hyperedge", "locator"]),
    },
    Rule {
        name: "node",
        required: &["id"],
        attributes: &["id", "parse.indegree", "parse.outdegree", "parse.degree"],
        children: Some(&["desc", "data", "port", "graph", "locator"]),
    },
    Rule {
        name: "edge",
        required: &["source", "target"],
        attributes: &["id", "source", "target", "directed", "sourceport", "targetport"],
        children: Some(&["desc", "data", "graph"]),
    },
    Rule {
        name: "hyperedge",
        required: &[],
        attributes: &["id"],
        children: Some(&["desc", "data", "endpoint", "graph"]),
    },
    Rule {
        name: "endpoint",
        required: &["node"],
        attributes: &["id", "node", "port", "type"],
        children: Some(&["desc"]),
    },
    Rule {
        name: "port",
        required: &["name"],
        attributes: &["name"],
        children: Some(&["desc", "data", "port"]),
    },
    Rule {
        name: "locator",
        required: &[],
        attributes: &[],
        children: Some(&[]),
    },
    Rule {
        name: "data",
        required: &["key"],
        attributes: &["key", "id"],
        children: None,
    },
    Rule {
        name: "default",
        required: &[],
        attributes: &[],
        children: None,
    },
    Rule {
        name: "desc",
        required: &[],
        attributes: &[],
        children: None,
    },
];

/// Validates the tree under `root`, which must be the `graphml` element.
pub fn validate_document(root: &XmlElement) -> Result<Vec<ValidationWarning>, ValidationError> {
    let mut warnings = Vec::new();
    validate_element(root, &mut warnings)?;
    Ok(warnings)
}

fn validate_element(element: &XmlElement, warnings: &mut Vec<ValidationWarning>) -> Result<(), ValidationError> {
    let Some(rule) = RULES.iter().find(|r| r.name == element.local_name) else {
        return Ok(());
    };

    for &attribute in rule.required {
        if element.attribute(attribute).is_none() {
            return Err(ValidationError::RequiredAttribute {
                element: element.qualified_name().into_owned(),
                attribute,
                position: element.position,
            });
        }
    }

    for attribute in element.attributes.iter().filter(|a| a.prefix.is_none()) {
        if !rule.attributes.contains(&attribute.local_name.as_str()) {
            warnings.push(warning(
                element,
                format!("unknown attribute {:?}", attribute.local_name),
            ));
        }
    }

    check_enumerations(element)?;

    let Some(allowed) = rule.children else {
        return Ok(());
    };
    for child in &element.children {
        match &child.namespace {
            XmlNamespace::Unbound(prefix) => {
                warnings.push(warning(child, format!("namespace prefix {prefix:?} is not bound")));
                continue;
            }
            _ if !child.is_graphml() => continue,
            _ => {}
        }
        if !allowed.contains(&child.local_name.as_str()) {
            return Err(ValidationError::ContentNotAllowed {
                parent: element.qualified_name().into_owned(),
                child: child.qualified_name().into_owned(),
                position: child.position,
            });
        }
        validate_element(child, warnings)?;
    }
    Ok(())
}

fn check_enumerations(element: &XmlElement) -> Result<(), ValidationError> {
    let checks: &[(&'static str, &[&str])] = match element.local_name.as_str() {
        "key" => &[("for", KEY_SCOPES), ("attr.type", ATTR_TYPES)],
        "graph" => &[
            ("edgedefault", EDGE_DEFAULTS),
            ("parse.order", PARSE_ORDERS),
            ("parse.nodeids", PARSE_IDS),
            ("parse.edgeids", PARSE_IDS),
        ],
        "edge" => &[("directed", BOOLEANS)],
        "endpoint" => &[("type", ENDPOINT_TYPES)],
        _ => &[],
    };
    for &(attribute, allowed) in checks {
        if let Some(value) = element.attribute(attribute) {
            if !allowed.contains(&value) {
                return Err(ValidationError::InvalidEnumeration {
                    element: element.qualified_name().into_owned(),
                    attribute,
                    value: value.to_string(),
                });
            }
        }
    }

    for &attribute in COUNTS {
        if let Some(value) = element.attribute(attribute) {
            if value.trim().parse::<u64>().is_err() {
                return Err(ValidationError::InvalidCount {
                    element: element.qualified_name().into_owned(),
                    attribute,
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn warning(element: &XmlElement, message: String) -> ValidationWarning {
    ValidationWarning {
        element: element.qualified_name().into_owned(),
        position: element.position,
        message,
    }
}
