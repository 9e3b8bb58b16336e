//! GraphML `<key>` declarations.

use rustc_hash::FxHashMap;

use crate::codec::text::format_value;
use crate::error::DecodeError;
use crate::model::{Value, ValueKind};

/// Element kinds a key may apply to (the `for` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyScope {
    All,
    GraphMl,
    Graph,
    Node,
    Edge,
    HyperEdge,
    Port,
    Endpoint,
}

impl KeyScope {
    /// Returns the `for` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyScope::All => "all",
            KeyScope::GraphMl => "graphml",
            KeyScope::Graph => "graph",
            KeyScope::Node => "node",
            KeyScope::Edge => "edge",
            KeyScope::HyperEdge => "hyperedge",
            KeyScope::Port => "port",
            KeyScope::Endpoint => "endpoint",
        }
    }

    /// Parses a `for` attribute value.
    pub fn parse(s: &str) -> Option<KeyScope> {
        match s {
            "all" => Some(KeyScope::All),
            "graphml" => Some(KeyScope::GraphMl),
            "graph" => Some(KeyScope::Graph),
            "node" => Some(KeyScope::Node),
            "edge" => Some(KeyScope::Edge),
            "hyperedge" => Some(KeyScope::HyperEdge),
            "port" => Some(KeyScope::Port),
            "endpoint" => Some(KeyScope::Endpoint),
            _ => None,
        }
    }

    /// Returns true if a key declared for `self` may appear in `element`.
    pub fn applies_to(self, element: KeyScope) -> bool {
        self == KeyScope::All || self == element
    }
}

/// One `<key>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDeclaration {
    pub id: String,
    pub scope: KeyScope,
    /// `attr.name`, matched against member wire names.
    pub name: Option<String>,
    /// `attr.type`, kept as written.
    pub attr_type: Option<String>,
    /// Default value text, from `attr.default` or a `<default>` child.
    pub default: Option<String>,
}

/// Key declarations of one document, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    keys: Vec<KeyDeclaration>,
    by_id: FxHashMap<String, usize>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration read from a document.
    pub fn insert(&mut self, key: KeyDeclaration) -> Result<(), DecodeError> {
        if self.by_id.contains_key(&key.id) {
            return Err(DecodeError::DuplicateKey { id: key.id });
        }
        self.by_id.insert(key.id.clone(), self.keys.len());
        self.keys.push(key);
        Ok(())
    }

    /// Declares a key for a member and returns its generated id.
    ///
    /// Ids are `d0`, `d1`, ... in declaration order, so members of different
    /// scopes never collide even when they share a wire name.
    pub(crate) fn declare(
        &mut self,
        scope: KeyScope,
        name: &str,
        kind: ValueKind,
        default: Option<&Value>,
    ) -> String {
        let id = format!("d{}", self.keys.len());
        self.by_id.insert(id.clone(), self.keys.len());
        self.keys.push(KeyDeclaration {
            id: id.clone(),
            scope,
            name: Some(name.to_string()),
            attr_type: Some(kind.wire_type().to_string()),
            default: default.map(format_value),
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<&KeyDeclaration> {
        self.by_id.get(id).map(|&i| &self.keys[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyDeclaration> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
