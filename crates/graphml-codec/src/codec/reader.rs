//! GraphML input.
//!
//! A document is read in three passes over its single graph: graph data,
//! then nodes, then edges, so an edge may reference a node declared after it.
//! Everything is staged first and handed to the target graph only once the
//! whole document has been accepted; an error never leaves a partial graph.
//!
//! Each element starts from its type's declared defaults, then the defaults
//! of the document's keys, then its own `<data>` children.

use std::fs;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::codec::cache::{Direction, TypeCodec, codec_for};
use crate::codec::document::{XmlElement, parse_document};
use crate::codec::text::parse_value;
use crate::error::{DecodeError, TextError};
use crate::format::{EDGE_DEFAULTS, ZSTD_MAGIC};
use crate::model::{GraphMlType, KeyDeclaration, KeyScope, KeyTable, MutableGraph, ScalarKind, Value};
use crate::validate::{ValidationWarning, validate_document};

/// Options for GraphML input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Validate the document against the GraphML schema before reading it.
    pub strict: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Summary of a successful read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    /// Vertices handed to the graph.
    pub nodes: usize,
    /// Edges handed to the graph.
    pub edges: usize,
    /// Key ids whose `attr.name` matches no member, in first-seen order.
    pub ignored_keys: Vec<String>,
    /// Non-fatal findings of strict validation.
    pub warnings: Vec<ValidationWarning>,
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Reads a GraphML document into `graph`.
///
/// `make_vertex` receives each node id; `make_edge` receives the populated
/// endpoints and the edge id (empty when the document has none).
pub fn decode_graphml<G, VF, EF>(
    input: &str,
    graph: &mut G,
    make_vertex: VF,
    make_edge: EF,
    options: &ReadOptions,
) -> Result<ReadReport, DecodeError>
where
    G: MutableGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    VF: FnMut(&str) -> G::Vertex,
    EF: FnMut(&G::Vertex, &G::Vertex, &str) -> G::Edge,
{
    let root = match parse_document(input)? {
        Some(root) if root.is("graphml") => root,
        _ => return Err(DecodeError::MissingGraphMl),
    };

    let mut report = ReadReport::default();
    if options.strict {
        report.warnings = validate_document(&root)?;
        for warning in &report.warnings {
            warn!(
                element = %warning.element,
                position = warning.position,
                "{}",
                warning.message
            );
        }
    }

    let mut reader = DocumentReader::new(&root, report)?;
    let staged = reader.stage::<G, VF, EF>(make_vertex, make_edge)?;
    reader.commit(graph, staged)
}

/// Reads a GraphML document from `input` into `graph`.
pub fn read_graphml<G, R, VF, EF>(
    mut input: R,
    graph: &mut G,
    make_vertex: VF,
    make_edge: EF,
    options: &ReadOptions,
) -> Result<ReadReport, DecodeError>
where
    G: MutableGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    R: Read,
    VF: FnMut(&str) -> G::Vertex,
    EF: FnMut(&G::Vertex, &G::Vertex, &str) -> G::Edge,
{
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    decode_graphml_bytes(&bytes, graph, make_vertex, make_edge, options)
}

/// Reads a GraphML document, zstd-compressed or not, from `bytes`.
pub fn decode_graphml_bytes<G, VF, EF>(
    bytes: &[u8],
    graph: &mut G,
    make_vertex: VF,
    make_edge: EF,
    options: &ReadOptions,
) -> Result<ReadReport, DecodeError>
where
    G: MutableGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    VF: FnMut(&str) -> G::Vertex,
    EF: FnMut(&G::Vertex, &G::Vertex, &str) -> G::Edge,
{
    let decompressed;
    let bytes = if bytes.starts_with(&ZSTD_MAGIC) {
        decompressed =
            zstd::decode_all(bytes).map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;
        decompressed.as_slice()
    } else {
        bytes
    };
    let input = std::str::from_utf8(bytes).map_err(|e| DecodeError::Xml {
        position: e.valid_up_to() as u64,
        message: e.to_string(),
    })?;
    decode_graphml(input, graph, make_vertex, make_edge, options)
}

/// Reads the GraphML file at `path` into `graph`.
pub fn read_graphml_file<G, P, VF, EF>(
    path: P,
    graph: &mut G,
    make_vertex: VF,
    make_edge: EF,
    options: &ReadOptions,
) -> Result<ReadReport, DecodeError>
where
    G: MutableGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    P: AsRef<Path>,
    VF: FnMut(&str) -> G::Vertex,
    EF: FnMut(&G::Vertex, &G::Vertex, &str) -> G::Edge,
{
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(DecodeError::Argument { name: "path" });
    }
    let bytes = fs::read(path)?;
    decode_graphml_bytes(&bytes, graph, make_vertex, make_edge, options)
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// Parsed key defaults of one scope, split by where the member lives.
#[derive(Default)]
struct KeyDefaults {
    direct: Vec<(usize, Value, String)>,
    tagged: Vec<(usize, Value, String)>,
}

/// Everything read from the document, not yet handed to the graph.
struct Staged<V, E> {
    graph_defaults: KeyDefaults,
    graph_values: Vec<(usize, Value, String)>,
    vertices: Vec<V>,
    edges: Vec<E>,
}

struct DocumentReader<'a> {
    graph: &'a XmlElement,
    keys: KeyTable,
    report: ReadReport,
}

impl<'a> DocumentReader<'a> {
    fn new(root: &'a XmlElement, report: ReadReport) -> Result<Self, DecodeError> {
        let mut keys = KeyTable::new();
        let mut graphs = Vec::new();

        for child in root.graphml_children() {
            match child.local_name.as_str() {
                "key" => keys.insert(read_key(child)?)?,
                "graph" => graphs.push(child),
                "desc" | "data" => {}
                _ => return Err(unexpected(child, root)),
            }
        }

        let graph = match graphs.as_slice() {
            [] => return Err(DecodeError::NoGraph),
            [graph] => *graph,
            _ => return Err(DecodeError::MultipleGraphs { count: graphs.len() }),
        };
        if let Some(value) = graph.attribute("edgedefault") {
            if !EDGE_DEFAULTS.contains(&value) {
                return Err(DecodeError::InvalidAttribute {
                    element: "graph",
                    attribute: "edgedefault",
                    value: value.to_string(),
                });
            }
        }

        Ok(Self { graph, keys, report })
    }

    fn stage<G, VF, EF>(
        &mut self,
        mut make_vertex: VF,
        mut make_edge: EF,
    ) -> Result<Staged<G::Vertex, G::Edge>, DecodeError>
    where
        G: MutableGraph + GraphMlType,
        G::Vertex: GraphMlType,
        G::Edge: GraphMlType,
        VF: FnMut(&str) -> G::Vertex,
        EF: FnMut(&G::Vertex, &G::Vertex, &str) -> G::Edge,
    {
        let graph_codec = codec_for::<G>(Direction::Decode)?;
        let vertex_codec = codec_for::<G::Vertex>(Direction::Decode)?;
        let edge_codec = codec_for::<G::Edge>(Direction::Decode)?;

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut graph_data = Vec::new();
        let graph = self.graph;
        for child in graph.graphml_children() {
            match child.local_name.as_str() {
                "node" => nodes.push(child),
                "edge" => edges.push(child),
                "data" => graph_data.push(child),
                "desc" => {}
                _ => return Err(unexpected(child, graph)),
            }
        }

        let graph_defaults = self.key_defaults(KeyScope::Graph, &graph_codec)?;
        let graph_values = self.data_values(&graph_data, KeyScope::Graph, &graph_codec)?;

        let node_defaults = self.key_defaults(KeyScope::Node, &vertex_codec)?;
        let mut vertices = Vec::with_capacity(nodes.len());
        let mut index_of: FxHashMap<&str, usize> = FxHashMap::default();
        for node in nodes {
            let id = required(node, "node", "id")?;
            if index_of.contains_key(id) {
                return Err(DecodeError::DuplicateNode { id: id.to_string() });
            }
            check_children(node, &["data", "desc"])?;

            let mut vertex = make_vertex(id);
            vertex_codec.apply_defaults(&mut vertex);
            let data = node_data(node);
            let values = self.data_values(&data, KeyScope::Node, &vertex_codec)?;
            store_with_defaults(&vertex_codec, &mut vertex, &node_defaults, values, "node")?;

            index_of.insert(id, vertices.len());
            vertices.push(vertex);
        }

        let edge_defaults = self.key_defaults(KeyScope::Edge, &edge_codec)?;
        let mut staged_edges = Vec::with_capacity(edges.len());
        for element in edges {
            let source = required(element, "edge", "source")?;
            let target = required(element, "edge", "target")?;
            let id = element.attribute("id").unwrap_or("");
            check_children(element, &["data", "desc"])?;

            let resolve = |node: &str| {
                index_of
                    .get(node)
                    .copied()
                    .ok_or_else(|| DecodeError::UnresolvedVertex {
                        edge: id.to_string(),
                        node: node.to_string(),
                    })
            };
            let (s, t) = (resolve(source)?, resolve(target)?);

            let mut edge = make_edge(&vertices[s], &vertices[t], id);
            edge_codec.apply_defaults(&mut edge);
            let data = node_data(element);
            let values = self.data_values(&data, KeyScope::Edge, &edge_codec)?;
            store_with_defaults(&edge_codec, &mut edge, &edge_defaults, values, "edge")?;
            staged_edges.push(edge);
        }

        Ok(Staged {
            graph_defaults,
            graph_values,
            vertices,
            edges: staged_edges,
        })
    }

    fn commit<G>(self, graph: &mut G, staged: Staged<G::Vertex, G::Edge>) -> Result<ReadReport, DecodeError>
    where
        G: MutableGraph + GraphMlType,
    {
        let graph_codec = codec_for::<G>(Direction::Decode)?;
        graph_codec.apply_defaults(graph);
        store_with_defaults(&graph_codec, graph, &staged.graph_defaults, staged.graph_values, "graph")?;

        let mut report = self.report;
        for vertex in staged.vertices {
            if graph.add_vertex(vertex) {
                report.nodes += 1;
            }
        }
        for edge in staged.edges {
            if graph.add_edge(edge) {
                report.edges += 1;
            }
        }

        debug!(
            nodes = report.nodes,
            edges = report.edges,
            keys = self.keys.len(),
            ignored = report.ignored_keys.len(),
            "read GraphML document"
        );
        Ok(report)
    }

    /// Parsed key defaults that apply to members of `scope`.
    fn key_defaults<T>(&mut self, scope: KeyScope, codec: &TypeCodec<T>) -> Result<KeyDefaults, DecodeError> {
        let mut defaults = KeyDefaults::default();
        for key in self.keys.iter() {
            let Some(default) = &key.default else {
                continue;
            };
            if !key.scope.applies_to(scope) {
                continue;
            }
            let Some(index) = member_index(key, codec) else {
                continue;
            };
            let field = &codec.fields()[index];
            let value = parse_value(default, field.kind()).map_err(|source| DecodeError::InvalidValue {
                key: key.id.clone(),
                element: "key",
                source,
            })?;
            let entry = (index, value, key.id.clone());
            if field.is_tagged() {
                defaults.tagged.push(entry);
            } else {
                defaults.direct.push(entry);
            }
        }
        Ok(defaults)
    }

    /// Parsed `<data>` children, in document order.
    fn data_values<T>(
        &mut self,
        data: &[&XmlElement],
        scope: KeyScope,
        codec: &TypeCodec<T>,
    ) -> Result<Vec<(usize, Value, String)>, DecodeError> {
        let element = scope.as_str();
        let mut values = Vec::with_capacity(data.len());
        for item in data {
            let id = required(item, "data", "key")?;
            let key = self.keys.get(id).ok_or_else(|| DecodeError::UnknownKey {
                key: id.to_string(),
                element,
            })?;
            if !key.scope.applies_to(scope) {
                return Err(DecodeError::KeyScopeMismatch {
                    key: id.to_string(),
                    declared: key.scope.as_str(),
                    element,
                });
            }
            let Some(index) = member_index(key, codec) else {
                if !self.report.ignored_keys.iter().any(|k| k == id) {
                    trace!(key = id, element, "key matches no member, ignored");
                    self.report.ignored_keys.push(id.to_string());
                }
                continue;
            };
            let kind = codec.fields()[index].kind();
            let value = parse_value(&item.text, kind).map_err(|source| DecodeError::InvalidValue {
                key: id.to_string(),
                element,
                source,
            })?;
            values.push((index, value, id.to_string()));
        }
        Ok(values)
    }
}

fn member_index<T>(key: &KeyDeclaration, codec: &TypeCodec<T>) -> Option<usize> {
    key.name.as_deref().and_then(|name| codec.field_index(name))
}

/// Stores key defaults, then `<data>` values, into `target`.
///
/// Defaults of tag members come last and only land when the data created the
/// tag without setting that member.
fn store_with_defaults<T>(
    codec: &TypeCodec<T>,
    target: &mut T,
    defaults: &KeyDefaults,
    values: Vec<(usize, Value, String)>,
    element: &'static str,
) -> Result<(), DecodeError> {
    let assigned: Vec<usize> = values.iter().map(|(index, ..)| *index).collect();
    store(codec, target, defaults.direct.iter().cloned().chain(values), element)?;
    if defaults.tagged.is_empty() {
        return Ok(());
    }
    let pending: Vec<_> = defaults
        .tagged
        .iter()
        .filter(|(index, ..)| !assigned.contains(index) && codec.is_reachable(target, *index))
        .cloned()
        .collect();
    store(codec, target, pending, element)
}

fn store<T>(
    codec: &TypeCodec<T>,
    target: &mut T,
    values: impl IntoIterator<Item = (usize, Value, String)>,
    element: &'static str,
) -> Result<(), DecodeError> {
    for (index, value, key) in values {
        let kind = value.kind();
        let text = format!("{value:?}");
        if !codec.decode_into(target, index, value) {
            return Err(DecodeError::InvalidValue {
                key,
                element,
                source: TextError::OutOfRange { kind, value: text },
            });
        }
    }
    Ok(())
}

fn read_key(element: &XmlElement) -> Result<KeyDeclaration, DecodeError> {
    let id = required(element, "key", "id")?;
    let scope = match element.attribute("for") {
        None => KeyScope::All,
        Some(value) => KeyScope::parse(value).ok_or_else(|| DecodeError::InvalidAttribute {
            element: "key",
            attribute: "for",
            value: value.to_string(),
        })?,
    };
    let attr_type = element.attribute("attr.type");
    if let Some(value) = attr_type {
        if ScalarKind::from_wire_type(value).is_none() {
            return Err(DecodeError::InvalidAttribute {
                element: "key",
                attribute: "attr.type",
                value: value.to_string(),
            });
        }
    }
    let default = element.attribute("attr.default").map(str::to_string).or_else(|| {
        element
            .graphml_children()
            .find(|c| c.local_name == "default")
            .map(|c| c.text.clone())
    });
    Ok(KeyDeclaration {
        id: id.to_string(),
        scope,
        name: element.attribute("attr.name").map(str::to_string),
        attr_type: attr_type.map(str::to_string),
        default,
    })
}

fn required<'e>(element: &'e XmlElement, name: &'static str, attribute: &'static str) -> Result<&'e str, DecodeError> {
    element.attribute(attribute).ok_or(DecodeError::MissingAttribute {
        element: name,
        attribute,
        position: element.position,
    })
}

fn node_data(element: &XmlElement) -> Vec<&XmlElement> {
    element.graphml_children().filter(|c| c.local_name == "data").collect()
}

fn check_children(element: &XmlElement, allowed: &[&str]) -> Result<(), DecodeError> {
    match element
        .graphml_children()
        .find(|c| !allowed.contains(&c.local_name.as_str()))
    {
        Some(child) => Err(unexpected(child, element)),
        None => Ok(()),
    }
}

fn unexpected(child: &XmlElement, parent: &XmlElement) -> DecodeError {
    DecodeError::UnexpectedElement {
        name: child.qualified_name().into_owned(),
        parent: parent.qualified_name().into_owned(),
        position: child.position,
    }
}
