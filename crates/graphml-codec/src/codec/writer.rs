//! GraphML output.
//!
//! Keys are declared for graph members first, then node members (only if the
//! graph has vertices), then edge members (only if it has edges). Key ids are
//! `d0`, `d1`, ... in that order. A member equal to its declared default is
//! not written; neither is a member inside an absent tag.

use std::fs::File;
use std::hash::Hash;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::codec::cache::{Direction, TypeCodec, codec_for};
use crate::codec::text::format_value;
use crate::error::EncodeError;
use crate::format::{DEFAULT_GRAPH_ID, GRAPHML_NAMESPACE};
use crate::model::{EdgeListGraph, GraphEdge, GraphMlType, KeyScope, KeyTable};

/// Options for GraphML output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write the `<?xml ...?>` declaration.
    pub emit_declaration: bool,
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
    /// Qualify GraphML elements with this prefix instead of using the
    /// default namespace.
    pub namespace_prefix: Option<String>,
    /// Id of the `graph` element.
    pub graph_id: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteOptions {
    /// Declaration, two-space indentation, default namespace, graph id `G`.
    pub fn new() -> Self {
        Self {
            emit_declaration: true,
            indent: Some(2),
            namespace_prefix: None,
            graph_id: DEFAULT_GRAPH_ID.to_string(),
        }
    }

    /// No declaration and no indentation.
    pub fn compact() -> Self {
        Self {
            emit_declaration: false,
            indent: None,
            ..Self::new()
        }
    }

    fn validate(&self) -> Result<(), EncodeError> {
        if self.graph_id.is_empty() {
            return Err(EncodeError::Argument { name: "graph_id" });
        }
        if self.namespace_prefix.as_deref() == Some("") {
            return Err(EncodeError::Argument {
                name: "namespace_prefix",
            });
        }
        Ok(())
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Encodes `graph` to a GraphML string, numbering vertices and edges
/// `0`, `1`, ... in enumeration order.
pub fn encode_graphml<G>(graph: &G, options: &WriteOptions) -> Result<String, EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType + Eq + Hash,
    G::Edge: GraphMlType,
{
    let mut buf = Vec::new();
    write_with_index_ids(graph, &mut buf, options)?;
    into_string(buf)
}

/// Encodes `graph` to a GraphML string using caller supplied identities.
pub fn encode_graphml_with_ids<G, VI, EI>(
    graph: &G,
    vertex_id: VI,
    edge_id: EI,
    options: &WriteOptions,
) -> Result<String, EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    VI: FnMut(&G::Vertex) -> String,
    EI: FnMut(&G::Edge) -> String,
{
    let mut buf = Vec::new();
    write_graphml(graph, &mut buf, vertex_id, edge_id, options)?;
    into_string(buf)
}

/// Writes `graph` as GraphML to `out` using caller supplied identities.
pub fn write_graphml<G, W, VI, EI>(
    graph: &G,
    out: W,
    mut vertex_id: VI,
    mut edge_id: EI,
    options: &WriteOptions,
) -> Result<(), EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    W: Write,
    VI: FnMut(&G::Vertex) -> String,
    EI: FnMut(&G::Edge) -> String,
{
    write_document(
        graph,
        out,
        &mut |v| Some(vertex_id(v)),
        &mut |e, _| edge_id(e),
        options,
    )
}

/// Writes `graph` as GraphML to the file at `path`, replacing it.
pub fn write_graphml_file<G, P, VI, EI>(
    graph: &G,
    path: P,
    vertex_id: VI,
    edge_id: EI,
    options: &WriteOptions,
) -> Result<(), EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    P: AsRef<Path>,
    VI: FnMut(&G::Vertex) -> String,
    EI: FnMut(&G::Edge) -> String,
{
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(EncodeError::Argument { name: "path" });
    }
    options.validate()?;
    let mut out = BufWriter::new(File::create(path)?);
    write_graphml(graph, &mut out, vertex_id, edge_id, options)?;
    out.flush()?;
    Ok(())
}

/// Encodes `graph` and compresses the document as a zstd frame.
pub fn encode_graphml_compressed<G>(
    graph: &G,
    options: &WriteOptions,
    level: i32,
) -> Result<Vec<u8>, EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType + Eq + Hash,
    G::Edge: GraphMlType,
{
    let mut buf = Vec::new();
    write_with_index_ids(graph, &mut buf, options)?;
    zstd::encode_all(buf.as_slice(), level).map_err(|e| EncodeError::CompressionFailed(e.to_string()))
}

fn write_with_index_ids<G, W>(graph: &G, out: W, options: &WriteOptions) -> Result<(), EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType + Eq + Hash,
    G::Edge: GraphMlType,
    W: Write,
{
    let mut index: FxHashMap<&G::Vertex, usize> = FxHashMap::default();
    for vertex in graph.vertices() {
        let next = index.len();
        index.entry(vertex).or_insert(next);
    }
    write_document(
        graph,
        out,
        &mut |v| index.get(v).map(|i| i.to_string()),
        &mut |_, i| i.to_string(),
        options,
    )
}

fn into_string(buf: Vec<u8>) -> Result<String, EncodeError> {
    String::from_utf8(buf).map_err(|e| EncodeError::Io(e.to_string()))
}

// =============================================================================
// DOCUMENT
// =============================================================================

type VertexIds<'a, V> = &'a mut dyn FnMut(&V) -> Option<String>;
type EdgeIds<'a, E> = &'a mut dyn FnMut(&E, usize) -> String;

fn write_document<G, W>(
    graph: &G,
    out: W,
    vertex_id: VertexIds<'_, G::Vertex>,
    edge_id: EdgeIds<'_, G::Edge>,
    options: &WriteOptions,
) -> Result<(), EncodeError>
where
    G: EdgeListGraph + GraphMlType,
    G::Vertex: GraphMlType,
    G::Edge: GraphMlType,
    W: Write,
{
    options.validate()?;

    let graph_codec = codec_for::<G>(Direction::Encode)?;
    let vertex_codec = codec_for::<G::Vertex>(Direction::Encode)?;
    let edge_codec = codec_for::<G::Edge>(Direction::Encode)?;

    let mut keys = KeyTable::new();
    let graph_keys = declare_keys(&mut keys, KeyScope::Graph, &graph_codec);
    let node_keys = match graph.vertices().next() {
        Some(_) => declare_keys(&mut keys, KeyScope::Node, &vertex_codec),
        None => Vec::new(),
    };
    let edge_keys = match graph.edges().next() {
        Some(_) => declare_keys(&mut keys, KeyScope::Edge, &edge_codec),
        None => Vec::new(),
    };

    let names = Names::new(options.namespace_prefix.as_deref());
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(out, b' ', width),
        None => Writer::new(out),
    };

    if options.emit_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let mut root = BytesStart::new(names.qualify("graphml"));
    match options.namespace_prefix.as_deref() {
        Some(prefix) => root.push_attribute((format!("xmlns:{prefix}").as_str(), GRAPHML_NAMESPACE)),
        None => root.push_attribute(("xmlns", GRAPHML_NAMESPACE)),
    }
    writer.write_event(Event::Start(root))?;

    for key in keys.iter() {
        let mut start = BytesStart::new(names.qualify("key"));
        start.push_attribute(("id", key.id.as_str()));
        start.push_attribute(("for", key.scope.as_str()));
        if let Some(name) = &key.name {
            start.push_attribute(("attr.name", name.as_str()));
        }
        if let Some(attr_type) = &key.attr_type {
            start.push_attribute(("attr.type", attr_type.as_str()));
        }
        match &key.default {
            Some(default) => {
                writer.write_event(Event::Start(start))?;
                write_text_element(&mut writer, &names.qualify("default"), None, default)?;
                writer.write_event(Event::End(BytesEnd::new(names.qualify("key"))))?;
            }
            None => writer.write_event(Event::Empty(start))?,
        }
    }

    // Equal identities denote the same node; it is written once.
    let mut written = FxHashSet::default();
    let mut nodes = Vec::new();
    for (index, vertex) in graph.vertices().enumerate() {
        let id = vertex_id(vertex).ok_or_else(|| EncodeError::UnknownEndpoint {
            edge: format!("node #{index}"),
        })?;
        if written.insert(id.clone()) {
            nodes.push((vertex, id));
        }
    }
    let edge_total = graph.edges().count();

    let mut graph_start = BytesStart::new(names.qualify("graph"));
    let edgedefault = if graph.is_directed() { "directed" } else { "undirected" };
    let (parse_nodes, parse_edges) = (nodes.len().to_string(), edge_total.to_string());
    graph_start.push_attribute(("id", options.graph_id.as_str()));
    graph_start.push_attribute(("edgedefault", edgedefault));
    graph_start.push_attribute(("parse.nodes", parse_nodes.as_str()));
    graph_start.push_attribute(("parse.edges", parse_edges.as_str()));
    graph_start.push_attribute(("parse.order", "nodesfirst"));
    graph_start.push_attribute(("parse.nodeids", "free"));
    graph_start.push_attribute(("parse.edgeids", "free"));
    writer.write_event(Event::Start(graph_start))?;

    write_data(&mut writer, &names, &graph_codec, graph, &graph_keys)?;

    for (vertex, id) in &nodes {
        let mut start = BytesStart::new(names.qualify("node"));
        start.push_attribute(("id", id.as_str()));
        write_element(&mut writer, &names, "node", start, &vertex_codec, *vertex, &node_keys)?;
    }

    for (index, edge) in graph.edges().enumerate() {
        let id = edge_id(edge, index);
        let source = endpoint_id(vertex_id, &written, edge.source(), &id)?;
        let target = endpoint_id(vertex_id, &written, edge.target(), &id)?;
        let mut start = BytesStart::new(names.qualify("edge"));
        start.push_attribute(("id", id.as_str()));
        start.push_attribute(("source", source.as_str()));
        start.push_attribute(("target", target.as_str()));
        write_element(&mut writer, &names, "edge", start, &edge_codec, edge, &edge_keys)?;
    }

    writer.write_event(Event::End(BytesEnd::new(names.qualify("graph"))))?;
    writer.write_event(Event::End(BytesEnd::new(names.qualify("graphml"))))?;
    writer.into_inner().flush()?;

    debug!(
        nodes = nodes.len(),
        edges = edge_total,
        keys = keys.len(),
        "wrote GraphML document"
    );
    Ok(())
}

fn declare_keys<T>(keys: &mut KeyTable, scope: KeyScope, codec: &TypeCodec<T>) -> Vec<String> {
    codec
        .fields()
        .iter()
        .map(|f| keys.declare(scope, f.name(), f.kind(), f.default()))
        .collect()
}

fn endpoint_id<V, F>(
    vertex_id: &mut F,
    written: &FxHashSet<String>,
    vertex: &V,
    edge: &str,
) -> Result<String, EncodeError>
where
    F: FnMut(&V) -> Option<String> + ?Sized,
{
    vertex_id(vertex)
        .filter(|id| written.contains(id))
        .ok_or_else(|| EncodeError::UnknownEndpoint {
            edge: edge.to_string(),
        })
}

/// Writes a node or edge, as an empty element when it carries no data.
fn write_element<T, W: Write>(
    writer: &mut Writer<W>,
    names: &Names,
    local: &str,
    start: BytesStart<'_>,
    codec: &TypeCodec<T>,
    element: &T,
    keys: &[String],
) -> Result<(), EncodeError> {
    let mut values = Vec::new();
    codec.encode(element, |index, value| {
        values.push((index, value));
        Ok(())
    })?;

    if values.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    let data = names.qualify("data");
    for (index, value) in values {
        write_text_element(writer, &data, Some(&keys[index]), &format_value(&value))?;
    }
    writer.write_event(Event::End(BytesEnd::new(names.qualify(local))))?;
    Ok(())
}

fn write_data<T, W: Write>(
    writer: &mut Writer<W>,
    names: &Names,
    codec: &TypeCodec<T>,
    element: &T,
    keys: &[String],
) -> Result<(), EncodeError> {
    let data = names.qualify("data");
    codec.encode(element, |index, value| {
        write_text_element(writer, &data, Some(&keys[index]), &format_value(&value))
    })
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    key: Option<&str>,
    text: &str,
) -> Result<(), EncodeError> {
    let mut start = BytesStart::new(name);
    if let Some(key) = key {
        start.push_attribute(("key", key));
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Element names, qualified with the configured prefix.
struct Names {
    prefix: Option<String>,
}

impl Names {
    fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
        }
    }

    fn qualify(&self, local: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_string(),
        }
    }
}
