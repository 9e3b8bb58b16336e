//! Graph collaborator traits and a simple in-memory graph.
//!
//! The codec does not own a graph representation. It walks anything that
//! implements [`EdgeListGraph`] and fills anything that implements
//! [`MutableGraph`]. [`AdjacencyGraph`], [`Edge`] and [`TaggedEdge`] cover the
//! common case.

use std::hash::{BuildHasher, Hash};

use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::model::schema::{GraphMlType, SchemaBuilder};

/// An edge with a source and a target vertex.
pub trait GraphEdge {
    type Vertex;

    fn source(&self) -> &Self::Vertex;
    fn target(&self) -> &Self::Vertex;
}

/// A graph that can enumerate its vertices and edges.
pub trait EdgeListGraph {
    type Vertex;
    type Edge: GraphEdge<Vertex = Self::Vertex>;

    fn is_directed(&self) -> bool;
    fn vertices(&self) -> impl Iterator<Item = &Self::Vertex>;
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;
}

/// A graph that vertices and edges can be added to.
pub trait MutableGraph: EdgeListGraph {
    /// Adds a vertex; returns false if the graph refused it.
    fn add_vertex(&mut self, vertex: Self::Vertex) -> bool;

    /// Adds an edge; returns false if the graph refused it.
    fn add_edge(&mut self, edge: Self::Edge) -> bool;
}

/// Plain edge between two vertices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge<V> {
    pub source: V,
    pub target: V,
}

impl<V> Edge<V> {
    pub fn new(source: V, target: V) -> Self {
        Self { source, target }
    }
}

impl<V> GraphEdge for Edge<V> {
    type Vertex = V;

    fn source(&self) -> &V {
        &self.source
    }

    fn target(&self) -> &V {
        &self.target
    }
}

impl<V: 'static> GraphMlType for Edge<V> {
    fn describe(_schema: &mut SchemaBuilder<Self>) {}
}

/// Edge carrying an optional tag object.
///
/// The tag's members are serialized with the `TAG-` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEdge<V, T> {
    pub source: V,
    pub target: V,
    pub tag: Option<T>,
}

impl<V, T> TaggedEdge<V, T> {
    pub fn new(source: V, target: V, tag: Option<T>) -> Self {
        Self { source, target, tag }
    }
}

impl<V, T> GraphEdge for TaggedEdge<V, T> {
    type Vertex = V;

    fn source(&self) -> &V {
        &self.source
    }

    fn target(&self) -> &V {
        &self.target
    }
}

impl<V: 'static, T: GraphMlType + Default> GraphMlType for TaggedEdge<V, T> {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.tag(|e| e.tag.as_ref(), |e| &mut e.tag);
    }
}

/// Vertex and edge lists in insertion order.
///
/// Vertices form a set: adding one equal to a vertex already present is
/// refused.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<V, E> {
    directed: bool,
    vertices: Vec<V>,
    edges: Vec<E>,
    // vertex hash -> positions in `vertices`
    buckets: FxHashMap<u64, Vec<usize>>,
}

impl<V, E> AdjacencyGraph<V, E> {
    pub fn directed() -> Self {
        Self::with_direction(true)
    }

    pub fn undirected() -> Self {
        Self::with_direction(false)
    }

    pub fn with_direction(directed: bool) -> Self {
        Self {
            directed,
            vertices: Vec::new(),
            edges: Vec::new(),
            buckets: FxHashMap::default(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_list(&self) -> &[V] {
        &self.vertices
    }

    pub fn edge_list(&self) -> &[E] {
        &self.edges
    }
}

impl<V: PartialEq, E: PartialEq> PartialEq for AdjacencyGraph<V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.directed == other.directed && self.vertices == other.vertices && self.edges == other.edges
    }
}

impl<V, E> Default for AdjacencyGraph<V, E> {
    fn default() -> Self {
        Self::directed()
    }
}

impl<V, E: GraphEdge<Vertex = V>> EdgeListGraph for AdjacencyGraph<V, E> {
    type Vertex = V;
    type Edge = E;

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.iter()
    }
}

impl<V: Eq + Hash, E: GraphEdge<Vertex = V>> MutableGraph for AdjacencyGraph<V, E> {
    fn add_vertex(&mut self, vertex: V) -> bool {
        let bucket = self.buckets.entry(FxBuildHasher.hash_one(&vertex)).or_default();
        if bucket.iter().any(|&i| self.vertices[i] == vertex) {
            return false;
        }
        bucket.push(self.vertices.len());
        self.vertices.push(vertex);
        true
    }

    fn add_edge(&mut self, edge: E) -> bool {
        self.edges.push(edge);
        true
    }
}

impl<V: 'static, E: 'static> GraphMlType for AdjacencyGraph<V, E> {
    fn describe(_schema: &mut SchemaBuilder<Self>) {}
}
