//! Data model for typed GraphML.
//!
//! This module contains the types the codec is built from:
//! - Values and value kinds (what a member holds)
//! - Schemas (which members of a type are serialized, and how to reach them)
//! - Key declarations (how members appear in a document)
//! - Graph traits and a simple in-memory graph

pub mod graph;
pub mod key;
pub mod schema;
pub mod value;

pub use graph::{AdjacencyGraph, Edge, EdgeListGraph, GraphEdge, MutableGraph, TaggedEdge};
pub use key::{KeyDeclaration, KeyScope, KeyTable};
pub use schema::{AccessStep, FieldBuilder, FieldDescriptor, GraphMlType, SchemaBuilder, TypeSchema};
pub use value::{AttributeValue, ScalarKind, Value, ValueKind};
