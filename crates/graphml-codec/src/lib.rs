//! Typed GraphML reader and writer for in-memory graphs.
//!
//! This crate writes a graph's vertices, edges and graph-level attributes to
//! GraphML and reads them back, driven by a per-type description of which
//! members are serialized.
//!
//! # Overview
//!
//! - **Typed members**: booleans, 32/64-bit integers and floats, strings, and
//!   one-dimensional arrays of those
//! - **Declared defaults**: members equal to their default are not written
//! - **Tags**: an edge or vertex can delegate members to an optional tag
//!   object, serialized under a `TAG-` prefix
//! - **Compiled once**: member accessors are compiled per type on first use
//!   and shared across threads
//!
//! # Quick Start
//!
//! ```rust
//! use graphml_codec::model::{AdjacencyGraph, Edge, GraphMlType, MutableGraph, SchemaBuilder};
//! use graphml_codec::{ReadOptions, WriteOptions, decode_graphml, encode_graphml};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
//! struct City {
//!     name: String,
//!     population: i64,
//! }
//!
//! impl GraphMlType for City {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("name", |c| &c.name, |c, v| c.name = v);
//!         schema.field("population", |c| &c.population, |c, v| c.population = v);
//!     }
//! }
//!
//! let paris = City { name: "Paris".into(), population: 2_100_000 };
//! let lyon = City { name: "Lyon".into(), population: 520_000 };
//! let mut graph: AdjacencyGraph<City, Edge<City>> = AdjacencyGraph::directed();
//! graph.add_vertex(paris.clone());
//! graph.add_vertex(lyon.clone());
//! graph.add_edge(Edge::new(paris, lyon));
//!
//! let xml = encode_graphml(&graph, &WriteOptions::new()).unwrap();
//!
//! let mut decoded: AdjacencyGraph<City, Edge<City>> = AdjacencyGraph::directed();
//! decode_graphml(
//!     &xml,
//!     &mut decoded,
//!     |_id| City::default(),
//!     |s, t, _id| Edge::new(s.clone(), t.clone()),
//!     &ReadOptions::new(),
//! )
//! .unwrap();
//! assert_eq!(decoded, graph);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Values, type schemas, key declarations, graph traits
//! - [`codec`]: Value text codec, codec cache, writer and reader
//! - [`validate`]: Strict GraphML schema validation
//! - [`error`]: Error types
//! - [`format`]: Wire constants
//!
//! # Wire Format
//!
//! Documents are plain GraphML in the `http://graphml.graphdrawing.org/xmlns`
//! namespace. Array members are declared with `attr.type="string"` and
//! written as `;`-terminated elements. Readers also accept a zstd-compressed
//! document, detected by its frame magic.

pub mod codec;
pub mod error;
pub mod format;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    ReadOptions, ReadReport, WriteOptions, decode_graphml, decode_graphml_bytes, encode_graphml,
    encode_graphml_compressed, encode_graphml_with_ids, read_graphml, read_graphml_file,
    write_graphml, write_graphml_file,
};
pub use error::{ConfigError, DecodeError, EncodeError, ErrorCode, TextError, ValidationError};
pub use model::{GraphMlType, SchemaBuilder, TypeSchema, Value, ValueKind};
pub use validate::{ValidationWarning, validate_document};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
