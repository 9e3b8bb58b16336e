//! Fixed constants of the GraphML wire grammar this crate reads and writes.

/// GraphML namespace URI.
pub const GRAPHML_NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";

/// Prefix applied to the wire names of tag-delegated members.
pub const DEFAULT_TAG_PREFIX: &str = "TAG-";

/// Terminator written after every array element.
pub const ARRAY_TERMINATOR: char = ';';

/// Escape character inside string array elements.
pub const ARRAY_ESCAPE: char = '\\';

/// Id written on the `graph` element unless overridden.
pub const DEFAULT_GRAPH_ID: &str = "G";

/// Magic bytes opening a zstd frame.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Allowed values of `key@for`.
pub const KEY_SCOPES: &[&str] = &[
    "all", "graphml", "graph", "node", "edge", "hyperedge", "port", "endpoint",
];

/// Allowed values of `graph@edgedefault`.
pub const EDGE_DEFAULTS: &[&str] = &["directed", "undirected"];

/// Allowed values of `graph@parse.order`.
pub const PARSE_ORDERS: &[&str] = &["nodesfirst", "adjacencylist", "free"];

/// Allowed values of `graph@parse.nodeids` and `graph@parse.edgeids`.
pub const PARSE_IDS: &[&str] = &["canonical", "free"];
