//! Error types for GraphML schema extraction, encoding, decoding and validation.

use thiserror::Error;

use crate::model::ValueKind;

/// Error categories callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// An element type's description is unusable (detected once, at first use).
    Configuration,
    /// A required argument was empty or otherwise unusable; no I/O was attempted.
    Argument,
    /// The document violates the fixed GraphML grammar.
    Structural,
    /// The document failed strict schema validation.
    Validation,
    /// The underlying stream or XML tokenizer failed.
    Io,
}

impl ErrorCode {
    /// Returns a short stable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::Configuration => "configuration",
            ErrorCode::Argument => "argument",
            ErrorCode::Structural => "structural",
            ErrorCode::Validation => "validation",
            ErrorCode::Io => "io",
        }
    }
}

/// Error in an element type's description.
///
/// Raised while extracting the field descriptors of a type or compiling its
/// codec. These are deterministic: the type itself has to be fixed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{type_name}: field with empty wire name")]
    EmptyFieldName { type_name: &'static str },

    #[error("{type_name}: wire name {name:?} declared more than once")]
    DuplicateField { type_name: &'static str, name: String },

    #[error("{type_name}: tag prefix must not be empty")]
    EmptyTagPrefix { type_name: &'static str },

    #[error("{type_name}: tag type {tag_type} declares a tag of its own")]
    NestedTag {
        type_name: &'static str,
        tag_type: &'static str,
    },

    #[error("{type_name}.{field}: default value of kind {found} does not match field kind {expected}")]
    DefaultKindMismatch {
        type_name: &'static str,
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("{type_name}.{field}: default {text:?} is not a valid {expected}")]
    InvalidDefault {
        type_name: &'static str,
        field: String,
        expected: ValueKind,
        text: String,
    },

    #[error("{type_name}.{field}: a {actual} member cannot be serialized as {declared}")]
    UnsupportedKind {
        type_name: &'static str,
        field: String,
        actual: ValueKind,
        declared: ValueKind,
    },

    #[error("{type_name}.{field}: no getter, cannot be written")]
    MissingGetter { type_name: &'static str, field: String },

    #[error("{type_name}.{field}: no setter, cannot be read")]
    MissingSetter { type_name: &'static str, field: String },

    #[error("codec registry holds a foreign entry for {type_name}")]
    RegistryCorrupted { type_name: &'static str },
}

/// Error while turning a wire token into a typed value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextError {
    #[error("{text:?} is not a boolean")]
    InvalidBool { text: String },

    #[error("{text:?} is not a valid {kind}")]
    InvalidNumber { kind: ValueKind, text: String },

    #[error("array element {text:?} is missing its ';' terminator")]
    UnterminatedElement { text: String },

    #[error("array text ends inside an escape sequence")]
    DanglingEscape,

    #[error("{value} is out of range for {kind}")]
    OutOfRange { kind: ValueKind, value: String },
}

/// Error while writing a GraphML document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("argument {name} must not be empty")]
    Argument { name: &'static str },

    #[error("edge {edge:?} references a vertex that is not part of the graph")]
    UnknownEndpoint { edge: String },

    #[error("field {field:?} produced a {found} value but is declared as {expected}")]
    ValueKindMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("zstd compression failed: {0}")]
    CompressionFailed(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl EncodeError {
    /// Returns the category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EncodeError::Config(_) | EncodeError::ValueKindMismatch { .. } => {
                ErrorCode::Configuration
            }
            EncodeError::Argument { .. } => ErrorCode::Argument,
            EncodeError::UnknownEndpoint { .. } => ErrorCode::Structural,
            EncodeError::CompressionFailed(_) | EncodeError::Io(_) => ErrorCode::Io,
        }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> Self {
        EncodeError::Io(e.to_string())
    }
}

impl From<quick_xml::Error> for EncodeError {
    fn from(e: quick_xml::Error) -> Self {
        EncodeError::Io(e.to_string())
    }
}

/// Error while reading a GraphML document.
///
/// Structural variants carry the element and attribute involved so a caller
/// can localize the problem. Reading stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("argument {name} must not be empty")]
    Argument { name: &'static str },

    #[error("document has no graphml root element")]
    MissingGraphMl,

    #[error("no graph element found")]
    NoGraph,

    #[error("document contains {count} graph elements, expected exactly one")]
    MultipleGraphs { count: usize },

    #[error("<{element}> at byte {position} is missing required attribute {attribute:?}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        position: u64,
    },

    #[error("<{element}> attribute {attribute:?} has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("unexpected element <{name}> inside <{parent}> at byte {position}")]
    UnexpectedElement {
        name: String,
        parent: String,
        position: u64,
    },

    #[error("key id {id:?} is declared more than once")]
    DuplicateKey { id: String },

    #[error("<data> in <{element}> references undeclared key {key:?}")]
    UnknownKey { key: String, element: &'static str },

    #[error("key {key:?} is declared for {declared} but used in <{element}>")]
    KeyScopeMismatch {
        key: String,
        declared: &'static str,
        element: &'static str,
    },

    #[error("node id {id:?} is declared more than once")]
    DuplicateNode { id: String },

    #[error("edge {edge:?} references unknown node {node:?}")]
    UnresolvedVertex { edge: String, node: String },

    #[error("key {key:?} in <{element}>: {source}")]
    InvalidValue {
        key: String,
        element: &'static str,
        source: TextError,
    },

    #[error(transparent)]
    Schema(#[from] ValidationError),

    #[error("zstd decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl DecodeError {
    /// Returns the category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Config(_) => ErrorCode::Configuration,
            DecodeError::Argument { .. } => ErrorCode::Argument,
            DecodeError::Schema(_) => ErrorCode::Validation,
            DecodeError::DecompressionFailed(_) | DecodeError::Xml { .. } | DecodeError::Io(_) => {
                ErrorCode::Io
            }
            _ => ErrorCode::Structural,
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        DecodeError::Io(e.to_string())
    }
}

/// Error raised by strict schema validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("<{element}> at byte {position} requires attribute {attribute:?}")]
    RequiredAttribute {
        element: String,
        attribute: &'static str,
        position: u64,
    },

    #[error("<{element}> attribute {attribute:?} does not accept {value:?}")]
    InvalidEnumeration {
        element: String,
        attribute: &'static str,
        value: String,
    },

    #[error("<{child}> is not allowed inside <{parent}> (byte {position})")]
    ContentNotAllowed {
        parent: String,
        child: String,
        position: u64,
    },

    #[error("<{element}> attribute {attribute:?} is not a non-negative integer: {value:?}")]
    InvalidCount {
        element: String,
        attribute: &'static str,
        value: String,
    },
}
