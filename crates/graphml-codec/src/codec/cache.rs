//! Compiled per-type codecs, built once per (type, direction) and shared.
//!
//! The registry is process wide. Building happens outside the lock; when two
//! threads race on the same type, the first published codec wins and every
//! caller observes that one instance. Failed builds are not stored, so a
//! misconfigured type reports the same error on every attempt.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{ConfigError, EncodeError};
use crate::model::{FieldDescriptor, GraphMlType, TypeSchema, Value};

/// Which way a codec moves values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Element to document; every member needs a getter.
    Encode,
    /// Document to element; every member needs a setter.
    Decode,
}

type Registry = RwLock<FxHashMap<(TypeId, Direction), Arc<dyn Any + Send + Sync>>>;

lazy_static! {
    static ref CODECS: Registry = RwLock::new(FxHashMap::default());
}

/// Compiled accessors for one element type in one direction.
pub struct TypeCodec<T> {
    type_name: &'static str,
    direction: Direction,
    fields: Vec<FieldDescriptor<T>>,
    by_name: FxHashMap<String, usize>,
}

impl<T: GraphMlType> TypeCodec<T> {
    /// Extracts the schema of `T` and checks it supports `direction`.
    pub fn compile(direction: Direction) -> Result<Self, ConfigError> {
        let schema = TypeSchema::<T>::extract()?;
        let type_name = schema.type_name();
        let fields = schema.into_fields();

        for field in &fields {
            match direction {
                Direction::Encode if !field.is_readable() => {
                    return Err(ConfigError::MissingGetter {
                        type_name,
                        field: field.name().to_string(),
                    });
                }
                Direction::Decode if !field.is_writable() => {
                    return Err(ConfigError::MissingSetter {
                        type_name,
                        field: field.name().to_string(),
                    });
                }
                _ => {}
            }
        }

        let by_name = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();

        Ok(Self {
            type_name,
            direction,
            fields,
            by_name,
        })
    }
}

impl<T> TypeCodec<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Member descriptors in serialization order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Looks up a member by wire name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Hands every member value that must be written to `emit`.
    ///
    /// Members inside an absent tag and members equal to their declared
    /// default are skipped.
    pub fn encode(
        &self,
        element: &T,
        mut emit: impl FnMut(usize, Value) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        for (index, field) in self.fields.iter().enumerate() {
            let Some(value) = field.read(element) else {
                continue;
            };
            if value.kind() != field.kind() {
                return Err(EncodeError::ValueKindMismatch {
                    field: field.name().to_string(),
                    expected: field.kind(),
                    found: value.kind(),
                });
            }
            if field.default() == Some(&value) {
                continue;
            }
            emit(index, value)?;
        }
        Ok(())
    }

    /// Assigns declared defaults to every member outside the tag.
    ///
    /// Tag members are left alone so an element without tag data keeps its
    /// tag absent. A tag receives its own declared defaults when created.
    pub fn apply_defaults(&self, element: &mut T) {
        for field in &self.fields {
            if field.is_tagged() {
                continue;
            }
            if let Some(default) = field.default() {
                field.write(element, default.clone());
            }
        }
    }

    /// Returns false if member `index` lives in a tag the element lacks.
    pub fn is_reachable(&self, element: &T, index: usize) -> bool {
        self.fields
            .get(index)
            .is_some_and(|field| field.is_reachable(element))
    }

    /// Stores a decoded value into member `index`; false if it does not fit.
    pub fn decode_into(&self, element: &mut T, index: usize, value: Value) -> bool {
        self.fields
            .get(index)
            .is_some_and(|field| field.write(element, value))
    }
}

impl<T> fmt::Debug for TypeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCodec")
            .field("type_name", &self.type_name)
            .field("direction", &self.direction)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Returns the shared codec for `T`, compiling it on first use.
pub fn codec_for<T: GraphMlType>(direction: Direction) -> Result<Arc<TypeCodec<T>>, ConfigError> {
    let key = (TypeId::of::<T>(), direction);

    let cached = CODECS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(entry) = cached {
        return downcast::<T>(entry);
    }

    let codec = TypeCodec::<T>::compile(direction)?;
    debug!(
        type_name = codec.type_name,
        direction = ?direction,
        fields = codec.fields.len(),
        "compiled GraphML codec"
    );
    let built: Arc<dyn Any + Send + Sync> = Arc::new(codec);

    let entry = CODECS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert(built)
        .clone();
    downcast::<T>(entry)
}

fn downcast<T: GraphMlType>(entry: Arc<dyn Any + Send + Sync>) -> Result<Arc<TypeCodec<T>>, ConfigError> {
    entry
        .downcast::<TypeCodec<T>>()
        .map_err(|_| ConfigError::RegistryCorrupted {
            type_name: type_name::<T>(),
        })
}
