//! Field descriptors for vertex, edge and graph types.
//!
//! An element type lists its serializable members once, in
//! [`GraphMlType::describe`]. [`TypeSchema::extract`] turns that list into an
//! ordered set of [`FieldDescriptor`]s:
//!
//! - the type's own members, in declaration order
//! - members of composed base types, unless the derived type already declared
//!   the same wire name
//! - members of the tag object, with the tag prefix applied to their names
//!
//! # Example
//!
//! ```rust
//! use graphml_codec::model::{GraphMlType, SchemaBuilder, TypeSchema};
//!
//! #[derive(Default)]
//! struct City {
//!     name: String,
//!     population: i64,
//! }
//!
//! impl GraphMlType for City {
//!     fn describe(schema: &mut SchemaBuilder<Self>) {
//!         schema.field("name", |c| &c.name, |c, v| c.name = v);
//!         schema
//!             .field("population", |c| &c.population, |c, v| c.population = v)
//!             .default_value(0i64);
//!     }
//! }
//!
//! let schema = TypeSchema::<City>::extract().unwrap();
//! assert_eq!(schema.fields().len(), 2);
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::codec::text::parse_value;
use crate::error::ConfigError;
use crate::format::DEFAULT_TAG_PREFIX;
use crate::model::{AttributeValue, Value, ValueKind};

pub(crate) type ReadFn<T> = Arc<dyn Fn(&T) -> Option<Value> + Send + Sync>;
pub(crate) type WriteFn<T> = Arc<dyn Fn(&mut T, Value) -> bool + Send + Sync>;
type PresentFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Declared defaults a freshly created tag object starts from.
type TagDefaults<T> = Vec<(WriteFn<T>, Value)>;

/// A type whose members can be written to and read from GraphML.
pub trait GraphMlType: Sized + 'static {
    /// Registers the serializable members of `Self`.
    fn describe(schema: &mut SchemaBuilder<Self>);
}

macro_rules! graphml_type_without_members {
    ($($ty:ty),*) => {
        $(
            impl GraphMlType for $ty {
                fn describe(_schema: &mut SchemaBuilder<Self>) {}
            }
        )*
    };
}

graphml_type_without_members!(i32, i64, u32, u64, usize, String);

/// One step on the way from an element to a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStep {
    /// The member itself.
    Member,
    /// A composed base object, always present.
    Base(&'static str),
    /// The tag object, which may be absent.
    Tag(&'static str),
}

/// Compiled description of one serializable member of `T`.
pub struct FieldDescriptor<T> {
    name: String,
    kind: ValueKind,
    default: Option<Value>,
    path: Vec<AccessStep>,
    read: Option<ReadFn<T>>,
    write: Option<WriteFn<T>>,
    tag_present: Option<PresentFn<T>>,
}

impl<T> FieldDescriptor<T> {
    /// Wire name (`attr.name`), prefix included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind the member is serialized as.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Declared default; values equal to it are not written.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Accessors leading from the element to the member.
    pub fn access_path(&self) -> &[AccessStep] {
        &self.path
    }

    /// Returns true if the member lives inside the tag object.
    pub fn is_tagged(&self) -> bool {
        self.path.iter().any(|step| matches!(step, AccessStep::Tag(_)))
    }

    /// Returns true if the member has a getter.
    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    /// Returns true if the member has a setter.
    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    /// Fetches the member value; `None` when an intermediate tag is absent.
    pub(crate) fn read(&self, element: &T) -> Option<Value> {
        self.read.as_ref().and_then(|read| read(element))
    }

    /// Returns false if the member sits in a tag object that is absent.
    pub(crate) fn is_reachable(&self, element: &T) -> bool {
        self.tag_present.as_ref().is_none_or(|present| present(element))
    }

    /// Stores a value; returns false if it does not fit the member.
    pub(crate) fn write(&self, element: &mut T, value: Value) -> bool {
        match &self.write {
            Some(write) => write(element, value),
            None => false,
        }
    }

    fn via_base<U: 'static>(
        self,
        base: &'static str,
        get: fn(&U) -> &T,
        get_mut: fn(&mut U) -> &mut T,
    ) -> FieldDescriptor<U>
    where
        T: 'static,
    {
        let read = self.read.map(|inner| -> ReadFn<U> { Arc::new(move |u: &U| inner(get(u))) });
        let write = self
            .write
            .map(|inner| -> WriteFn<U> { Arc::new(move |u: &mut U, v: Value| inner(get_mut(u), v)) });
        let tag_present = self
            .tag_present
            .map(|inner| -> PresentFn<U> { Arc::new(move |u: &U| inner(get(u))) });
        let mut path = vec![AccessStep::Base(base)];
        path.extend(self.path);
        FieldDescriptor {
            name: self.name,
            kind: self.kind,
            default: self.default,
            path,
            read,
            write,
            tag_present,
        }
    }

    fn via_tag<U: 'static>(
        self,
        prefix: &str,
        get: fn(&U) -> Option<&T>,
        get_mut: fn(&mut U) -> &mut Option<T>,
        defaults: Arc<TagDefaults<T>>,
    ) -> FieldDescriptor<U>
    where
        T: Default + 'static,
    {
        let read = self
            .read
            .map(|inner| -> ReadFn<U> { Arc::new(move |u: &U| get(u).and_then(|tag| inner(tag))) });
        let write = self.write.map(|inner| -> WriteFn<U> {
            Arc::new(move |u: &mut U, v: Value| {
                let tag = get_mut(u).get_or_insert_with(|| {
                    let mut tag = T::default();
                    for (write, default) in defaults.iter() {
                        write(&mut tag, default.clone());
                    }
                    tag
                });
                inner(tag, v)
            })
        });
        let mut path = vec![AccessStep::Tag(type_name::<T>())];
        path.extend(self.path);
        FieldDescriptor {
            name: format!("{prefix}{}", self.name),
            kind: self.kind,
            default: self.default,
            path,
            read,
            write,
            tag_present: Some(Arc::new(move |u: &U| get(u).is_some())),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("path", &self.path)
            .field("readable", &self.read.is_some())
            .field("writable", &self.write.is_some())
            .finish()
    }
}

enum DefaultSpec {
    Value(Value),
    Text(String),
}

/// A member as registered, before validation.
struct FieldDecl<T> {
    name: String,
    native: ValueKind,
    declared: Option<ValueKind>,
    default: Option<DefaultSpec>,
    read: Option<ReadFn<T>>,
    write: Option<WriteFn<T>>,
}

impl<T: 'static> FieldDecl<T> {
    fn resolve(self, type_name: &'static str) -> Result<FieldDescriptor<T>, ConfigError> {
        let native = self.native;
        let kind = match self.declared {
            Some(declared) if !native.widens_to(declared) => {
                return Err(ConfigError::UnsupportedKind {
                    type_name,
                    field: self.name,
                    actual: native,
                    declared,
                });
            }
            Some(declared) => declared,
            None => native,
        };

        let default = match self.default {
            None => None,
            Some(DefaultSpec::Value(value)) => {
                if value.kind() != kind {
                    return Err(ConfigError::DefaultKindMismatch {
                        type_name,
                        field: self.name,
                        expected: kind,
                        found: value.kind(),
                    });
                }
                Some(value)
            }
            Some(DefaultSpec::Text(text)) => match parse_value(&text, kind) {
                Ok(value) => Some(value),
                Err(_) => {
                    return Err(ConfigError::InvalidDefault {
                        type_name,
                        field: self.name,
                        expected: kind,
                        text,
                    });
                }
            },
        };

        let (read, write) = if kind == native {
            (self.read, self.write)
        } else {
            (
                self.read.map(|inner| -> ReadFn<T> {
                    Arc::new(move |t: &T| inner(t).and_then(|v| v.widen(kind)))
                }),
                self.write.map(|inner| -> WriteFn<T> {
                    Arc::new(move |t: &mut T, v: Value| {
                        v.narrow(native).is_some_and(|narrowed| inner(t, narrowed))
                    })
                }),
            )
        };

        Ok(FieldDescriptor {
            name: self.name,
            kind,
            default,
            path: vec![AccessStep::Member],
            read,
            write,
            tag_present: None,
        })
    }
}

/// Collects the member registrations of one type.
///
/// Errors are recorded and reported by [`TypeSchema::extract`], so a
/// `describe` implementation never has to handle them.
pub struct SchemaBuilder<T> {
    own: Vec<FieldDecl<T>>,
    inherited: Vec<FieldDescriptor<T>>,
    tagged: Vec<FieldDescriptor<T>>,
    errors: Vec<ConfigError>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn new() -> Self {
        Self {
            own: Vec::new(),
            inherited: Vec::new(),
            tagged: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Registers a member that is both written and read.
    pub fn field<F: AttributeValue>(
        &mut self,
        name: &str,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> FieldBuilder<'_, T> {
        self.push(name, F::KIND, Some(typed_read(get)), Some(typed_write(set)))
    }

    /// Registers a member that can only be written to GraphML.
    pub fn read_only<F: AttributeValue>(&mut self, name: &str, get: fn(&T) -> &F) -> FieldBuilder<'_, T> {
        self.push(name, F::KIND, Some(typed_read(get)), None)
    }

    /// Registers a member that can only be read from GraphML.
    pub fn write_only<F: AttributeValue>(&mut self, name: &str, set: fn(&mut T, F)) -> FieldBuilder<'_, T> {
        self.push(name, F::KIND, None, Some(typed_write(set)))
    }

    /// Composes the members of an embedded base object.
    pub fn base<B: GraphMlType>(&mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> &mut Self {
        match TypeSchema::<B>::extract() {
            Ok(schema) => {
                let base = type_name::<B>();
                self.inherited
                    .extend(schema.fields.into_iter().map(|f| f.via_base(base, get, get_mut)));
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Delegates to a tag object using the default `TAG-` prefix.
    pub fn tag<G: GraphMlType + Default>(
        &mut self,
        get: fn(&T) -> Option<&G>,
        get_mut: fn(&mut T) -> &mut Option<G>,
    ) -> &mut Self {
        self.tag_with_prefix(DEFAULT_TAG_PREFIX, get, get_mut)
    }

    /// Delegates to a tag object, prefixing its wire names with `prefix`.
    ///
    /// The tag is fetched and checked for presence before any of its members
    /// are read. The first time one is set, the tag is default-constructed and
    /// its declared member defaults are applied.
    pub fn tag_with_prefix<G: GraphMlType + Default>(
        &mut self,
        prefix: &str,
        get: fn(&T) -> Option<&G>,
        get_mut: fn(&mut T) -> &mut Option<G>,
    ) -> &mut Self {
        if prefix.is_empty() {
            self.errors.push(ConfigError::EmptyTagPrefix {
                type_name: type_name::<T>(),
            });
            return self;
        }
        match TypeSchema::<G>::extract() {
            Ok(schema) if schema.fields.iter().any(|f| f.is_tagged()) => {
                self.errors.push(ConfigError::NestedTag {
                    type_name: type_name::<T>(),
                    tag_type: type_name::<G>(),
                });
            }
            Ok(schema) => {
                let defaults: Arc<TagDefaults<G>> = Arc::new(
                    schema
                        .fields
                        .iter()
                        .filter_map(|f| Some((f.write.clone()?, f.default.clone()?)))
                        .collect(),
                );
                self.tagged.extend(
                    schema
                        .fields
                        .into_iter()
                        .map(|f| f.via_tag(prefix, get, get_mut, Arc::clone(&defaults))),
                );
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    fn push(
        &mut self,
        name: &str,
        native: ValueKind,
        read: Option<ReadFn<T>>,
        write: Option<WriteFn<T>>,
    ) -> FieldBuilder<'_, T> {
        self.own.push(FieldDecl {
            name: name.to_string(),
            native,
            declared: None,
            default: None,
            read,
            write,
        });
        let index = self.own.len() - 1;
        FieldBuilder {
            decl: &mut self.own[index],
        }
    }

    fn finish(self) -> Result<Vec<FieldDescriptor<T>>, ConfigError> {
        let SchemaBuilder {
            own,
            inherited,
            tagged,
            errors,
        } = self;
        if let Some(error) = errors.into_iter().next() {
            return Err(error);
        }

        let type_name = type_name::<T>();
        let mut seen = FxHashSet::default();
        let mut fields = Vec::with_capacity(own.len() + inherited.len() + tagged.len());

        for decl in own {
            if decl.name.is_empty() {
                return Err(ConfigError::EmptyFieldName { type_name });
            }
            if !seen.insert(decl.name.clone()) {
                return Err(ConfigError::DuplicateField {
                    type_name,
                    name: decl.name,
                });
            }
            fields.push(decl.resolve(type_name)?);
        }

        // A base member is hidden by a derived member of the same name.
        for field in inherited {
            if seen.insert(field.name.clone()) {
                fields.push(field);
            }
        }

        for field in tagged {
            if !seen.insert(field.name.clone()) {
                return Err(ConfigError::DuplicateField {
                    type_name,
                    name: field.name,
                });
            }
            fields.push(field);
        }

        Ok(fields)
    }
}

/// Refines the member just registered.
pub struct FieldBuilder<'a, T> {
    decl: &'a mut FieldDecl<T>,
}

impl<T> FieldBuilder<'_, T> {
    /// Declares a default value. Must have exactly the member's kind.
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.decl.default = Some(DefaultSpec::Value(value.into()));
        self
    }

    /// Declares a default in its wire text form.
    pub fn default_text(self, text: &str) -> Self {
        self.decl.default = Some(DefaultSpec::Text(text.to_string()));
        self
    }

    /// Serializes the member as `kind` instead of its native kind.
    pub fn kind(self, kind: ValueKind) -> Self {
        self.decl.declared = Some(kind);
        self
    }
}

fn typed_read<T: 'static, F: AttributeValue>(get: fn(&T) -> &F) -> ReadFn<T> {
    Arc::new(move |t: &T| Some(get(t).to_value()))
}

fn typed_write<T: 'static, F: AttributeValue>(set: fn(&mut T, F)) -> WriteFn<T> {
    Arc::new(move |t: &mut T, v: Value| match F::from_value(v) {
        Some(value) => {
            set(t, value);
            true
        }
        None => false,
    })
}

/// The ordered field descriptors of one element type.
pub struct TypeSchema<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: GraphMlType> TypeSchema<T> {
    /// Runs `T::describe` and validates the result.
    pub fn extract() -> Result<Self, ConfigError> {
        let mut builder = SchemaBuilder::new();
        T::describe(&mut builder);
        Ok(Self {
            type_name: type_name::<T>(),
            fields: builder.finish()?,
        })
    }
}

impl<T> TypeSchema<T> {
    /// Name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Descriptors in serialization order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub(crate) fn into_fields(self) -> Vec<FieldDescriptor<T>> {
        self.fields
    }
}

impl<T> fmt::Debug for TypeSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScalarKind;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Shape {
        label: String,
        weight: f64,
    }

    impl GraphMlType for Shape {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("label", |s| &s.label, |s, v| s.label = v);
            schema.field("weight", |s| &s.weight, |s, v| s.weight = v);
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Circle {
        base: Shape,
        label: String,
        radius: f32,
        tag: Option<Extra>,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Extra {
        note: String,
    }

    impl GraphMlType for Extra {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("note", |e| &e.note, |e, v| e.note = v);
        }
    }

    impl GraphMlType for Circle {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("radius", |c| &c.radius, |c, v| c.radius = v).default_value(1.0f32);
            schema.field("label", |c| &c.label, |c, v| c.label = v);
            schema.base(|c| &c.base, |c| &mut c.base);
            schema.tag(|c| c.tag.as_ref(), |c| &mut c.tag);
        }
    }

    fn names<T>(schema: &TypeSchema<T>) -> Vec<&str> {
        schema.fields().iter().map(|f| f.name()).collect()
    }

    #[test]
    fn test_declaration_order_base_and_tag() {
        let schema = TypeSchema::<Circle>::extract().unwrap();
        // Derived `label` hides the base one; tag members come last.
        assert_eq!(names(&schema), ["radius", "label", "weight", "TAG-note"]);
        assert_eq!(schema.fields()[2].access_path()[0], AccessStep::Base(type_name::<Shape>()));
        assert!(schema.fields()[3].is_tagged());
        assert!(!schema.fields()[1].is_tagged());
        assert_eq!(schema.fields()[0].default(), Some(&Value::Float32(1.0)));
    }

    #[test]
    fn test_read_write_through_paths() {
        let schema = TypeSchema::<Circle>::extract().unwrap();
        let mut circle = Circle::default();
        let weight = &schema.fields()[2];
        let note = &schema.fields()[3];

        assert_eq!(note.read(&circle), None);
        assert!(note.write(&mut circle, Value::String("hi".into())));
        assert_eq!(circle.tag, Some(Extra { note: "hi".into() }));
        assert_eq!(note.read(&circle), Some(Value::String("hi".into())));

        assert!(weight.write(&mut circle, Value::Float64(2.5)));
        assert_eq!(circle.base.weight, 2.5);
        assert!(!weight.write(&mut circle, Value::Int32(3)));
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Marker {
        level: i32,
        text: String,
    }

    impl GraphMlType for Marker {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("level", |m| &m.level, |m, v| m.level = v).default_value(5i32);
            schema.field("text", |m| &m.text, |m, v| m.text = v);
        }
    }

    #[derive(Debug, Default)]
    struct Pin {
        marker: Option<Marker>,
    }

    impl GraphMlType for Pin {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.tag(|p| p.marker.as_ref(), |p| &mut p.marker);
        }
    }

    #[test]
    fn test_new_tag_starts_from_declared_defaults() {
        let schema = TypeSchema::<Pin>::extract().unwrap();
        assert_eq!(names(&schema), ["TAG-level", "TAG-text"]);

        let mut pin = Pin::default();
        assert!(schema.fields()[1].write(&mut pin, Value::String("x".into())));
        assert_eq!(
            pin.marker,
            Some(Marker {
                level: 5,
                text: "x".into()
            })
        );

        let empty = Pin::default();
        assert!(!schema.fields()[0].is_reachable(&empty));
        assert!(schema.fields()[0].is_reachable(&pin));

        // An existing tag is not reset.
        assert!(schema.fields()[0].write(&mut pin, Value::Int32(7)));
        assert!(schema.fields()[1].write(&mut pin, Value::String("y".into())));
        assert_eq!(pin.marker.as_ref().map(|m| m.level), Some(7));
    }

    #[derive(Default)]
    struct Bad {
        count: i32,
        items: Vec<i32>,
    }

    #[test]
    fn test_default_kind_mismatch() {
        struct T1(Bad);
        impl GraphMlType for T1 {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.field("count", |t| &t.0.count, |t, v| t.0.count = v).default_value(1i64);
            }
        }
        assert!(matches!(
            TypeSchema::<T1>::extract(),
            Err(ConfigError::DefaultKindMismatch { expected: ValueKind::INT32, found: ValueKind::INT64, .. })
        ));
    }

    #[test]
    fn test_scalar_default_on_array_member() {
        struct T2(Bad);
        impl GraphMlType for T2 {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.field("items", |t| &t.0.items, |t, v| t.0.items = v).default_value(1i32);
            }
        }
        assert!(matches!(
            TypeSchema::<T2>::extract(),
            Err(ConfigError::DefaultKindMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_text_default() {
        struct T3(Bad);
        impl GraphMlType for T3 {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.field("count", |t| &t.0.count, |t, v| t.0.count = v).default_text("ten");
            }
        }
        assert!(matches!(
            TypeSchema::<T3>::extract(),
            Err(ConfigError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn test_text_default_parsed() {
        struct T4(Bad);
        impl GraphMlType for T4 {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.field("items", |t| &t.0.items, |t, v| t.0.items = v).default_text("1;2;");
            }
        }
        let schema = TypeSchema::<T4>::extract().unwrap();
        assert_eq!(schema.fields()[0].default(), Some(&Value::Int32Array(vec![1, 2])));
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        struct Dup(Bad);
        impl GraphMlType for Dup {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.field("x", |t| &t.0.count, |t, v| t.0.count = v);
                schema.read_only("x", |t| &t.0.items);
            }
        }
        assert!(matches!(
            TypeSchema::<Dup>::extract(),
            Err(ConfigError::DuplicateField { .. })
        ));

        struct Empty(Bad);
        impl GraphMlType for Empty {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.field("", |t| &t.0.count, |t, v| t.0.count = v);
            }
        }
        assert!(matches!(
            TypeSchema::<Empty>::extract(),
            Err(ConfigError::EmptyFieldName { .. })
        ));
    }

    #[test]
    fn test_tag_prefix_rules() {
        #[derive(Default)]
        struct Prefixed {
            tag: Option<Extra>,
        }
        impl GraphMlType for Prefixed {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.tag_with_prefix("", |p| p.tag.as_ref(), |p| &mut p.tag);
            }
        }
        assert!(matches!(
            TypeSchema::<Prefixed>::extract(),
            Err(ConfigError::EmptyTagPrefix { .. })
        ));

        #[derive(Default)]
        struct Nested {
            tag: Option<Circle>,
        }
        impl GraphMlType for Nested {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema.tag(|n| n.tag.as_ref(), |n| &mut n.tag);
            }
        }
        assert!(matches!(
            TypeSchema::<Nested>::extract(),
            Err(ConfigError::NestedTag { .. })
        ));
    }

    #[test]
    fn test_kind_override() {
        struct Wide(Bad);
        impl GraphMlType for Wide {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema
                    .field("count", |t| &t.0.count, |t, v| t.0.count = v)
                    .kind(ValueKind::INT64)
                    .default_value(5i64);
            }
        }
        let schema = TypeSchema::<Wide>::extract().unwrap();
        let field = &schema.fields()[0];
        assert_eq!(field.kind(), ValueKind::INT64);
        let mut wide = Wide(Bad { count: 7, items: vec![] });
        assert_eq!(field.read(&wide), Some(Value::Int64(7)));
        assert!(field.write(&mut wide, Value::Int64(-3)));
        assert_eq!(wide.0.count, -3);
        assert!(!field.write(&mut wide, Value::Int64(i64::MAX)));

        struct Narrow(Bad);
        impl GraphMlType for Narrow {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                schema
                    .field("items", |t| &t.0.items, |t, v| t.0.items = v)
                    .kind(ValueKind::Scalar(ScalarKind::String));
            }
        }
        assert!(matches!(
            TypeSchema::<Narrow>::extract(),
            Err(ConfigError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_primitives_have_no_members() {
        assert!(TypeSchema::<i32>::extract().unwrap().fields().is_empty());
        assert!(TypeSchema::<String>::extract().unwrap().fields().is_empty());
    }
}
