//! Value kinds and typed attribute values.
//!
//! Values are what a member of a vertex, edge or graph type holds once it is
//! lifted out of the element. Only the kinds below have a GraphML rendering.

use std::fmt;

/// Scalar kinds with a GraphML `attr.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl ScalarKind {
    /// Returns the GraphML `attr.type` name.
    pub fn wire_type(self) -> &'static str {
        match self {
            ScalarKind::Bool => "boolean",
            ScalarKind::Int32 => "int",
            ScalarKind::Int64 => "long",
            ScalarKind::Float32 => "float",
            ScalarKind::Float64 => "double",
            ScalarKind::String => "string",
        }
    }

    /// Parses a GraphML `attr.type` name.
    pub fn from_wire_type(name: &str) -> Option<ScalarKind> {
        match name {
            "boolean" => Some(ScalarKind::Bool),
            "int" => Some(ScalarKind::Int32),
            "long" => Some(ScalarKind::Int64),
            "float" => Some(ScalarKind::Float32),
            "double" => Some(ScalarKind::Float64),
            "string" => Some(ScalarKind::String),
            _ => None,
        }
    }
}

/// Kind of a serializable member: a scalar or a one-dimensional sequence of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl ValueKind {
    pub const BOOL: ValueKind = ValueKind::Scalar(ScalarKind::Bool);
    pub const INT32: ValueKind = ValueKind::Scalar(ScalarKind::Int32);
    pub const INT64: ValueKind = ValueKind::Scalar(ScalarKind::Int64);
    pub const FLOAT32: ValueKind = ValueKind::Scalar(ScalarKind::Float32);
    pub const FLOAT64: ValueKind = ValueKind::Scalar(ScalarKind::Float64);
    pub const STRING: ValueKind = ValueKind::Scalar(ScalarKind::String);

    /// Returns the GraphML `attr.type` used when declaring a key of this kind.
    ///
    /// GraphML has no list type, so arrays travel as a single string token.
    pub fn wire_type(self) -> &'static str {
        match self {
            ValueKind::Scalar(scalar) => scalar.wire_type(),
            ValueKind::Array(_) => "string",
        }
    }

    /// Returns the element kind of an array, or the kind itself for a scalar.
    pub fn scalar(self) -> ScalarKind {
        match self {
            ValueKind::Scalar(scalar) | ValueKind::Array(scalar) => scalar,
        }
    }

    /// Returns true if values of kind `self` can be stored as `declared`.
    ///
    /// Identity, `Int32 -> Int64` and `Float32 -> Float64` are accepted, for
    /// scalars and arrays alike.
    pub fn widens_to(self, declared: ValueKind) -> bool {
        if self == declared {
            return true;
        }
        let widened = |from: ScalarKind, to: ScalarKind| {
            matches!(
                (from, to),
                (ScalarKind::Int32, ScalarKind::Int64) | (ScalarKind::Float32, ScalarKind::Float64)
            )
        };
        match (self, declared) {
            (ValueKind::Scalar(from), ValueKind::Scalar(to))
            | (ValueKind::Array(from), ValueKind::Array(to)) => widened(from, to),
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(scalar) => f.write_str(scalar.wire_type()),
            ValueKind::Array(scalar) => write!(f, "{}[]", scalar.wire_type()),
        }
    }
}

/// A typed member value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    BoolArray(Vec<bool>),
    Int32Array(Vec<i32>),
    Int64Array(Vec<i64>),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
    StringArray(Vec<String>),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::BOOL,
            Value::Int32(_) => ValueKind::INT32,
            Value::Int64(_) => ValueKind::INT64,
            Value::Float32(_) => ValueKind::FLOAT32,
            Value::Float64(_) => ValueKind::FLOAT64,
            Value::String(_) => ValueKind::STRING,
            Value::BoolArray(_) => ValueKind::Array(ScalarKind::Bool),
            Value::Int32Array(_) => ValueKind::Array(ScalarKind::Int32),
            Value::Int64Array(_) => ValueKind::Array(ScalarKind::Int64),
            Value::Float32Array(_) => ValueKind::Array(ScalarKind::Float32),
            Value::Float64Array(_) => ValueKind::Array(ScalarKind::Float64),
            Value::StringArray(_) => ValueKind::Array(ScalarKind::String),
        }
    }

    /// Widens this value to `kind` (see [`ValueKind::widens_to`]).
    pub fn widen(self, kind: ValueKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self);
        }
        match (self, kind) {
            (Value::Int32(v), ValueKind::Scalar(ScalarKind::Int64)) => Some(Value::Int64(v as i64)),
            (Value::Float32(v), ValueKind::Scalar(ScalarKind::Float64)) => {
                Some(Value::Float64(v as f64))
            }
            (Value::Int32Array(v), ValueKind::Array(ScalarKind::Int64)) => {
                Some(Value::Int64Array(v.into_iter().map(i64::from).collect()))
            }
            (Value::Float32Array(v), ValueKind::Array(ScalarKind::Float64)) => {
                Some(Value::Float64Array(v.into_iter().map(f64::from).collect()))
            }
            _ => None,
        }
    }

    /// Narrows a widened value back to `kind`.
    ///
    /// Integers out of range yield `None`; floats are rounded to the nearest
    /// representable `f32`.
    pub fn narrow(self, kind: ValueKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self);
        }
        match (self, kind) {
            (Value::Int64(v), ValueKind::Scalar(ScalarKind::Int32)) => {
                i32::try_from(v).ok().map(Value::Int32)
            }
            (Value::Float64(v), ValueKind::Scalar(ScalarKind::Float32)) => {
                Some(Value::Float32(v as f32))
            }
            (Value::Int64Array(v), ValueKind::Array(ScalarKind::Int32)) => v
                .into_iter()
                .map(|x| i32::try_from(x).ok())
                .collect::<Option<Vec<_>>>()
                .map(Value::Int32Array),
            (Value::Float64Array(v), ValueKind::Array(ScalarKind::Float32)) => {
                Some(Value::Float32Array(v.into_iter().map(|x| x as f32).collect()))
            }
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A Rust type that can back a serializable member.
///
/// Implemented for exactly the supported kinds, so an unsupported member
/// type is rejected when the element type is described, not at run time.
pub trait AttributeValue: Clone + PartialEq + Send + Sync + 'static {
    /// Kind of values of this type.
    const KIND: ValueKind;

    /// Lifts the member into a [`Value`].
    fn to_value(&self) -> Value;

    /// Lowers a [`Value`] of kind [`Self::KIND`] back into the member type.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! attribute_value {
    ($ty:ty, $kind:expr, $scalar:ident, $array:ident) => {
        impl AttributeValue for $ty {
            const KIND: ValueKind = ValueKind::Scalar($kind);

            fn to_value(&self) -> Value {
                Value::$scalar(self.clone())
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$scalar(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl AttributeValue for Vec<$ty> {
            const KIND: ValueKind = ValueKind::Array($kind);

            fn to_value(&self) -> Value {
                Value::$array(self.clone())
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$array(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$scalar(v)
            }
        }

        impl From<Vec<$ty>> for Value {
            fn from(v: Vec<$ty>) -> Self {
                Value::$array(v)
            }
        }
    };
}

attribute_value!(bool, ScalarKind::Bool, Bool, BoolArray);
attribute_value!(i32, ScalarKind::Int32, Int32, Int32Array);
attribute_value!(i64, ScalarKind::Int64, Int64, Int64Array);
attribute_value!(f32, ScalarKind::Float32, Float32, Float32Array);
attribute_value!(f64, ScalarKind::Float64, Float64, Float64Array);
attribute_value!(String, ScalarKind::String, String, StringArray);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_roundtrip() {
        for kind in [
            ScalarKind::Bool,
            ScalarKind::Int32,
            ScalarKind::Int64,
            ScalarKind::Float32,
            ScalarKind::Float64,
            ScalarKind::String,
        ] {
            assert_eq!(ScalarKind::from_wire_type(kind.wire_type()), Some(kind));
        }
        assert_eq!(ScalarKind::from_wire_type("char"), None);
    }

    #[test]
    fn test_array_keys_are_strings() {
        assert_eq!(ValueKind::Array(ScalarKind::Int32).wire_type(), "string");
        assert_eq!(ValueKind::Array(ScalarKind::Int32).to_string(), "int[]");
    }

    #[test]
    fn test_widening_rules() {
        assert!(ValueKind::INT32.widens_to(ValueKind::INT64));
        assert!(ValueKind::FLOAT32.widens_to(ValueKind::FLOAT64));
        assert!(ValueKind::Array(ScalarKind::Int32).widens_to(ValueKind::Array(ScalarKind::Int64)));
        assert!(!ValueKind::INT64.widens_to(ValueKind::INT32));
        assert!(!ValueKind::STRING.widens_to(ValueKind::INT32));
        assert!(!ValueKind::INT32.widens_to(ValueKind::Array(ScalarKind::Int32)));
    }

    #[test]
    fn test_widen_then_narrow() {
        let wide = Value::Int32(-7).widen(ValueKind::INT64).unwrap();
        assert_eq!(wide, Value::Int64(-7));
        assert_eq!(wide.narrow(ValueKind::INT32), Some(Value::Int32(-7)));
        assert_eq!(Value::Int64(i64::MAX).narrow(ValueKind::INT32), None);
    }

    #[test]
    fn test_attribute_value_lift_lower() {
        let v = vec![1.5f64, -2.0];
        assert_eq!(Vec::<f64>::from_value(v.to_value()), Some(v));
        assert_eq!(String::from_value(Value::Int32(1)), None);
        assert_eq!(<Vec<String> as AttributeValue>::KIND, ValueKind::Array(ScalarKind::String));
    }
}
