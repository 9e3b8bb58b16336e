//! Text encoding/decoding of member values.
//!
//! Every value travels as the text content of one `<data>` element. Numbers
//! are formatted without locale: `.` as decimal point, no grouping.
//!
//! Arrays use one rule for every element kind: each element is written
//! followed by `;`. Inside string elements `\` is written as `\\` and `;` as
//! `\;`. So `[]` is the empty text, `[""]` is `;`, and `[1, 2]` is `1;2;`.

use std::str::FromStr;

use crate::error::TextError;
use crate::format::{ARRAY_ESCAPE, ARRAY_TERMINATOR};
use crate::model::{ScalarKind, Value, ValueKind};

// =============================================================================
// ENCODING
// =============================================================================

/// Renders a value as GraphML text.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(v) => format_bool(*v).to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::Float32(v) => format_f32(*v),
        Value::Float64(v) => format_f64(*v),
        Value::String(v) => v.clone(),
        Value::BoolArray(v) => join(v.iter().map(|x| format_bool(*x).to_string())),
        Value::Int32Array(v) => join(v.iter().map(|x| x.to_string())),
        Value::Int64Array(v) => join(v.iter().map(|x| x.to_string())),
        Value::Float32Array(v) => join(v.iter().map(|x| format_f32(*x))),
        Value::Float64Array(v) => join(v.iter().map(|x| format_f64(*x))),
        Value::StringArray(v) => join(v.iter().map(|x| escape_element(x))),
    }
}

fn format_bool(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

fn format_f32(v: f32) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        // Debug gives the shortest text that parses back to the same bits.
        format!("{v:?}")
    }
}

fn format_f64(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        format!("{v:?}")
    }
}

fn join(elements: impl Iterator<Item = String>) -> String {
    let mut out = String::new();
    for element in elements {
        out.push_str(&element);
        out.push(ARRAY_TERMINATOR);
    }
    out
}

fn escape_element(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == ARRAY_ESCAPE || c == ARRAY_TERMINATOR {
            out.push(ARRAY_ESCAPE);
        }
        out.push(c);
    }
    out
}

// =============================================================================
// DECODING
// =============================================================================

/// Parses GraphML text as a value of the given kind.
pub fn parse_value(text: &str, kind: ValueKind) -> Result<Value, TextError> {
    match kind {
        ValueKind::Scalar(ScalarKind::Bool) => parse_bool(text).map(Value::Bool),
        ValueKind::Scalar(ScalarKind::Int32) => parse_number(text, kind).map(Value::Int32),
        ValueKind::Scalar(ScalarKind::Int64) => parse_number(text, kind).map(Value::Int64),
        ValueKind::Scalar(ScalarKind::Float32) => parse_f32(text).map(Value::Float32),
        ValueKind::Scalar(ScalarKind::Float64) => parse_f64(text).map(Value::Float64),
        ValueKind::Scalar(ScalarKind::String) => Ok(Value::String(text.to_string())),
        ValueKind::Array(element) => parse_array(text, element),
    }
}

fn parse_bool(text: &str) -> Result<bool, TextError> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(TextError::InvalidBool {
            text: text.to_string(),
        }),
    }
}

fn parse_number<N: FromStr>(text: &str, kind: ValueKind) -> Result<N, TextError> {
    text.trim().parse().map_err(|_| TextError::InvalidNumber {
        kind,
        text: text.to_string(),
    })
}

fn parse_f64(text: &str) -> Result<f64, TextError> {
    match text.trim() {
        "INF" | "+INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        _ => parse_number(text, ValueKind::FLOAT64),
    }
}

fn parse_f32(text: &str) -> Result<f32, TextError> {
    match text.trim() {
        "INF" | "+INF" => Ok(f32::INFINITY),
        "-INF" => Ok(f32::NEG_INFINITY),
        "NaN" => Ok(f32::NAN),
        _ => parse_number(text, ValueKind::FLOAT32),
    }
}

fn parse_array(text: &str, element: ScalarKind) -> Result<Value, TextError> {
    let items = split_elements(text, element == ScalarKind::String)?;
    let value = match element {
        ScalarKind::Bool => Value::BoolArray(
            items.iter().map(|s| parse_bool(s)).collect::<Result<_, _>>()?,
        ),
        ScalarKind::Int32 => Value::Int32Array(
            items
                .iter()
                .map(|s| parse_number(s, ValueKind::INT32))
                .collect::<Result<_, _>>()?,
        ),
        ScalarKind::Int64 => Value::Int64Array(
            items
                .iter()
                .map(|s| parse_number(s, ValueKind::INT64))
                .collect::<Result<_, _>>()?,
        ),
        ScalarKind::Float32 => Value::Float32Array(
            items.iter().map(|s| parse_f32(s)).collect::<Result<_, _>>()?,
        ),
        ScalarKind::Float64 => Value::Float64Array(
            items.iter().map(|s| parse_f64(s)).collect::<Result<_, _>>()?,
        ),
        ScalarKind::String => Value::StringArray(items),
    };
    Ok(value)
}

/// Splits `;`-terminated elements, honoring escapes when `escaped` is set.
///
/// Whitespace-only text outside string arrays counts as the empty array, so
/// pretty-printed documents still read back.
fn split_elements(text: &str, escaped: bool) -> Result<Vec<String>, TextError> {
    let body = if escaped { text } else { text.trim() };
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if escaped && c == ARRAY_ESCAPE {
            match chars.next() {
                Some(next) => current.push(next),
                None => return Err(TextError::DanglingEscape),
            }
        } else if c == ARRAY_TERMINATOR {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        return Err(TextError::UnterminatedElement { text: current });
    }
    Ok(items)
}
