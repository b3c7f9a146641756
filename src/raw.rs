use std::borrow::Cow;

use serde_json::{Map, Value};

/// Shape of an untrusted checklist value as it arrives from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawChecklistValue<'a> {
    String(&'a str),
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    /// Numbers and booleans.
    Scalar(&'a Value),
    Null,
}

impl<'a> RawChecklistValue<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => RawChecklistValue::Null,
            Value::String(text) => RawChecklistValue::String(text),
            Value::Array(items) => RawChecklistValue::Sequence(items),
            Value::Object(map) => RawChecklistValue::Mapping(map),
            Value::Number(_) | Value::Bool(_) => RawChecklistValue::Scalar(value),
        }
    }
}

/// Unwraps one level of JSON-in-a-string encoding.
///
/// Only text that decodes to an object, an array or a string is unwrapped.
/// Text that is not JSON, or decodes to a bare number, boolean or null, is
/// returned untouched so legacy labels such as `"12"` survive as text.
pub fn unwrap_encoded(value: &Value) -> Cow<'_, Value> {
    let Value::String(text) = value else {
        return Cow::Borrowed(value);
    };
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(parsed @ (Value::Object(_) | Value::Array(_) | Value::String(_))) => Cow::Owned(parsed),
        _ => Cow::Borrowed(value),
    }
}
