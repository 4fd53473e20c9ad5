//! Raw input adapter.
//!
//! Callers hand over native JSON values, typed structs, or JSON text embedded in a
//! string field. Everything is funnelled through [`RawInput`] before the filter tree
//! or order specs are built, so no other module inspects input shapes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{FilterPath, NormalizeError, NormalizeResult};

/// Classified form of an untyped input field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawInput {
    /// Not supplied, or `null`.
    #[default]
    Absent,
    /// Associative input. Key order is the order the transport produced.
    Map(Map<String, Value>),
    /// Indexable input.
    List(Vec<Value>),
    /// A bool, number, or string that did not decode to a structure.
    Scalar(Value),
}

impl RawInput {
    /// Classify a JSON value.
    ///
    /// A string whose trimmed text starts with `{` or `[` is treated as a serialized
    /// object and decoded; if it does not decode, the input is malformed.
    pub fn from_value(value: Value) -> NormalizeResult<Self> {
        Self::from_value_at(value, &FilterPath::root())
    }

    /// [`RawInput::from_value`] for a named field, so decode failures carry its path.
    pub fn from_value_at(value: Value, path: &FilterPath) -> NormalizeResult<Self> {
        match value {
            Value::String(text) if looks_serialized(&text) => {
                let decoded: Value = serde_json::from_str(&text)
                    .map_err(|err| NormalizeError::malformed(path, format!("embedded JSON does not parse: {err}")))?;
                Ok(Self::from(decoded))
            }
            other => Ok(Self::from(other)),
        }
    }

    /// Convert an object-like input (any serializable value) to the plain map/list form.
    pub fn from_serialize<T: Serialize + ?Sized>(input: &T) -> NormalizeResult<Self> {
        Self::from_value(serde_json::to_value(input)?)
    }

    /// `true` for absent input, empty collections, and falsy scalars
    /// (`false`, `0`, `0.0`, `""`, `"0"`).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Map(map) => map.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Scalar(value) => !crate::coerce::is_truthy(value),
        }
    }

    /// Short label for the input shape, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "null",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Scalar(value) => value_kind(value),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Map(map) => Value::Object(map),
            Self::List(items) => Value::Array(items),
            Self::Scalar(value) => value,
        }
    }
}

impl From<Value> for RawInput {
    /// Infallible classification. Strings are kept as scalars; use
    /// [`RawInput::from_value`] to decode embedded JSON text.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Object(map) => Self::Map(map),
            Value::Array(items) => Self::List(items),
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<Map<String, Value>> for RawInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<Value>> for RawInput {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<String>> for RawInput {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Value::String).collect())
    }
}

impl From<Vec<&str>> for RawInput {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(Value::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawInput {
    fn from(items: [&str; N]) -> Self {
        Self::List(items.into_iter().map(Value::from).collect())
    }
}

impl<T: Into<RawInput>> From<Option<T>> for RawInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Children of an array-like value: array items, or map values in insertion order.
pub fn entries<'a>(value: &'a Value, path: &FilterPath) -> NormalizeResult<Vec<&'a Value>> {
    match value {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(map.values().collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(NormalizeError::malformed(
            path,
            format!("expected a list or map, found {}", value_kind(other)),
        )),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

fn looks_serialized(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct SearchGroupInput {
        #[serde(rename = "groupOp")]
        group_op: &'static str,
        rules: Vec<RuleInput>,
    }

    #[derive(Serialize)]
    struct RuleInput {
        field: &'static str,
        op: &'static str,
        data: i64,
    }

    #[test]
    fn classifies_native_values() {
        assert_eq!(RawInput::from_value(json!(null)).expect("null"), RawInput::Absent);
        assert!(matches!(RawInput::from_value(json!({"a": 1})).expect("map"), RawInput::Map(_)));
        assert!(matches!(RawInput::from_value(json!([1, 2])).expect("list"), RawInput::List(_)));
        assert!(matches!(RawInput::from_value(json!("name ASC")).expect("scalar"), RawInput::Scalar(_)));
    }

    #[test]
    fn decodes_embedded_json_text() {
        let input = RawInput::from_value(json!(r#"{"groupOp":"OR","rules":[]}"#)).expect("embedded JSON");
        let RawInput::Map(map) = input else {
            panic!("expected map");
        };
        assert_eq!(map.get("groupOp"), Some(&json!("OR")));

        let err = RawInput::from_value(json!("{not json")).expect_err("broken JSON text");
        assert!(matches!(err, NormalizeError::MalformedFilterInput { .. }));
    }

    #[test]
    fn object_like_input_converts_to_plain_map() {
        let input = SearchGroupInput {
            group_op: "AND",
            rules: vec![RuleInput {
                field: "plant",
                op: "eq",
                data: 500,
            }],
        };
        let raw = RawInput::from_serialize(&input).expect("serializable");
        assert_eq!(
            raw.into_value(),
            json!({"groupOp": "AND", "rules": [{"field": "plant", "op": "eq", "data": 500}]})
        );
    }

    #[test]
    fn emptiness_follows_generic_rules() {
        assert!(RawInput::Absent.is_empty());
        assert!(RawInput::from(json!([])).is_empty());
        assert!(RawInput::from(json!({})).is_empty());
        assert!(RawInput::from(json!("")).is_empty());
        assert!(RawInput::from(json!(0)).is_empty());
        assert!(RawInput::from(json!(false)).is_empty());
        assert!(!RawInput::from(json!(["name ASC"])).is_empty());
        assert!(!RawInput::from(json!("name ASC")).is_empty());
    }

    #[test]
    fn entries_keep_map_insertion_order() {
        let value = json!({"2": "b", "0": "a", "1": "c"});
        let items = entries(&value, &FilterPath::root().key("orderSpecs")).expect("map entries");
        assert_eq!(items, vec![&json!("b"), &json!("a"), &json!("c")]);

        let err = entries(&json!(7), &FilterPath::root().key("rules")).expect_err("scalar has no entries");
        assert_eq!(err.to_string(), "malformed filter input at rules: expected a list or map, found number");
    }
}
