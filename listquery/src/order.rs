//! Order-spec lists.
//!
//! Each entry is an opaque `"<field> <direction>"` token handed to the query builder
//! as-is; the grammar is not checked here.

use serde_json::Value;

use crate::errors::{FilterPath, NormalizeError, NormalizeResult};
use crate::shape::{RawInput, value_kind};

pub const ORDER_SPECS_FIELD: &str = "orderSpecs";
pub const MANDATORY_ORDER_SPECS_FIELD: &str = "mandatoryOrderSpecs";

/// Normalize an order-spec input to a list of strings, preserving order.
///
/// Empty or absent input yields an empty list, never an error.
///
/// # Examples
///
/// ```
/// use listquery::order::normalize_order_specs;
/// use listquery::shape::RawInput;
/// use serde_json::json;
///
/// let specs = normalize_order_specs(&RawInput::from(json!(["plantNr ASC", "workCenterCode DESC"])), "orderSpecs")
///     .unwrap();
/// assert_eq!(specs, ["plantNr ASC", "workCenterCode DESC"]);
///
/// assert!(normalize_order_specs(&RawInput::Absent, "orderSpecs").unwrap().is_empty());
/// ```
pub fn normalize_order_specs(input: &RawInput, field: &str) -> NormalizeResult<Vec<String>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<&Value> = match input {
        RawInput::List(items) => items.iter().collect(),
        RawInput::Map(map) => map.values().collect(),
        other => {
            return Err(NormalizeError::malformed(
                &FilterPath::root().key(field),
                format!("expected a list of order specs, found {}", other.kind()),
            ));
        }
    };

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            Value::String(spec) => Ok(spec.clone()),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(NormalizeError::malformed(
                &FilterPath::root().index(field, i),
                format!("expected an order spec string, found {}", value_kind(other)),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> NormalizeResult<Vec<String>> {
        normalize_order_specs(&RawInput::from(value), ORDER_SPECS_FIELD)
    }

    #[test]
    fn empty_inputs_become_empty_list() {
        for value in [json!(null), json!([]), json!({}), json!(""), json!(false), json!(0)] {
            assert!(normalize(value).expect("empty input").is_empty());
        }
    }

    #[test]
    fn map_input_keeps_insertion_order() {
        let specs = normalize(json!({"0": "plantNr ASC", "1": "workCenterCode DESC"})).expect("map input");
        assert_eq!(specs, ["plantNr ASC", "workCenterCode DESC"]);
    }

    #[test]
    fn entries_are_not_parsed() {
        let specs = normalize(json!(["whatever grammar", "   ", 7])).expect("opaque entries");
        assert_eq!(specs, ["whatever grammar", "   ", "7"]);
    }

    #[test]
    fn rejects_non_collection_input() {
        let err = normalize(json!("name ASC")).expect_err("bare string");
        assert_eq!(
            err.to_string(),
            "malformed filter input at orderSpecs: expected a list of order specs, found string"
        );
    }

    #[test]
    fn rejects_nested_entries() {
        let err = normalize_order_specs(
            &RawInput::from(json!(["id ASC", ["name", "DESC"]])),
            MANDATORY_ORDER_SPECS_FIELD,
        )
        .expect_err("nested entry");
        assert_eq!(err.path().map(ToString::to_string), Some("mandatoryOrderSpecs[1]".to_string()));
    }
}
