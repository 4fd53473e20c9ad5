//! Scalar coercion for the loosely typed fields of a list query.
//!
//! Transports hand flags over as native booleans, as the literal strings `"true"` /
//! `"false"` (in any case), or as arbitrary scalars. The literal tokens are matched
//! before falling back to generic truthiness, otherwise the string `"false"` would
//! coerce to `true` for being non-empty.

use serde_json::Value;

use crate::errors::{NormalizeError, NormalizeResult};

/// Resolves a boolean-ish value to a definite `bool`.
///
/// # Examples
///
/// ```
/// use listquery::coerce::coerce_bool;
/// use serde_json::json;
///
/// assert!(coerce_bool(&json!("True")));
/// assert!(!coerce_bool(&json!("false")));
/// assert!(!coerce_bool(&json!(0)));
/// assert!(coerce_bool(&json!(1)));
/// assert!(!coerce_bool(&json!("")));
/// assert!(!coerce_bool(&json!(null)));
/// ```
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::String(text) => bool_token(text).unwrap_or_else(|| is_truthy(value)),
        other => is_truthy(other),
    }
}

/// Like [`coerce_bool`], but rejects inputs whose coercion would be surprising.
///
/// Accepted: booleans, numbers, `null`, and the strings `true`, `false`, `1`, `0`
/// and the empty string. Anything else (`"yes"`, `"off"`, arrays, objects) yields
/// [`NormalizeError::TypeCoercionAmbiguous`].
pub fn coerce_bool_strict(field: &str, value: &Value) -> NormalizeResult<bool> {
    let ambiguous = match value {
        Value::String(text) => bool_token(text).is_none() && !matches!(text.as_str(), "" | "0" | "1"),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    };
    if ambiguous {
        return Err(NormalizeError::TypeCoercionAmbiguous {
            field: field.to_string(),
            value: value.clone(),
        });
    }
    Ok(coerce_bool(value))
}

/// Generic truthiness: `null`, `false`, `0`, `0.0`, `""`, `"0"` and empty
/// collections are false, everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !(text.is_empty() || text == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Reads a page number or page size.
///
/// Accepts JSON integers, integral floats, and integer strings (query-string
/// transports send `"2"`). No range validation is performed.
pub fn coerce_int(field: &str, value: &Value) -> NormalizeResult<i64> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64).map(|n| n as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| NormalizeError::InvalidInteger {
        field: field.to_string(),
        value: value.clone(),
    })
}

fn bool_token(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
