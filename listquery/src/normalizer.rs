//! Entry point for raw transport payloads.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::coerce_int;
use crate::errors::NormalizeResult;
use crate::options::NormalizeOptions;
use crate::request::ListQueryRequest;
use crate::shape::RawInput;

/// A list query exactly as the transport delivered it.
///
/// Every field is kept as an untyped JSON value; [`Normalizer`] resolves them.
/// The page size is read from `itemCount`, `pageSize` or `rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListQuery {
    #[serde(default)]
    pub page: Value,
    #[serde(default, alias = "pageSize", alias = "rows")]
    pub item_count: Value,
    #[serde(default)]
    pub search_enabled: Value,
    #[serde(default = "paginated_by_default")]
    pub result_should_be_paginated: Value,
    #[serde(default)]
    pub search_params: Value,
    #[serde(default)]
    pub order_specs: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_order_specs: Option<Value>,
}

fn paginated_by_default() -> Value {
    Value::Bool(true)
}

/// Turns raw payloads into [`ListQueryRequest`]s with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn normalize(&self, raw: RawListQuery) -> NormalizeResult<ListQueryRequest> {
        let page = coerce_int("page", &raw.page)?;
        let page_size = coerce_int("itemCount", &raw.item_count)?;

        let request = ListQueryRequest::with_options(
            self.options,
            page,
            page_size,
            raw.search_enabled,
            raw.search_params,
            raw.order_specs,
            raw.result_should_be_paginated,
            raw.mandatory_order_specs.map(RawInput::from),
        )?;

        match request.filter() {
            Some(filter) => debug!(
                "normalized list query: page={} size={} search={} rules={} depth={} order_specs={} mandatory={} paginated={}",
                request.page(),
                request.page_size(),
                request.search_enabled(),
                filter.rule_count(),
                filter.depth(),
                request.order_specs().len(),
                request.mandatory_order_specs().len(),
                request.pagination_enabled(),
            ),
            None => debug!(
                "normalized list query: page={} size={} search={} (no filter) order_specs={} mandatory={} paginated={}",
                request.page(),
                request.page_size(),
                request.search_enabled(),
                request.order_specs().len(),
                request.mandatory_order_specs().len(),
                request.pagination_enabled(),
            ),
        }

        Ok(request)
    }

    /// Normalize a JSON document shaped like [`RawListQuery`].
    pub fn normalize_value(&self, value: Value) -> NormalizeResult<ListQueryRequest> {
        let raw: RawListQuery = serde_json::from_value(value)?;
        self.normalize(raw)
    }

    /// Normalize JSON text shaped like [`RawListQuery`].
    pub fn normalize_str(&self, text: &str) -> NormalizeResult<ListQueryRequest> {
        let raw: RawListQuery = serde_json::from_str(text)?;
        self.normalize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NormalizeError;
    use serde_json::json;

    #[test]
    fn reads_page_size_aliases() {
        let normalizer = Normalizer::default();
        for key in ["itemCount", "pageSize", "rows"] {
            let request = normalizer
                .normalize_value(json!({"page": 1, key: 30}))
                .expect("valid payload");
            assert_eq!(request.page_size(), 30, "alias {key}");
        }
    }

    #[test]
    fn pagination_defaults_to_enabled() {
        let request = Normalizer::default()
            .normalize_value(json!({"page": "3", "itemCount": "10"}))
            .expect("valid payload");
        assert_eq!(request.page(), 3);
        assert!(request.pagination_enabled());
        assert!(!request.search_enabled());
        assert!(request.filter().is_none());
    }

    #[test]
    fn missing_page_is_rejected() {
        let err = Normalizer::default()
            .normalize_value(json!({"itemCount": 10}))
            .expect_err("page is required");
        assert!(matches!(err, NormalizeError::InvalidInteger { ref field, .. } if field == "page"));
    }

    #[test]
    fn invalid_json_text_is_reported() {
        let err = Normalizer::default().normalize_str("{page:").expect_err("broken JSON");
        assert!(matches!(err, NormalizeError::Json(_)));
    }
}
