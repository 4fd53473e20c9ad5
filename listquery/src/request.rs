//! The normalized list query request.

use serde::Serialize;
use serde_json::Value;

use crate::coerce::{coerce_bool, coerce_bool_strict};
use crate::errors::{FilterPath, NormalizeResult};
use crate::filters::{FilterGroup, build_filter};
use crate::options::NormalizeOptions;
use crate::order::{MANDATORY_ORDER_SPECS_FIELD, ORDER_SPECS_FIELD, normalize_order_specs};
use crate::shape::RawInput;

pub const SEARCH_ENABLED_FIELD: &str = "searchEnabled";
pub const PAGINATION_ENABLED_FIELD: &str = "resultShouldBePaginated";
pub const SEARCH_PARAMS_FIELD: &str = "searchParams";

/// A list query with every field resolved to a definite, typed value.
///
/// Built once per incoming request and then read by the query builder. Setters
/// exist for targeted overrides (for example turning pagination off to export the
/// full result set) and apply the same coercion as construction, so the
/// invariants hold regardless of call order:
///
/// - flags are always `true`/`false`,
/// - order-spec lists are always present (possibly empty),
/// - the filter is either unset or a single root group.
///
/// Serializes with the transport's key names, so the output can be normalized again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQueryRequest {
    page: i64,
    #[serde(rename = "itemCount")]
    page_size: i64,
    #[serde(rename = "searchEnabled")]
    search_enabled: bool,
    #[serde(rename = "searchParams")]
    filter: Option<FilterGroup>,
    #[serde(rename = "orderSpecs")]
    order_specs: Vec<String>,
    #[serde(rename = "resultShouldBePaginated")]
    pagination_enabled: bool,
    #[serde(rename = "mandatoryOrderSpecs")]
    mandatory_order_specs: Vec<String>,
    #[serde(skip)]
    options: NormalizeOptions,
}

impl ListQueryRequest {
    /// Build a request from raw, loosely typed inputs using default options.
    ///
    /// Fails on the first malformed input; a partially built request is never returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use listquery::ListQueryRequest;
    /// use serde_json::json;
    ///
    /// let request = ListQueryRequest::new(
    ///     1,
    ///     25,
    ///     "true",
    ///     json!({"groupOp": "AND", "rules": [{"field": "plant", "op": "eq", "data": 500}]}),
    ///     json!(["plantNr ASC"]),
    ///     "false",
    ///     None,
    /// )
    /// .unwrap();
    ///
    /// assert!(request.search_enabled());
    /// assert!(!request.pagination_enabled());
    /// assert_eq!(request.filter().map(|f| f.rule_count()), Some(1));
    /// assert!(request.mandatory_order_specs().is_empty());
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        page: i64,
        page_size: i64,
        search_enabled: impl Into<Value>,
        search_params: impl Into<RawInput>,
        order_specs: impl Into<RawInput>,
        pagination_enabled: impl Into<Value>,
        mandatory_order_specs: Option<RawInput>,
    ) -> NormalizeResult<Self> {
        Self::with_options(
            NormalizeOptions::default(),
            page,
            page_size,
            search_enabled,
            search_params,
            order_specs,
            pagination_enabled,
            mandatory_order_specs,
        )
    }

    /// [`ListQueryRequest::new`] with explicit normalization options.
    #[allow(clippy::too_many_arguments)]
    pub fn with_options(
        options: NormalizeOptions,
        page: i64,
        page_size: i64,
        search_enabled: impl Into<Value>,
        search_params: impl Into<RawInput>,
        order_specs: impl Into<RawInput>,
        pagination_enabled: impl Into<Value>,
        mandatory_order_specs: Option<RawInput>,
    ) -> NormalizeResult<Self> {
        let mut request = Self {
            page,
            page_size,
            search_enabled: false,
            filter: None,
            order_specs: Vec::new(),
            pagination_enabled: true,
            mandatory_order_specs: Vec::new(),
            options,
        };
        request.set_order_specs(order_specs)?;
        request.set_search_enabled(search_enabled)?;
        request.set_pagination_enabled(pagination_enabled)?;
        request.set_search_params(search_params)?;
        request.set_mandatory_order_specs(mandatory_order_specs.unwrap_or_default())?;
        Ok(request)
    }

    // ========== Getters ==========

    #[inline]
    pub fn page(&self) -> i64 {
        self.page
    }

    #[inline]
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    #[inline]
    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    /// Root of the filter tree; `None` when no rules or groups were supplied.
    #[inline]
    pub fn filter(&self) -> Option<&FilterGroup> {
        self.filter.as_ref()
    }

    #[inline]
    pub fn order_specs(&self) -> &[String] {
        &self.order_specs
    }

    #[inline]
    pub fn pagination_enabled(&self) -> bool {
        self.pagination_enabled
    }

    #[inline]
    pub fn mandatory_order_specs(&self) -> &[String] {
        &self.mandatory_order_specs
    }

    #[inline]
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    // ========== Setters ==========

    pub fn set_page(&mut self, page: i64) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: i64) {
        self.page_size = page_size;
    }

    pub fn set_search_enabled(&mut self, value: impl Into<Value>) -> NormalizeResult<()> {
        self.search_enabled = self.coerce_flag(SEARCH_ENABLED_FIELD, &value.into())?;
        Ok(())
    }

    pub fn set_pagination_enabled(&mut self, value: impl Into<Value>) -> NormalizeResult<()> {
        self.pagination_enabled = self.coerce_flag(PAGINATION_ENABLED_FIELD, &value.into())?;
        Ok(())
    }

    /// Rebuild the filter tree from raw `searchParams` input.
    pub fn set_search_params(&mut self, search_params: impl Into<RawInput>) -> NormalizeResult<()> {
        let raw = decode(search_params.into(), SEARCH_PARAMS_FIELD)?;
        self.filter = build_filter(&raw, &self.options.parse_limits())?;
        Ok(())
    }

    /// Replace the filter with an already-built tree.
    pub fn set_filter(&mut self, filter: Option<FilterGroup>) {
        self.filter = filter;
    }

    pub fn set_order_specs(&mut self, order_specs: impl Into<RawInput>) -> NormalizeResult<()> {
        let raw = decode(order_specs.into(), ORDER_SPECS_FIELD)?;
        self.order_specs = normalize_order_specs(&raw, ORDER_SPECS_FIELD)?;
        Ok(())
    }

    pub fn set_mandatory_order_specs(&mut self, order_specs: impl Into<RawInput>) -> NormalizeResult<()> {
        let raw = decode(order_specs.into(), MANDATORY_ORDER_SPECS_FIELD)?;
        self.mandatory_order_specs = normalize_order_specs(&raw, MANDATORY_ORDER_SPECS_FIELD)?;
        Ok(())
    }

    // ========== Query builder helpers ==========

    /// Copy of this request with pagination turned off, for exporting the full result set.
    pub fn unpaginated(&self) -> Self {
        Self {
            pagination_enabled: false,
            ..self.clone()
        }
    }

    /// Rows to skip, treating `page` as 1-based. `None` when pagination is off.
    pub fn offset(&self) -> Option<u64> {
        if !self.pagination_enabled {
            return None;
        }
        let page = u64::try_from(self.page.saturating_sub(1)).unwrap_or(0);
        let size = u64::try_from(self.page_size).unwrap_or(0);
        Some(page.saturating_mul(size))
    }

    /// Rows to return. `None` when pagination is off.
    pub fn limit(&self) -> Option<u64> {
        self.pagination_enabled
            .then(|| u64::try_from(self.page_size).unwrap_or(0))
    }

    fn coerce_flag(&self, field: &str, value: &Value) -> NormalizeResult<bool> {
        if self.options.strict_booleans {
            coerce_bool_strict(field, value)
        } else {
            Ok(coerce_bool(value))
        }
    }
}

fn decode(input: RawInput, field: &str) -> NormalizeResult<RawInput> {
    match input {
        RawInput::Scalar(Value::String(text)) => {
            RawInput::from_value_at(Value::String(text), &FilterPath::root().key(field))
        }
        other => Ok(other),
    }
}
