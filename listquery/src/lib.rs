//! Normalization of untyped list query requests.
//!
//! Transports deliver pagination, boolean-ish flags, order specs and a recursive
//! filter expression in whatever shape they happen to produce. This crate resolves
//! all of it into a [`ListQueryRequest`] that a query builder can consume without
//! further checks.
//!
//! ```
//! use listquery::Normalizer;
//! use serde_json::json;
//!
//! let request = Normalizer::default()
//!     .normalize_value(json!({
//!         "page": 1,
//!         "itemCount": 25,
//!         "searchEnabled": "true",
//!         "resultShouldBePaginated": "false",
//!         "searchParams": {
//!             "groupOp": "AND",
//!             "rules": [{"field": "plant", "op": "eq", "data": 500}],
//!             "groups": [{"groupOp": "OR", "rules": [
//!                 {"field": "status", "op": "eq", "data": "open"},
//!                 {"field": "status", "op": "eq", "data": "held"}
//!             ]}]
//!         },
//!         "orderSpecs": ["plantNr ASC"]
//!     }))
//!     .unwrap();
//!
//! assert!(request.search_enabled());
//! assert!(!request.pagination_enabled());
//! assert_eq!(request.filter().unwrap().rule_count(), 3);
//! assert_eq!(request.order_specs(), ["plantNr ASC"]);
//! ```

pub mod coerce;
pub mod errors;
pub mod filters;
pub mod normalizer;
pub mod options;
pub mod order;
pub mod request;
pub mod shape;

pub use errors::*;
pub use filters::{FilterGroup, FilterNode, FilterRule, GroupOp};
pub use normalizer::{Normalizer, RawListQuery};
pub use options::NormalizeOptions;
pub use request::ListQueryRequest;
pub use shape::RawInput;
