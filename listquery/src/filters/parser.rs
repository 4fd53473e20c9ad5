//! Recursive construction of a [`FilterGroup`] tree from raw `searchParams` input.
//!
//! Expected shape at every level:
//!
//! ```text
//! {
//!   "groupOp": "AND" | "OR",
//!   "rules":   [ {"field": "...", "op": "...", "data": ...}, ... ],
//!   "groups":  [ { "groupOp": ..., "rules": [...], "groups": [...] }, ... ]
//! }
//! ```
//!
//! `rules` and `groups` may both be present; lists may also arrive as maps keyed by
//! index, in which case their values are taken in insertion order.

use log::trace;
use serde_json::{Map, Value};

use crate::errors::{FilterPath, NormalizeError, NormalizeResult};
use crate::filters::tree::{FilterGroup, FilterRule, GroupOp};
use crate::shape::{RawInput, entries, value_kind};

const GROUP_OP_KEY: &str = "groupOp";
const RULES_KEY: &str = "rules";
const GROUPS_KEY: &str = "groups";
const FIELD_KEY: &str = "field";
const OP_KEY: &str = "op";
const DATA_KEY: &str = "data";

pub const DEFAULT_MAX_GROUP_DEPTH: usize = 32;

/// Bounds applied while walking the raw tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Deepest allowed nesting, counting the root group as 1.
    pub max_group_depth: usize,
    /// Combinator used when a group omits `groupOp`. `None` makes the key required.
    pub default_group_op: Option<GroupOp>,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
            default_group_op: None,
        }
    }
}

/// Build the root filter group, if the input describes one.
///
/// Returns `Ok(None)` for absent or empty input, and for a map with no rules and no
/// `groups` key: no predicate is fabricated. An empty `rules` list alone does not
/// create a group; a `groups` key does, even when empty. A list carries no `rules` or
/// `groups` key, so it leaves the filter unset too. A non-empty scalar is rejected.
pub fn build_filter(input: &RawInput, limits: &ParseLimits) -> NormalizeResult<Option<FilterGroup>> {
    let root = FilterPath::root();
    match input {
        RawInput::Map(map) => {
            if !has_entries(map.get(RULES_KEY)) && is_unset(map.get(GROUPS_KEY)) {
                trace!("searchParams has neither rules nor groups; leaving filter unset");
                return Ok(None);
            }
            FilterGroup::parse(map, &root, limits).map(Some)
        }
        RawInput::List(items) => {
            trace!("searchParams is a list of {} entries, not a group; leaving filter unset", items.len());
            Ok(None)
        }
        other if other.is_empty() => Ok(None),
        other => Err(NormalizeError::malformed(
            &root,
            format!("expected searchParams to be a map, found {}", other.kind()),
        )),
    }
}

impl FilterGroup {
    /// Parse one group and, recursively, every group nested below it.
    pub fn parse(map: &Map<String, Value>, path: &FilterPath, limits: &ParseLimits) -> NormalizeResult<Self> {
        let depth = path.group_depth() + 1;
        if depth > limits.max_group_depth {
            return Err(NormalizeError::malformed(
                path,
                format!("groups are nested deeper than {} levels", limits.max_group_depth),
            ));
        }

        let group_op = parse_group_op(map.get(GROUP_OP_KEY), &path.key(GROUP_OP_KEY), limits)?;

        let mut rules = Vec::new();
        if let Some(raw_rules) = map.get(RULES_KEY) {
            for (i, raw_rule) in entries(raw_rules, &path.key(RULES_KEY))?.into_iter().enumerate() {
                rules.push(parse_rule(raw_rule, &path.index(RULES_KEY, i))?);
            }
        }

        let mut group = FilterGroup::new(group_op, rules);

        if let Some(raw_groups) = map.get(GROUPS_KEY) {
            for (i, raw_group) in entries(raw_groups, &path.key(GROUPS_KEY))?.into_iter().enumerate() {
                let child_path = path.index(GROUPS_KEY, i);
                let child_map = raw_group.as_object().ok_or_else(|| {
                    NormalizeError::malformed(&child_path, format!("expected a group map, found {}", value_kind(raw_group)))
                })?;
                group.add_group(FilterGroup::parse(child_map, &child_path, limits)?);
            }
        }

        trace!("parsed group at {path}: {group_op} with {} children", group.children().len());
        Ok(group)
    }
}

fn parse_group_op(raw: Option<&Value>, path: &FilterPath, limits: &ParseLimits) -> NormalizeResult<GroupOp> {
    match raw {
        Some(Value::String(text)) => text
            .parse::<GroupOp>()
            .map_err(|reason| NormalizeError::malformed(path, reason)),
        None | Some(Value::Null) => limits
            .default_group_op
            .ok_or_else(|| NormalizeError::malformed(path, "missing required key `groupOp`")),
        Some(other) => Err(NormalizeError::malformed(
            path,
            format!("expected a string, found {}", value_kind(other)),
        )),
    }
}

fn parse_rule(raw: &Value, path: &FilterPath) -> NormalizeResult<FilterRule> {
    let map = raw
        .as_object()
        .ok_or_else(|| NormalizeError::malformed(path, format!("expected a rule map, found {}", value_kind(raw))))?;

    let field = required_string(map, FIELD_KEY, path)?;
    let op = required_string(map, OP_KEY, path)?;
    let data = match map.get(DATA_KEY) {
        None => Value::Null,
        Some(Value::Object(_)) => {
            return Err(NormalizeError::malformed(
                &path.key(DATA_KEY),
                "rule data must be a scalar, a list, or null",
            ));
        }
        Some(value) => value.clone(),
    };

    Ok(FilterRule::new(field, op, data))
}

fn required_string(map: &Map<String, Value>, key: &str, path: &FilterPath) -> NormalizeResult<String> {
    match map.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        None | Some(Value::Null) => Err(NormalizeError::malformed(
            path,
            format!("missing required key `{key}`"),
        )),
        Some(other) => Err(NormalizeError::malformed(
            &path.key(key),
            format!("expected a string, found {}", value_kind(other)),
        )),
    }
}

fn is_unset(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

fn has_entries(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Null) | None => false,
        // Malformed; let the group parser report it with a path.
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> NormalizeResult<Option<FilterGroup>> {
        build_filter(&RawInput::from(value), &ParseLimits::default())
    }

    #[test]
    fn builds_root_rules() {
        let group = parse(json!({
            "groupOp": "AND",
            "rules": [{"field": "plant", "op": "eq", "data": 500}]
        }))
        .expect("valid input")
        .expect("filter should be set");

        assert_eq!(group.group_op(), GroupOp::And);
        let rules: Vec<_> = group.rules().collect();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0], &FilterRule::new("plant", "eq", 500));
        assert_eq!(group.groups().count(), 0);
    }

    #[test]
    fn unset_without_rules_or_groups() {
        assert!(parse(json!({"groupOp": "AND"})).expect("valid").is_none());
        assert!(parse(json!({"groupOp": "AND", "rules": null})).expect("valid").is_none());
        assert!(parse(json!(null)).expect("valid").is_none());
        assert!(parse(json!([])).expect("valid").is_none());
        assert!(parse(json!("")).expect("valid").is_none());
    }

    #[test]
    fn empty_rules_alone_leave_filter_unset() {
        assert!(parse(json!({"groupOp": "or", "rules": []})).expect("valid").is_none());
    }

    #[test]
    fn groups_key_builds_a_group_even_when_empty() {
        let group = parse(json!({"groupOp": "or", "rules": [], "groups": []}))
            .expect("valid")
            .expect("groups key is present");
        assert!(group.is_empty());
        assert_eq!(group.group_op(), GroupOp::Or);
    }

    #[test]
    fn root_carries_rules_and_groups_together() {
        let group = parse(json!({
            "groupOp": "AND",
            "rules": [{"field": "plant", "op": "eq", "data": 500}],
            "groups": [{"groupOp": "OR", "rules": [{"field": "a", "op": "eq", "data": 1}]}]
        }))
        .expect("valid")
        .expect("set");

        assert_eq!(group.rules().count(), 1);
        assert_eq!(group.groups().count(), 1);
        assert_eq!(group.rule_count(), 2);
    }

    #[test]
    fn map_shaped_lists_keep_insertion_order() {
        let group = parse(json!({
            "groupOp": "AND",
            "rules": {
                "1": {"field": "second", "op": "eq", "data": 2},
                "0": {"field": "first", "op": "eq", "data": 1}
            }
        }))
        .expect("valid")
        .expect("set");

        let fields: Vec<_> = group.rules().map(FilterRule::field).collect();
        assert_eq!(fields, ["second", "first"]);
    }

    #[test]
    fn missing_data_becomes_null() {
        let group = parse(json!({"groupOp": "AND", "rules": [{"field": "deleted_at", "op": "nu"}]}))
            .expect("valid")
            .expect("set");
        assert_eq!(group.rules().next().map(FilterRule::data), Some(&Value::Null));
    }

    #[test]
    fn missing_field_reports_rule_path() {
        let err = parse(json!({
            "groupOp": "AND",
            "groups": [
                {"groupOp": "OR", "rules": []},
                {"groupOp": "OR", "rules": []},
                {"groupOp": "OR", "rules": [{"op": "eq", "data": 1}]}
            ]
        }))
        .expect_err("rule without field");

        assert_eq!(
            err.to_string(),
            "malformed filter input at groups[2].rules[0]: missing required key `field`"
        );
    }

    #[test]
    fn missing_group_op_is_rejected_unless_defaulted() {
        let input = json!({"rules": [{"field": "a", "op": "eq", "data": 1}]});
        let err = parse(input.clone()).expect_err("groupOp required");
        assert_eq!(err.path().map(ToString::to_string), Some("groupOp".to_string()));

        let limits = ParseLimits {
            default_group_op: Some(GroupOp::Or),
            ..ParseLimits::default()
        };
        let group = build_filter(&RawInput::from(input), &limits)
            .expect("defaulted")
            .expect("set");
        assert_eq!(group.group_op(), GroupOp::Or);
    }

    #[test]
    fn rejects_unknown_group_op_and_bad_shapes() {
        let err = parse(json!({"groupOp": "XOR", "groups": []})).expect_err("bad combinator");
        assert!(err.to_string().contains("unsupported group operator `XOR`"));

        let err = parse(json!({"groupOp": "AND", "groups": ["nope"]})).expect_err("group not a map");
        assert_eq!(err.path().map(ToString::to_string), Some("groups[0]".to_string()));

        let err = parse(json!({"groupOp": "AND", "rules": [{"field": 3, "op": "eq"}]})).expect_err("field not a string");
        assert_eq!(err.path().map(ToString::to_string), Some("rules[0].field".to_string()));

        let err = parse(json!({"groupOp": "AND", "rules": [{"field": "a", "op": "eq", "data": {"x": 1}}]}))
            .expect_err("object data");
        assert_eq!(err.path().map(ToString::to_string), Some("rules[0].data".to_string()));

        let err = parse(json!(true)).expect_err("scalar root");
        assert!(err.to_string().contains("expected searchParams to be a map"));
    }

    #[test]
    fn list_root_leaves_filter_unset() {
        assert!(parse(json!([{"field": "a"}])).expect("valid").is_none());
        assert!(parse(json!(["not", "a", "group"])).expect("valid").is_none());
    }

    #[test]
    fn enforces_depth_limit() {
        let mut raw = json!({"groupOp": "AND", "rules": [{"field": "leaf", "op": "eq", "data": 1}]});
        for _ in 0..3 {
            raw = json!({"groupOp": "AND", "groups": [raw]});
        }

        let limits = ParseLimits {
            max_group_depth: 3,
            ..ParseLimits::default()
        };
        let err = build_filter(&RawInput::from(raw.clone()), &limits).expect_err("four levels");
        assert_eq!(
            err.path().map(ToString::to_string),
            Some("groups[0].groups[0].groups[0]".to_string())
        );

        let group = parse(raw).expect("default limit").expect("set");
        assert_eq!(group.depth(), 4);
    }
}
