//! Filter tree nodes.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Boolean operator joining the children of a [`FilterGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOp {
    #[default]
    And,
    Or,
}

impl GroupOp {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            GroupOp::And => "AND",
            GroupOp::Or => "OR",
        }
    }
}

impl FromStr for GroupOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(GroupOp::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(GroupOp::Or)
        } else {
            Err(format!("unsupported group operator `{s}` (expected AND or OR)"))
        }
    }
}

impl<'de> Deserialize<'de> for GroupOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for GroupOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(field, op, data)` predicate. Neither `field` nor `op` is interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterRule {
    pub field: String,
    pub op: String,
    pub data: Value,
}

impl FilterRule {
    pub fn new(field: impl Into<String>, op: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            data: data.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.data)
    }
}

/// Child of a [`FilterGroup`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Rule(FilterRule),
    Group(FilterGroup),
}

/// A combinator and its ordered children.
///
/// Direct rules always precede child groups, matching the `rules` / `groups` request
/// shape. Within each kind children keep insertion order.
///
/// # Examples
///
/// ```
/// use listquery::filters::{FilterGroup, FilterRule, GroupOp};
///
/// let mut root = FilterGroup::new(GroupOp::And, [FilterRule::new("plant", "eq", 500)]);
/// root.add_group(FilterGroup::new(
///     GroupOp::Or,
///     [FilterRule::new("status", "eq", "open"), FilterRule::new("status", "eq", "held")],
/// ));
///
/// assert_eq!(root.rule_count(), 3);
/// assert_eq!(root.depth(), 2);
/// assert_eq!(
///     root.to_string(),
///     r#"(plant eq 500 AND (status eq "open" OR status eq "held"))"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterGroup {
    group_op: GroupOp,
    children: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn new(group_op: GroupOp, rules: impl IntoIterator<Item = FilterRule>) -> Self {
        Self {
            group_op,
            children: rules.into_iter().map(FilterNode::Rule).collect(),
        }
    }

    #[inline]
    pub fn group_op(&self) -> GroupOp {
        self.group_op
    }

    #[inline]
    pub fn children(&self) -> &[FilterNode] {
        &self.children
    }

    /// Append a rule after the existing rules and ahead of any child group.
    pub fn add_rule(&mut self, rule: FilterRule) {
        let at = self
            .children
            .iter()
            .position(|child| matches!(child, FilterNode::Group(_)))
            .unwrap_or(self.children.len());
        self.children.insert(at, FilterNode::Rule(rule));
    }

    /// Attach a nested group after the existing children.
    pub fn add_group(&mut self, group: FilterGroup) {
        self.children.push(FilterNode::Group(group));
    }

    /// Direct rules, in order.
    pub fn rules(&self) -> impl Iterator<Item = &FilterRule> {
        self.children.iter().filter_map(|child| match child {
            FilterNode::Rule(rule) => Some(rule),
            FilterNode::Group(_) => None,
        })
    }

    /// Direct child groups, in order.
    pub fn groups(&self) -> impl Iterator<Item = &FilterGroup> {
        self.children.iter().filter_map(|child| match child {
            FilterNode::Group(group) => Some(group),
            FilterNode::Rule(_) => None,
        })
    }

    /// Number of rules in this group and every nested group.
    pub fn rule_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                FilterNode::Rule(_) => 1,
                FilterNode::Group(group) => group.rule_count(),
            })
            .sum()
    }

    /// Levels of grouping, counting this group as 1.
    pub fn depth(&self) -> usize {
        1 + self.groups().map(FilterGroup::depth).max().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.group_op)?;
            }
            match child {
                FilterNode::Rule(rule) => write!(f, "{rule}")?,
                FilterNode::Group(group) => write!(f, "{group}")?,
            }
        }
        f.write_str(")")
    }
}

/// Serializes back to the request shape (`groupOp`, `rules`, `groups`) so that a
/// normalized tree can be fed through normalization again.
impl Serialize for FilterGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rules: Vec<&FilterRule> = self.rules().collect();
        let groups: Vec<&FilterGroup> = self.groups().collect();
        let mut state = serializer.serialize_struct("FilterGroup", 3)?;
        state.serialize_field("groupOp", &self.group_op)?;
        state.serialize_field("rules", &rules)?;
        state.serialize_field("groups", &groups)?;
        state.end()
    }
}
