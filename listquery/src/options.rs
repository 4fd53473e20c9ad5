use serde::{Deserialize, Serialize};

use crate::filters::{DEFAULT_MAX_GROUP_DEPTH, GroupOp, ParseLimits};

/// Knobs applied while normalizing a request.
///
/// Deserializable so it can be embedded in a configuration file:
///
/// ```toml
/// strict_booleans = true
/// max_group_depth = 8
/// default_group_op = "AND"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Reject boolean-ish inputs whose coercion would be surprising (`"yes"`, `[1]`).
    pub strict_booleans: bool,
    /// Deepest allowed filter group nesting, counting the root as 1.
    pub max_group_depth: usize,
    /// Combinator for groups that omit `groupOp`; when unset the key is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_group_op: Option<GroupOp>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strict_booleans: false,
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
            default_group_op: None,
        }
    }
}

impl NormalizeOptions {
    #[inline]
    pub fn with_strict_booleans(mut self, strict: bool) -> Self {
        self.strict_booleans = strict;
        self
    }

    #[inline]
    pub fn with_max_group_depth(mut self, depth: usize) -> Self {
        self.max_group_depth = depth;
        self
    }

    #[inline]
    pub fn with_default_group_op(mut self, op: Option<GroupOp>) -> Self {
        self.default_group_op = op;
        self
    }

    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_group_depth: self.max_group_depth,
            default_group_op: self.default_group_op,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient() {
        let options = NormalizeOptions::default();
        assert!(!options.strict_booleans);
        assert_eq!(options.max_group_depth, DEFAULT_MAX_GROUP_DEPTH);
        assert_eq!(options.parse_limits(), ParseLimits::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let options: NormalizeOptions = toml::from_str("default_group_op = \"or\"").expect("valid toml");
        assert_eq!(options.default_group_op, Some(GroupOp::Or));
        assert_eq!(options.max_group_depth, DEFAULT_MAX_GROUP_DEPTH);
        assert!(!options.strict_booleans);
    }

    #[test]
    fn default_group_op_accepts_any_case() {
        let options: NormalizeOptions = toml::from_str("default_group_op = \"aNd\"").expect("mixed case");
        assert_eq!(options.default_group_op, Some(GroupOp::And));

        assert!(toml::from_str::<NormalizeOptions>("default_group_op = \"nand\"").is_err());
    }
}
