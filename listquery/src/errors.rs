use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Top-level error type returned while normalizing a list query request.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A rule or group entry is missing a required key, or an input that must be
    /// map/array-shaped is not.
    #[error("malformed filter input at {path}: {reason}")]
    MalformedFilterInput { path: FilterPath, reason: String },

    /// Input was technically coercible but the result would be surprising.
    /// Only raised when strict boolean coercion is enabled.
    #[error("ambiguous value for {field}: {value} is neither a boolean nor a boolean token")]
    TypeCoercionAmbiguous { field: String, value: Value },

    /// Page or page size could not be read as an integer.
    #[error("invalid integer for {field}: {value}")]
    InvalidInteger { field: String, value: Value },

    /// The raw payload was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl NormalizeError {
    /// Convenience helper for a malformed-input error at the given location.
    pub fn malformed(path: &FilterPath, reason: impl Into<String>) -> Self {
        Self::MalformedFilterInput {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// Location of the offending entry, when the error has one.
    pub fn path(&self) -> Option<&FilterPath> {
        match self {
            Self::MalformedFilterInput { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(String, usize),
}

/// Path-qualified location inside the raw input, rendered as `groups[2].rules[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPath {
    segments: Vec<Segment>,
}

impl FilterPath {
    /// The root of the input being walked.
    pub fn root() -> Self {
        Self::default()
    }

    /// Location of a named key below this path (`groups[0].groupOp`).
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.into()));
        next
    }

    /// Location of the `index`-th entry of the `key` collection (`rules[3]`).
    pub fn index(&self, key: impl Into<String>, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(key.into(), index));
        next
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of `groups[..]` hops from the root.
    pub fn group_depth(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Index(key, _) if key == "groups"))
            .count()
    }
}

impl fmt::Display for FilterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Key(key) => f.write_str(key)?,
                Segment::Index(key, index) => write!(f, "{key}[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_nested_locations() {
        let path = FilterPath::root().index("groups", 2).index("rules", 0);
        assert_eq!(path.to_string(), "groups[2].rules[0]");
        assert_eq!(path.group_depth(), 1);

        let op = FilterPath::root().index("groups", 0).index("groups", 1).key("groupOp");
        assert_eq!(op.to_string(), "groups[0].groups[1].groupOp");
        assert_eq!(op.group_depth(), 2);
    }

    #[test]
    fn root_path_has_placeholder() {
        assert!(FilterPath::root().is_root());
        assert_eq!(FilterPath::root().to_string(), "<root>");
    }

    #[test]
    fn malformed_error_message_is_path_qualified() {
        let path = FilterPath::root().index("rules", 0);
        let err = NormalizeError::malformed(&path, "missing required key `field`");
        assert_eq!(
            err.to_string(),
            "malformed filter input at rules[0]: missing required key `field`"
        );
        assert_eq!(err.path(), Some(&path));
    }
}
