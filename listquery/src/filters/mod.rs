//! Filter tree built from the `searchParams` part of a list query.
//!
//! [`tree`] holds the node types; [`parser`] turns raw input into a tree.

pub mod parser;
pub mod tree;

pub use parser::{DEFAULT_MAX_GROUP_DEPTH, ParseLimits, build_filter};
pub use tree::{FilterGroup, FilterNode, FilterRule, GroupOp};
