//! Parsing of tree-style directory listings.
//!
//! Text such as the output of `tree` is turned into an arena of
//! [`TreeNode`]s with parent links, from which the flat list of paths to
//! create is derived.
//!
//! Tabs count as one level and four spaces count as one level. Input that
//! mixes both conventions gets no special treatment, so relative depths in
//! such input are only as consistent as the indentation itself.

mod line;
mod node;
mod parser;

pub use line::{TREE_BRANCH, TREE_LAST, TREE_SPACE, TREE_VERTICAL};
pub use parser::{ParseError, ParseWarning, Summary, TreeParser};

#[cfg(test)]
pub use parser::parse_tree;
