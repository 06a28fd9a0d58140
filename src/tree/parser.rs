use derive_more::Display;
use snafu::Snafu;
use tracing::{debug, warn};

use super::line::{LineEntry, next_entry_depth, parse_line};
use super::node::{NodeId, TreeNode};

/// Counts over every parsed node, orphans included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[display("{total} entries ({directories} directories, {files} files)")]
pub struct Summary {
    pub total: usize,
    pub directories: usize,
    pub files: usize,
}

/// Structural oddities found while assembling the tree. None of them stop the
/// parse.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseWarning {
    #[display(
        "line {line}: '{name}' has no parent entry and is left out of the tree along with {descendants} nested entries"
    )]
    Orphan {
        line: usize,
        name: String,
        descendants: usize,
    },
    #[display(
        "line {line}: '{name}' is indented {indent} levels deep, but its nearest parent is at level {parent_indent}"
    )]
    DepthJump {
        line: usize,
        name: String,
        indent: usize,
        parent_indent: usize,
    },
}

impl ParseWarning {
    pub fn line(&self) -> usize {
        match self {
            Self::Orphan { line, .. } | Self::DepthJump { line, .. } => *line,
        }
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ParseError {
    #[snafu(display("The tree text is empty"))]
    EmptyInput,
    #[snafu(display("None of the {lines} non-blank lines describe a file or directory"))]
    NoUsableNodes { lines: usize },
}

/// Arena holding every node of one parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTree {
    nodes: Vec<TreeNode>,
    warnings: Vec<ParseWarning>,
}

impl ParsedTree {
    /// The root is always the first node allocated.
    pub fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// Every node in source order, orphans included.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.node(id).children().iter().map(|child| self.node(*child))
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Nodes reachable from the root, parents before children.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![self.root_id()];

        while let Some(id) = pending.pop() {
            order.push(id);
            pending.extend(self.node(id).children().iter().rev().copied());
        }

        order
    }

    /// Names from the root down to `id`, joined with `/` and placed under
    /// `base_path`.
    pub fn full_path(&self, id: NodeId, base_path: &str) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            parts.push(node.name());
            current = node.parent();
        }
        parts.reverse();

        let relative = parts.join("/");
        if base_path.is_empty() {
            relative
        } else {
            format!("{}/{}", base_path.trim_end_matches('/'), relative)
        }
    }

    /// Every reachable entry as `(path, is_directory)` in pre-order.
    pub fn all_paths(&self, base_path: &str) -> Vec<(String, bool)> {
        self.preorder()
            .into_iter()
            .map(|id| (self.full_path(id, base_path), self.node(id).is_directory()))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let directories = self.nodes.iter().filter(|node| node.is_directory()).count();
        Summary {
            total: self.nodes.len(),
            directories,
            files: self.nodes.len() - directories,
        }
    }
}

/// Parses tree text into a rooted hierarchy.
///
/// The first line carrying an entry becomes the root at depth 0. Every later
/// entry is attached to the most recent entry at a shallower indentation,
/// tracked through a slot per indentation level.
pub fn parse_tree(text: &str) -> Result<ParsedTree, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let non_blank = lines.iter().filter(|line| !line.trim().is_empty()).count();
    if non_blank == 0 {
        return Err(ParseError::EmptyInput);
    }

    let mut nodes: Vec<TreeNode> = Vec::new();
    let mut warnings = Vec::new();
    // Most recent node at each indentation level
    let mut slots: Vec<Option<NodeId>> = Vec::new();
    let mut orphans: Vec<(NodeId, usize)> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let entry = parse_line(line);
        if !entry.is_usable() {
            debug!("Skipping line {} without an entry name", index + 1);
            continue;
        }

        let is_root = nodes.is_empty();
        let indent = if is_root { 0 } else { entry.depth };
        let is_directory = classify(&entry, indent, &lines[index + 1..]);
        let name = entry.name.trim_end_matches('/').to_string();
        let id = NodeId::new(nodes.len());

        if is_root {
            nodes.push(TreeNode::new(name, is_directory, 0));
            slots = vec![Some(id)];
            continue;
        }

        slots.truncate(indent);
        let parent = slots
            .iter()
            .rposition(Option::is_some)
            .and_then(|level| slots[level].map(|parent_id| (level, parent_id)));

        let node = match parent {
            Some((parent_indent, parent_id)) => {
                if parent_indent + 1 < indent {
                    warn!(
                        "Line {} is indented {} levels below its parent, attaching it one level down",
                        index + 1,
                        indent - parent_indent
                    );
                    warnings.push(ParseWarning::DepthJump {
                        line: index + 1,
                        name: name.clone(),
                        indent,
                        parent_indent,
                    });
                }

                let parent_node = &mut nodes[parent_id.index()];
                parent_node.attach_child(id);
                let mut node = TreeNode::new(name, is_directory, parent_node.depth() + 1);
                node.set_parent(parent_id);
                node
            }
            None => {
                orphans.push((id, index + 1));
                TreeNode::new(name, is_directory, indent)
            }
        };
        nodes.push(node);

        slots.resize(indent + 1, None);
        slots[indent] = Some(id);
    }

    if nodes.is_empty() {
        return Err(ParseError::NoUsableNodes { lines: non_blank });
    }

    for (id, line) in orphans {
        let orphan = &nodes[id.index()];
        let descendants = count_descendants(&nodes, id);
        warn!(
            "Line {} has no parent entry: '{}' ({} nested entries dropped)",
            line,
            orphan.name(),
            descendants
        );
        warnings.push(ParseWarning::Orphan {
            line,
            name: orphan.name().to_string(),
            descendants,
        });
    }
    warnings.sort_by_key(ParseWarning::line);

    debug!(
        "Parsed {} nodes with {} warnings",
        nodes.len(),
        warnings.len()
    );
    Ok(ParsedTree { nodes, warnings })
}

fn count_descendants(nodes: &[TreeNode], id: NodeId) -> usize {
    let mut count = 0;
    let mut pending = nodes[id.index()].children().to_vec();
    while let Some(child) = pending.pop() {
        count += 1;
        pending.extend_from_slice(nodes[child.index()].children());
    }
    count
}

/// A trailing slash marks a directory outright. Without one, the entry is a
/// directory only when the next entry sits deeper.
fn classify(entry: &LineEntry<'_>, depth: usize, remaining: &[&str]) -> bool {
    if entry.name.ends_with('/') {
        return true;
    }
    next_entry_depth(remaining).is_some_and(|next| next > depth)
}

/// Keeps the outcome of the last parse so paths and counts can be queried
/// after it. Each parse replaces the previous result.
#[derive(Debug, Default)]
pub struct TreeParser {
    tree: Option<ParsedTree>,
}

impl TreeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root, or `None` when the text holds no entries.
    pub fn parse(&mut self, text: &str) -> Option<&TreeNode> {
        self.try_parse(text).ok()
    }

    pub fn try_parse(&mut self, text: &str) -> Result<&TreeNode, ParseError> {
        self.tree = None;
        let tree = parse_tree(text)?;
        Ok(self.tree.insert(tree).root())
    }

    pub fn tree(&self) -> Option<&ParsedTree> {
        self.tree.as_ref()
    }

    pub fn get_all_paths(&self, base_path: &str) -> Vec<(String, bool)> {
        self.tree
            .as_ref()
            .map(|tree| tree.all_paths(base_path))
            .unwrap_or_default()
    }

    pub fn get_summary(&self) -> Summary {
        self.tree
            .as_ref()
            .map(ParsedTree::summary)
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        self.tree
            .as_ref()
            .map(ParsedTree::warnings)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    const PROJECT: &str = "\
project/
├── src/
│   └── main.py
└── README.md
";

    fn describe(tree: &ParsedTree) -> Vec<(String, bool, usize)> {
        tree.preorder()
            .into_iter()
            .map(|id| {
                let node = tree.node(id);
                (node.name().to_string(), node.is_directory(), node.depth())
            })
            .collect()
    }

    #[test]
    fn parses_rendered_project() {
        let tree = parse_tree(PROJECT).unwrap();

        assert_eq!(
            describe(&tree),
            vec![
                ("project".to_string(), true, 0),
                ("src".to_string(), true, 1),
                ("main.py".to_string(), false, 2),
                ("README.md".to_string(), false, 1),
            ]
        );
        assert_eq!(
            tree.summary(),
            Summary {
                total: 4,
                directories: 2,
                files: 2
            }
        );
        assert!(tree.warnings().is_empty());
    }

    #[test]
    fn infers_directories_from_plain_indentation() {
        let tree = parse_tree("app\n    config\n    main\n").unwrap();

        let root = tree.root();
        assert_eq!(root.name(), "app");
        assert!(root.is_directory());

        let children: Vec<_> = tree.children(tree.root_id()).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name(), "config");
        assert_eq!(children[1].name(), "main");
        assert!(children.iter().all(|c| !c.is_directory() && c.depth() == 1));
    }

    #[rstest]
    #[case::empty("")]
    #[case::newlines("\n\n\n")]
    #[case::whitespace("   \n\t\n  ")]
    fn empty_input_fails(#[case] text: &str) {
        assert_eq!(parse_tree(text), Err(ParseError::EmptyInput));
        assert!(TreeParser::new().parse(text).is_none());
    }

    #[test]
    fn input_without_entries_fails() {
        let result = parse_tree("├── \n│   \n└── /\n");
        assert_eq!(result, Err(ParseError::NoUsableNodes { lines: 3 }));
    }

    #[test]
    fn deeper_follower_makes_a_directory() {
        let tree = parse_tree("root/\nsrc\n├── main.ext\n").unwrap();
        let src = tree.nodes().iter().find(|n| n.name() == "src").unwrap();
        assert!(src.is_directory());
    }

    #[test]
    fn sibling_follower_keeps_a_file() {
        let tree = parse_tree("root/\n├── README.md\n└── LICENSE\n").unwrap();
        let readme = tree.nodes().iter().find(|n| n.name() == "README.md").unwrap();
        assert!(!readme.is_directory());
    }

    #[test]
    fn trailing_slash_wins_over_inference() {
        let tree = parse_tree("root/\n└── lib/\n").unwrap();
        let lib = tree.nodes().iter().find(|n| n.name() == "lib").unwrap();
        assert!(lib.is_directory());
        assert_eq!(lib.name(), "lib");
    }

    #[test]
    fn blank_lines_do_not_change_structure() {
        let spaced = "\n\nproject/\n\n├── src/\n   \n│   └── main.py\n\n└── README.md\n\n";
        let plain = parse_tree(PROJECT).unwrap();
        let with_blanks = parse_tree(spaced).unwrap();

        assert_eq!(describe(&plain), describe(&with_blanks));
        assert_eq!(plain.all_paths("/tmp"), with_blanks.all_paths("/tmp"));
    }

    #[test]
    fn empty_lines_do_not_break_inference() {
        let tree = parse_tree("root\n│   \nsub\n├── \n├── inner\n").unwrap();
        let sub = tree.nodes().iter().find(|n| n.name() == "sub").unwrap();
        assert!(sub.is_directory());
    }

    #[test]
    fn first_entry_is_root_at_depth_zero() {
        let tree = parse_tree("└── top\n    └── inner\n").unwrap();
        assert_eq!(tree.root().name(), "top");
        assert_eq!(tree.root().depth(), 0);
        assert!(tree.root().is_directory());
        assert_eq!(tree.children(tree.root_id()).count(), 1);
    }

    #[test]
    fn paths_follow_preorder_and_base_path() {
        let tree = parse_tree(PROJECT).unwrap();

        assert_eq!(
            tree.all_paths("/tmp/out/"),
            vec![
                ("/tmp/out/project".to_string(), true),
                ("/tmp/out/project/src".to_string(), true),
                ("/tmp/out/project/src/main.py".to_string(), false),
                ("/tmp/out/project/README.md".to_string(), false),
            ]
        );
        assert_eq!(tree.all_paths("")[2], ("project/src/main.py".to_string(), false));
    }

    #[test]
    fn slash_count_matches_depth() {
        let text = "\
root/
├── a/
│   ├── b/
│   │   └── c.txt
│   └── d.txt
└── e/
    └── f/
        └── g.txt
";
        let tree = parse_tree(text).unwrap();
        for id in tree.preorder() {
            let path = tree.full_path(id, "");
            assert_eq!(path.matches('/').count(), tree.node(id).depth(), "{path}");
        }
    }

    fn assert_structural_invariants(tree: &ParsedTree) {
        for id in tree.preorder() {
            let node = tree.node(id);
            if !node.children().is_empty() {
                assert!(node.is_directory(), "{node}");
            }
            if let Some(parent) = node.parent() {
                assert_eq!(tree.node(parent).depth() + 1, node.depth(), "{node}");
            }
            let path = tree.full_path(id, "");
            assert_eq!(path.matches('/').count(), node.depth(), "{path}");
        }
    }

    #[test]
    fn nodes_with_children_are_directories() {
        let text = "root\n\ta\n\t\tb.txt\n    c\n        d\n            e.txt\n";
        let tree = parse_tree(text).unwrap();

        assert_eq!(
            describe(&tree),
            vec![
                ("root".to_string(), true, 0),
                ("a".to_string(), true, 1),
                ("b.txt".to_string(), false, 2),
                ("c".to_string(), true, 1),
                ("d".to_string(), true, 2),
                ("e.txt".to_string(), false, 3),
            ]
        );
        assert_eq!(tree.children(tree.root_id()).count(), 2);
        assert!(tree.warnings().is_empty());
        assert_structural_invariants(&tree);
    }

    #[rstest]
    #[case::four_spaces("app\n    config\n        inner\n    main\n")]
    #[case::tabs("app\n\tconfig\n\t\tinner\n\tmain\n")]
    fn plain_indentation_builds_nested_tree(#[case] text: &str) {
        let tree = parse_tree(text).unwrap();

        assert_eq!(
            tree.all_paths("/out"),
            vec![
                ("/out/app".to_string(), true),
                ("/out/app/config".to_string(), true),
                ("/out/app/config/inner".to_string(), false),
                ("/out/app/main".to_string(), false),
            ]
        );
        assert!(tree.warnings().is_empty());
        assert_structural_invariants(&tree);
    }

    #[test]
    fn second_top_level_entry_is_an_orphan() {
        let tree = parse_tree("first/\nsecond.txt\n└── third\n").unwrap();

        assert_eq!(tree.all_paths("").len(), 1);
        assert_eq!(tree.summary().total, 3);
        assert_eq!(
            tree.warnings(),
            &[ParseWarning::Orphan {
                line: 2,
                name: "second.txt".to_string(),
                descendants: 1,
            }]
        );
    }

    #[test]
    fn orphan_warning_counts_its_whole_subtree() {
        let text = "first/\nsecond/\n├── a/\n│   └── b.txt\n└── c.txt\nthird.txt\n";
        let tree = parse_tree(text).unwrap();

        assert_eq!(tree.all_paths("").len(), 1);
        assert_eq!(
            tree.warnings(),
            &[
                ParseWarning::Orphan {
                    line: 2,
                    name: "second".to_string(),
                    descendants: 3,
                },
                ParseWarning::Orphan {
                    line: 6,
                    name: "third.txt".to_string(),
                    descendants: 0,
                },
            ]
        );
        assert!(
            tree.warnings()[0]
                .to_string()
                .ends_with("left out of the tree along with 3 nested entries")
        );
    }

    #[test]
    fn warnings_are_ordered_by_line() {
        let tree = parse_tree("root\n        jump\nstray\n            deep\n").unwrap();
        let lines: Vec<usize> = tree.warnings().iter().map(ParseWarning::line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn depth_jump_attaches_to_nearest_parent() {
        let tree = parse_tree("root\n            deep\n            deeper\n").unwrap();

        let children: Vec<_> = tree.children(tree.root_id()).collect();
        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.depth() == 1));
        assert_eq!(tree.warnings().len(), 2);
        assert!(matches!(
            tree.warnings()[0],
            ParseWarning::DepthJump {
                line: 2,
                indent: 3,
                parent_indent: 0,
                ..
            }
        ));
    }

    #[test]
    fn reused_parser_is_idempotent() {
        let mut parser = TreeParser::new();
        parser.parse(PROJECT).unwrap();
        let first = parser.tree().cloned();
        parser.parse("other/\n└── thing\n").unwrap();
        parser.parse(PROJECT).unwrap();

        assert_eq!(parser.tree().cloned(), first);
        assert_eq!(parser.tree(), parse_tree(PROJECT).ok().as_ref());
    }

    #[test]
    fn failed_parse_clears_previous_result() {
        let mut parser = TreeParser::new();
        parser.parse(PROJECT).unwrap();
        assert!(parser.parse("  \n").is_none());

        assert!(parser.get_all_paths("/tmp").is_empty());
        assert_eq!(parser.get_summary(), Summary::default());
        assert!(parser.warnings().is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let tree = parse_tree("project/\r\n├── src/\r\n│   └── main.py\r\n").unwrap();
        assert_eq!(tree.all_paths("").last().unwrap().0, "project/src/main.py");
    }
}
