use std::fmt;

/// Index of a node inside the arena of one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(super) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// One filesystem entry recovered from tree text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    is_directory: bool,
    depth: usize,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    pub(super) fn new(name: String, is_directory: bool, depth: usize) -> Self {
        Self {
            name,
            is_directory,
            depth,
            children: Vec::new(),
            parent: None,
        }
    }

    pub(super) fn attach_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(super) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Children in source order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_directory { "DIR" } else { "FILE" };
        write!(
            f,
            "{kind}: {} (depth={}, children={})",
            self.name,
            self.depth,
            self.children.len()
        )
    }
}
