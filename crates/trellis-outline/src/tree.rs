//! Arena-backed outline tree.
//!
//! Nodes are stored in a flat `Vec` with parent/children relationships
//! tracked by indices:
//! - O(1) name lookups via `name_index`
//! - O(d) ancestry checks where d is the node depth
//!
//! Index 0 is always the synthetic root standing for the outline body.
//! It has no name and is never returned by [`OutlineTree::find_by_name`].

use std::collections::HashMap;

/// Handle to a node in an [`OutlineTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One outline entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineNode {
    /// Display name, the node's identity for lookups.
    pub name: String,
    /// Link target given by the outline document, if any.
    pub path: Option<String>,
    /// Title given by the outline document, if any.
    pub title: Option<String>,
}

impl OutlineNode {
    /// Node with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the link target.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title if set, otherwise the name.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Read-only navigation hierarchy.
///
/// Built once by a parser or [`OutlineTreeBuilder`] and safe to share
/// across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTree {
    nodes: Vec<OutlineNode>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Option<NodeId>>,
    name_index: HashMap<String, NodeId>,
}

impl OutlineTree {
    /// The synthetic body root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node data.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another tree and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &OutlineNode {
        &self.nodes[id.0]
    }

    /// Children of `id` in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id.0]
    }

    /// Whether `id` has any children.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children[id.0].is_empty()
    }

    /// Parent of `id`; `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0]
    }

    /// First node named `name` in document order.
    ///
    /// A miss is an ordinary outcome: pages such as the table of contents
    /// are never listed in the outline.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Whether `candidate` lies on the parent chain of `node`.
    ///
    /// A node is not its own ancestor.
    #[must_use]
    pub fn is_ancestor_of(&self, candidate: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == candidate)
    }

    /// Parent chain of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&id| self.parent(id))
    }

    /// Number of ancestors of `id`. Top-level entries have depth 1.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// All entries in document order, root excluded.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<NodeId> = self.children(self.root()).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Number of entries, root excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the outline has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Incremental [`OutlineTree`] construction.
#[derive(Debug)]
pub struct OutlineTreeBuilder {
    nodes: Vec<OutlineNode>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Option<NodeId>>,
}

impl Default for OutlineTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineTreeBuilder {
    /// Builder holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![OutlineNode::default()],
            children: vec![Vec::new()],
            parents: vec![None],
        }
    }

    /// The root, for adding top-level entries.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not returned by this builder.
    pub fn add_node(&mut self, parent: NodeId, node: OutlineNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.parents.push(Some(parent));
        self.children[parent.0].push(id);
        id
    }

    /// Finish the tree and index names.
    #[must_use]
    pub fn build(self) -> OutlineTree {
        let mut tree = OutlineTree {
            nodes: self.nodes,
            children: self.children,
            parents: self.parents,
            name_index: HashMap::new(),
        };

        let mut name_index = HashMap::with_capacity(tree.len());
        for id in tree.preorder() {
            let name = &tree.nodes[id.0].name;
            if name_index.contains_key(name) {
                tracing::debug!(name = %name, "Duplicate outline name, first entry wins");
                continue;
            }
            name_index.insert(name.clone(), id);
        }
        tree.name_index = name_index;

        tree
    }
}
