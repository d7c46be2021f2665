//! Fold branches into a forest that shares common prefixes.

use crate::walk::RootedBranch;
use impath_core::graph::{ImportGraph, NodeId};

/// What a tree node stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Synthetic heading for every root that belongs to one module.
    Module(String),
    Package(NodeId),
}

impl Anchor {
    /// Text shown for this anchor: the module path or the package path.
    pub fn label<'a>(&'a self, graph: &'a ImportGraph) -> &'a str {
        match self {
            Self::Module(module) => module.as_str(),
            Self::Package(node) => graph[*node].path.as_str(),
        }
    }
}

/// A node of the merged tree. Children keep discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub anchor: Anchor,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(anchor: Anchor) -> Self {
        Self {
            anchor,
            children: Vec::new(),
        }
    }

    /// A node with no children is an actual match.
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Child representing `node`, if there is one.
    pub fn child(&self, node: NodeId) -> Option<&TreeNode> {
        self.children
            .iter()
            .find(|c| c.anchor == Anchor::Package(node))
    }

    fn child_or_insert(&mut self, node: NodeId) -> &mut TreeNode {
        let anchor = Anchor::Package(node);
        let idx = match self.children.iter().position(|c| c.anchor == anchor) {
            Some(idx) => idx,
            None => {
                self.children.push(TreeNode::new(anchor));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }
}

/// Merged result: one tree per module (or per module-less root package).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    pub roots: Vec<TreeNode>,
}

impl Forest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::node_count).sum()
    }

    fn root_or_insert(&mut self, anchor: Anchor) -> &mut TreeNode {
        let idx = match self.roots.iter().position(|r| r.anchor == anchor) {
            Some(idx) => idx,
            None => {
                self.roots.push(TreeNode::new(anchor));
                self.roots.len() - 1
            }
        };
        &mut self.roots[idx]
    }
}

/// Merge branches, in order, into a prefix-sharing forest.
///
/// Branches from a root with a module hang below a [`Anchor::Module`] root;
/// module-less branches use their first package as the tree root. Within a
/// tree, a child is reused only when it stands for the very same graph node,
/// so a package reached along two different routes shows up twice. Roots
/// are sorted by label once all branches are in; children are never
/// reordered.
pub fn merge(graph: &ImportGraph, branches: &[RootedBranch]) -> Forest {
    let mut forest = Forest::default();

    for rooted in branches {
        let (root, rest) = match (&rooted.module, rooted.branch.split_first()) {
            (_, None) => continue,
            (Some(module), Some(_)) => (Anchor::Module(module.clone()), &rooted.branch[..]),
            (None, Some((&first, rest))) => (Anchor::Package(first), rest),
        };

        let mut cursor = forest.root_or_insert(root);
        for &node in rest {
            cursor = cursor.child_or_insert(node);
        }
    }

    forest
        .roots
        .sort_by(|a, b| a.anchor.label(graph).cmp(b.anchor.label(graph)));
    forest
}
