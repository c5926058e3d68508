use std::ops::Range;

use crate::grammar::{Production, Symbol};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    symbol: Symbol,
    children: Option<Range<NodeId>>,
}

impl Node {
    pub fn new(symbol: Symbol) -> Self {
        Node { symbol, children: None }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    // Terminal and epsilon nodes are never expanded
    pub fn is_expandable(&self) -> bool {
        !self.is_expanded() && self.symbol.is_non_terminal()
    }
}

// Derivation tree stored as an arena. Children of one node always occupy a
// contiguous id range, so they can be handed out as a slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(root: Symbol) -> Self {
        Tree { nodes: vec![Node::new(root)] }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn root(&self) -> &Node {
        self.node(Tree::ROOT)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[Node] {
        match &self.nodes[id].children {
            Some(range) => &self.nodes[range.clone()],
            None => &[],
        }
    }

    fn child_ids(&self, id: NodeId) -> Range<NodeId> {
        self.nodes[id].children.clone().unwrap_or(0..0)
    }

    /// Appends one child per symbol of `production` below `id` and returns
    /// the ids of the new children.
    pub(crate) fn expand(&mut self, id: NodeId, production: &Production) -> Range<NodeId> {
        let first = self.nodes.len();
        self.nodes.extend(production.values().iter().cloned().map(Node::new));

        let range = first..self.nodes.len();
        self.nodes[id].children = Some(range.clone());
        range
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Vec<&Node> {
        let mut leaves = Vec::new();
        let mut stack = vec![Tree::ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_expanded() {
                stack.extend(self.child_ids(id).rev());
            } else {
                leaves.push(node);
            }
        }

        leaves
    }

    pub fn is_complete(&self) -> bool {
        self.leaves().iter().all(|node| !node.symbol().is_non_terminal())
    }
}
