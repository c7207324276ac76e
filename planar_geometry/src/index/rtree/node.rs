use crate::{geometry::Envelope, index::arena::NodeId};

#[derive(Debug, Clone)]
pub(crate) enum NodeKind<G> {
    /// Stored geometry.
    Leaf(G),
    /// Directory node. `level` 1 holds leaves, level `n` holds nodes of level `n - 1`.
    Internal { children: Vec<NodeId>, level: usize },
}

#[derive(Debug, Clone)]
pub(crate) struct Node<G> {
    pub envelope: Envelope,
    pub parent: Option<NodeId>,
    pub kind: NodeKind<G>,
}

impl<G> Node<G> {
    #[inline]
    pub fn leaf(item: G, envelope: Envelope) -> Self {
        Node {
            envelope,
            parent: None,
            kind: NodeKind::Leaf(item),
        }
    }

    #[inline]
    pub fn internal(level: usize, children: Vec<NodeId>) -> Self {
        Node {
            envelope: Envelope::default(),
            parent: None,
            kind: NodeKind::Internal { children, level },
        }
    }

    /// Children of a directory node, empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Internal { children, .. } => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    #[inline]
    pub fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Internal { children, .. } => Some(children),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Level of a directory node, 0 for a leaf.
    #[inline]
    pub fn level(&self) -> usize {
        match &self.kind {
            NodeKind::Internal { level, .. } => *level,
            NodeKind::Leaf(_) => 0,
        }
    }

    #[inline]
    pub fn item(&self) -> Option<&G> {
        match &self.kind {
            NodeKind::Leaf(item) => Some(item),
            NodeKind::Internal { .. } => None,
        }
    }
}
