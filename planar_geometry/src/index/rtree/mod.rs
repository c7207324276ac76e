//! R-tree using Guttman's linear split.
mod linear_split;
pub(crate) mod node;

use self::{
    linear_split::linear_split,
    node::{Node, NodeKind},
};
use super::{
    arena::{Arena, NodeId},
    SpatialIndex, SpatialVisitor,
};
use crate::{
    core::{traits::ControlFlow, Control},
    error::{GeometryError, Result},
    geometry::{Envelope, Spatial},
};
use log::debug;

/// Dynamic R-tree over [Spatial] geometries.
///
/// Every directory node except the root holds between `min_children` and `max_children`
/// children and its envelope is the union of its children's envelopes. Overflowing nodes are
/// split with Guttman's linear cost heuristic, underflowing nodes are dissolved and their
/// geometries reinserted.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::index::*;
/// let mut tree = RTree::new(1, 3).unwrap();
/// for (x, y) in [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (5.0, 5.0)] {
///     tree.insert(Coordinate::new(x, y)).unwrap();
/// }
///
/// let found = tree.search(&Envelope::new(4.0, 4.0, 6.0, 6.0));
/// assert_eq!(found, vec![&Coordinate::new(5.0, 5.0)]);
/// assert!(tree.remove(&Coordinate::new(5.0, 5.0)));
/// assert!(tree.search(&Envelope::new(4.0, 4.0, 6.0, 6.0)).is_empty());
/// assert_eq!(tree.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RTree<G> {
    nodes: Arena<Node<G>>,
    root: NodeId,
    len: usize,
    min_children: usize,
    max_children: usize,
}

impl<G> Default for RTree<G> {
    /// Tree with 4 to 8 children per node.
    fn default() -> Self {
        RTree::with_bounds(4, 8)
    }
}

impl<G> RTree<G> {
    /// Create an empty tree, requires `1 <= min_children <= max_children / 2`.
    pub fn new(min_children: usize, max_children: usize) -> Result<Self> {
        if min_children < 1 || max_children < 2 || min_children > max_children / 2 {
            return Err(GeometryError::InvalidChildBounds {
                min: min_children,
                max: max_children,
            });
        }

        Ok(RTree::with_bounds(min_children, max_children))
    }

    fn with_bounds(min_children: usize, max_children: usize) -> Self {
        let mut nodes = Arena::default();
        let root = nodes.alloc(Node::internal(1, Vec::new()));
        RTree {
            nodes,
            root,
            len: 0,
            min_children,
            max_children,
        }
    }

    #[inline]
    pub fn min_children(&self) -> usize {
        self.min_children
    }

    #[inline]
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// Number of stored geometries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of directory levels, an empty tree has height 1.
    #[inline]
    pub fn height(&self) -> usize {
        self.nodes[self.root].level()
    }

    /// Envelope of everything stored, `None` if empty.
    #[inline]
    pub fn envelope(&self) -> Option<Envelope> {
        (self.len > 0).then(|| self.nodes[self.root].envelope)
    }

    /// Iterate over all stored geometries (in no particular order).
    pub fn iter(&self) -> impl Iterator<Item = &G> + '_ {
        self.nodes.iter().filter_map(|(_, node)| node.item())
    }

    pub fn clear(&mut self) {
        *self = RTree::with_bounds(self.min_children, self.max_children);
    }

    /// Visit the ids of all leaves whose envelope intersects `envelope`.
    fn visit_leaf_ids<C, F>(&self, envelope: &Envelope, mut visitor: F) -> C
    where
        C: ControlFlow,
        F: FnMut(NodeId) -> C,
    {
        if self.len == 0 {
            return C::continuing();
        }

        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            for &child_id in self.nodes[id].children() {
                let child = &self.nodes[child_id];
                if !child.envelope.intersects(envelope) {
                    continue;
                }
                match child.kind {
                    NodeKind::Leaf(_) => try_cf!(visitor(child_id)),
                    NodeKind::Internal { .. } => stack.push(child_id),
                }
            }
        }

        C::continuing()
    }

    /// All geometries whose envelope intersects `envelope` (touching counts).
    pub fn search(&self, envelope: &Envelope) -> Vec<&G> {
        let mut ids = Vec::new();
        self.visit_leaf_ids(envelope, |id| {
            ids.push(id);
            Control::<()>::Continue
        });
        ids.into_iter()
            .filter_map(|id| self.nodes[id].item())
            .collect()
    }

    /// Visit all geometries whose envelope intersects `envelope`, stops when the visitor breaks.
    pub fn visit_search<C, V>(&self, envelope: &Envelope, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SpatialVisitor<G, C>,
    {
        self.visit_leaf_ids(envelope, |id| match self.nodes[id].item() {
            Some(item) => visitor.visit(item),
            None => C::continuing(),
        })
    }

    /// Check the structural invariants of the tree.
    ///
    /// Fails with [GeometryError::CorruptIndex] if a parent link, level, child count or
    /// envelope is inconsistent, or if the number of reachable geometries differs from
    /// [RTree::len].
    pub fn validate_structure(&self) -> Result<()> {
        let corrupt = |msg: String| Err(GeometryError::CorruptIndex(msg));
        let root = &self.nodes[self.root];
        if root.parent.is_some() || root.level() == 0 {
            return corrupt(format!("root {} is not a parentless directory node", self.root));
        }
        if root.level() > 1 && root.children().len() < 2 {
            return corrupt(format!(
                "root at level {} has {} children",
                root.level(),
                root.children().len()
            ));
        }

        let mut leaf_count = 0;
        let mut node_count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            node_count += 1;
            let node = &self.nodes[id];
            let level = node.level();
            let children = node.children();
            let count = children.len();
            if count > self.max_children || (id != self.root && count < self.min_children) {
                return corrupt(format!(
                    "node {id} at level {level} has {count} children, bounds are [{}, {}]",
                    self.min_children, self.max_children
                ));
            }

            let mut union: Option<Envelope> = None;
            for &child_id in children {
                let Some(child) = self.nodes.get(child_id) else {
                    return corrupt(format!("node {id} references free slot {child_id}"));
                };
                if child.parent != Some(id) {
                    return corrupt(format!("node {child_id} does not link back to {id}"));
                }
                if child.level() + 1 != level {
                    return corrupt(format!(
                        "node {child_id} at level {} is a child of level {level}",
                        child.level()
                    ));
                }
                union = Some(union.map_or(child.envelope, |u| u.union(&child.envelope)));
                match child.kind {
                    NodeKind::Leaf(_) => leaf_count += 1,
                    NodeKind::Internal { .. } => stack.push(child_id),
                }
            }

            if let Some(union) = union {
                if union != node.envelope {
                    return corrupt(format!(
                        "node {id} envelope is not the union of its children"
                    ));
                }
            }
        }

        if leaf_count != self.len {
            return corrupt(format!(
                "{leaf_count} reachable geometries, expected {}",
                self.len
            ));
        }
        if node_count + leaf_count != self.nodes.live_count() {
            return corrupt(format!(
                "{} allocated nodes, {} reachable",
                self.nodes.live_count(),
                node_count + leaf_count
            ));
        }

        Ok(())
    }

    fn refresh_envelope(&mut self, id: NodeId) {
        let envelope = self.nodes[id]
            .children()
            .iter()
            .map(|&c| self.nodes[c].envelope)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        self.nodes[id].envelope = envelope;
    }

    fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        for &c in &children {
            self.nodes[c].parent = Some(id);
        }
        if let Some(slot) = self.nodes[id].children_mut() {
            *slot = children;
        }
        self.refresh_envelope(id);
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = Some(parent);
        if let Some(children) = self.nodes[parent].children_mut() {
            children.push(child);
        }
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent].children_mut() {
            children.retain(|&c| c != child);
        }
    }

    /// Directory node of level 1 that needs the least enlargement to hold `envelope`.
    fn choose_leaf_container(&self, envelope: &Envelope) -> NodeId {
        let mut current = self.root;
        while self.nodes[current].level() > 1 {
            let best = self.nodes[current].children().iter().copied().min_by(|&a, &b| {
                let ea = &self.nodes[a].envelope;
                let eb = &self.nodes[b].envelope;
                let ua = ea.union(envelope);
                let ub = eb.union(envelope);
                ea.enlargement(envelope)
                    .total_cmp(&eb.enlargement(envelope))
                    .then_with(|| ua.surface().total_cmp(&ub.surface()))
                    .then_with(|| ua.margin().total_cmp(&ub.margin()))
            });
            match best {
                Some(child) => current = child,
                None => break,
            }
        }

        current
    }

    fn insert_leaf(&mut self, leaf: NodeId) {
        let envelope = self.nodes[leaf].envelope;
        let container = self.choose_leaf_container(&envelope);
        self.attach(container, leaf);
        self.adjust_tree(container);
    }

    /// Split overflowing nodes and tighten envelopes from `start` up to the root.
    fn adjust_tree(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            if self.nodes[current].children().len() > self.max_children {
                let sibling = self.split(current);
                match self.nodes[current].parent {
                    Some(parent) => self.attach(parent, sibling),
                    None => {
                        self.grow_root(current, sibling);
                        return;
                    }
                }
            } else {
                self.refresh_envelope(current);
            }

            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return,
            }
        }
    }

    /// Move part of the children of `id` into a new sibling node, returns the sibling.
    fn split(&mut self, id: NodeId) -> NodeId {
        let children = self.nodes[id].children().to_vec();
        let envelopes: Vec<Envelope> = children.iter().map(|&c| self.nodes[c].envelope).collect();
        let (keep, moved) = linear_split(&envelopes, self.min_children);
        let level = self.nodes[id].level();
        let sibling = self.nodes.alloc(Node::internal(level, Vec::new()));
        debug!(
            "split level {} node into {} and {} children",
            level,
            keep.len(),
            moved.len()
        );
        self.set_children(id, keep.into_iter().map(|i| children[i]).collect());
        self.set_children(sibling, moved.into_iter().map(|i| children[i]).collect());
        sibling
    }

    fn grow_root(&mut self, old_root: NodeId, sibling: NodeId) {
        let level = self.nodes[old_root].level() + 1;
        let root = self.nodes.alloc(Node::internal(level, Vec::new()));
        self.set_children(root, vec![old_root, sibling]);
        self.root = root;
        debug!("root split, height is now {}", level);
    }

    /// Remove a leaf node and rebalance, returns the geometry it held.
    fn remove_leaf(&mut self, leaf: NodeId) -> Option<G>
    where
        G: Spatial,
    {
        let parent = self.nodes[leaf].parent;
        let node = self.nodes.take(leaf);
        self.len -= 1;
        if let Some(parent) = parent {
            self.detach(parent, leaf);
            self.condense_tree(parent);
        }

        match node.kind {
            NodeKind::Leaf(item) => Some(item),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Dissolve underflowing nodes on the path from `start` to the root, tighten the remaining
    /// envelopes, collapse the root and reinsert the geometries of the dissolved nodes.
    fn condense_tree(&mut self, start: NodeId)
    where
        G: Spatial,
    {
        let mut orphans = Vec::new();
        let mut current = start;
        while let Some(parent) = self.nodes[current].parent {
            if self.nodes[current].children().len() < self.min_children {
                self.detach(parent, current);
                self.take_subtree(current, &mut orphans);
            } else {
                self.refresh_envelope(current);
            }
            current = parent;
        }

        self.refresh_envelope(self.root);
        self.shrink_root();

        if !orphans.is_empty() {
            debug!("reinserting {} geometries of dissolved nodes", orphans.len());
        }
        for item in orphans {
            let envelope = item.envelope();
            let leaf = self.nodes.alloc(Node::leaf(item, envelope));
            self.insert_leaf(leaf);
        }
    }

    /// Free the subtree at `id`, collecting its geometries.
    fn take_subtree(&mut self, id: NodeId, out: &mut Vec<G>) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            match self.nodes.take(id).kind {
                NodeKind::Leaf(item) => out.push(item),
                NodeKind::Internal { children, .. } => stack.extend(children),
            }
        }
    }

    /// Replace a root with a single child by that child, repeatedly.
    fn shrink_root(&mut self) {
        loop {
            let root = &self.nodes[self.root];
            let level = root.level();
            if level <= 1 {
                return;
            }

            match *root.children().to_vec() {
                [] => {
                    self.nodes[self.root].kind = NodeKind::Internal {
                        children: Vec::new(),
                        level: 1,
                    };
                    return;
                }
                [only] => {
                    self.nodes.take(self.root);
                    self.nodes[only].parent = None;
                    self.root = only;
                    debug!("collapsed root, height is now {}", level - 1);
                }
                _ => return,
            }
        }
    }
}

impl<G> RTree<G>
where
    G: Spatial + PartialEq,
{
    /// Insert a geometry.
    ///
    /// Fails with [GeometryError::InvalidEnvelope] (leaving the tree unchanged) if the
    /// geometry's envelope has a NaN or infinite component.
    pub fn insert(&mut self, item: G) -> Result<()> {
        let envelope = item.envelope();
        if !envelope.is_valid() {
            return Err(GeometryError::InvalidEnvelope);
        }

        let leaf = self.nodes.alloc(Node::leaf(item, envelope));
        self.insert_leaf(leaf);
        self.len += 1;
        Ok(())
    }

    /// Leaf holding a geometry equal to `item`, only descends into nodes whose envelope contains
    /// the envelope of `item`.
    fn find_leaf(&self, item: &G) -> Option<NodeId> {
        if self.len == 0 {
            return None;
        }

        let envelope = item.envelope();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            for &child_id in self.nodes[id].children() {
                let child = &self.nodes[child_id];
                if !child.envelope.contains(&envelope) {
                    continue;
                }
                match &child.kind {
                    NodeKind::Leaf(stored) if stored == item => return Some(child_id),
                    NodeKind::Leaf(_) => {}
                    NodeKind::Internal { .. } => stack.push(child_id),
                }
            }
        }

        None
    }

    #[inline]
    pub fn contains(&self, item: &G) -> bool {
        self.find_leaf(item).is_some()
    }

    /// Remove one geometry equal to `item`, returns `true` if one was found.
    pub fn remove(&mut self, item: &G) -> bool {
        match self.find_leaf(item) {
            Some(leaf) => self.remove_leaf(leaf).is_some(),
            None => false,
        }
    }

    /// Remove every geometry whose envelope intersects `envelope`.
    pub fn remove_in(&mut self, envelope: &Envelope) -> Vec<G> {
        let mut removed = Vec::new();
        loop {
            let next = self.visit_leaf_ids(envelope, Control::Break);
            let Control::Break(leaf) = next else {
                break;
            };
            match self.remove_leaf(leaf) {
                Some(item) => removed.push(item),
                None => break,
            }
        }

        if !removed.is_empty() {
            debug!("removed {} geometries in {:?}", removed.len(), envelope);
        }
        removed
    }
}

impl<G> SpatialIndex<G> for RTree<G>
where
    G: Spatial + PartialEq,
{
    #[inline]
    fn insert(&mut self, item: G) -> Result<()> {
        RTree::insert(self, item)
    }

    #[inline]
    fn search(&self, envelope: &Envelope) -> Vec<&G> {
        RTree::search(self, envelope)
    }

    #[inline]
    fn contains(&self, item: &G) -> bool {
        RTree::contains(self, item)
    }

    #[inline]
    fn remove(&mut self, item: &G) -> bool {
        RTree::remove(self, item)
    }

    #[inline]
    fn remove_in(&mut self, envelope: &Envelope) -> Vec<G> {
        RTree::remove_in(self, envelope)
    }

    #[inline]
    fn clear(&mut self) {
        RTree::clear(self)
    }

    #[inline]
    fn len(&self) -> usize {
        RTree::len(self)
    }
}
