//! Hilbert R-tree: an R-tree whose nodes are ordered by the Hilbert rank of their geometries.
mod encoder;

pub use encoder::{HilbertEncoder, SpaceFillingCurveEncoder};

use super::{
    arena::{Arena, NodeId},
    rtree::node::{Node, NodeKind},
    SpatialIndex, SpatialVisitor,
};
use crate::{
    core::{traits::ControlFlow, Control},
    error::{GeometryError, Result},
    geometry::{Envelope, Spatial},
};
use log::debug;
use std::iter;

#[derive(Debug, Clone)]
struct HilbertNode<G> {
    node: Node<G>,
    /// Largest Hilbert value of the subtree, the rank of the geometry for a leaf.
    lhv: u128,
    /// Node holds fewer than the minimum number of children since a root split.
    relaxed: bool,
}

impl<G> HilbertNode<G> {
    #[inline]
    fn directory(level: usize) -> Self {
        HilbertNode {
            node: Node::internal(level, Vec::new()),
            lhv: 0,
            relaxed: false,
        }
    }
}

/// Dynamic Hilbert R-tree over [Spatial] geometries.
///
/// Every geometry is ranked by a [SpaceFillingCurveEncoder] (a [HilbertEncoder] by default)
/// applied to its [Spatial::representative_coordinate]. Directory nodes keep their children
/// sorted by largest Hilbert value (LHV). Insertion descends to the first child whose LHV is not
/// less than the new rank, overflow is absorbed by redistributing children with an adjacent
/// sibling, a new node is only created when the sibling is full too (2 to 3 split). Underflow
/// borrows from a sibling with spare children or merges into the two nearest siblings.
///
/// `max_children` must be a multiple of 3, every non-root node holds at least
/// `min_children = 2 * max_children / 3` children. The two halves of a root split cannot reach
/// that, they are relaxed to `(max_children + 1) / 2` children until they fill up.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::index::*;
/// let mut tree = HilbertRTree::new(3).unwrap();
/// for i in 0..10 {
///     tree.insert(Coordinate::new(i as f64, 0.0)).unwrap();
/// }
///
/// assert_eq!(tree.search(&Envelope::new(2.0, -1.0, 4.0, 1.0)).len(), 3);
/// assert!(tree.height() > 1);
/// assert!(HilbertRTree::<Coordinate>::new(4).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct HilbertRTree<G, E = HilbertEncoder> {
    nodes: Arena<HilbertNode<G>>,
    root: NodeId,
    len: usize,
    min_children: usize,
    max_children: usize,
    encoder: E,
}

impl<G> Default for HilbertRTree<G, HilbertEncoder> {
    /// Tree with up to 12 children per node and a planar [HilbertEncoder].
    fn default() -> Self {
        HilbertRTree::with_capacity_unchecked(12, HilbertEncoder::default())
    }
}

impl<G> HilbertRTree<G, HilbertEncoder> {
    /// Create an empty tree ranking geometries with the default planar [HilbertEncoder].
    pub fn new(max_children: usize) -> Result<Self> {
        HilbertRTree::with_encoder(max_children, HilbertEncoder::default())
    }
}

impl<G, E> HilbertRTree<G, E> {
    /// Create an empty tree ranking geometries with `encoder`, `max_children` must be a
    /// positive multiple of 3.
    pub fn with_encoder(max_children: usize, encoder: E) -> Result<Self> {
        if max_children == 0 || max_children % 3 != 0 {
            return Err(GeometryError::HilbertMaxChildren { max: max_children });
        }

        Ok(HilbertRTree::with_capacity_unchecked(max_children, encoder))
    }

    fn with_capacity_unchecked(max_children: usize, encoder: E) -> Self {
        let mut nodes = Arena::default();
        let root = nodes.alloc(HilbertNode::directory(1));
        HilbertRTree {
            nodes,
            root,
            len: 0,
            min_children: 2 * max_children / 3,
            max_children,
            encoder,
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

    /// Fewest children node `id` may hold when it is not the root.
    #[inline]
    fn min_fill(&self, id: NodeId) -> usize {
        if self.nodes[id].relaxed {
            (self.max_children + 1) / 2
        } else {
            self.min_children
        }
    }

    #[inline]
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

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
        self.nodes[self.root].node.level()
    }

    /// Envelope of everything stored, `None` if empty.
    #[inline]
    pub fn envelope(&self) -> Option<Envelope> {
        (self.len > 0).then(|| self.nodes[self.root].node.envelope)
    }

    /// Iterate over all stored geometries (in no particular order).
    pub fn iter(&self) -> impl Iterator<Item = &G> + '_ {
        self.nodes.iter().filter_map(|(_, n)| n.node.item())
    }

    /// Iterate over all stored geometries in ascending Hilbert rank.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &G> + '_ {
        let mut stack = vec![self.root];
        iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                let node = &self.nodes[id].node;
                match &node.kind {
                    NodeKind::Leaf(item) => return Some(item),
                    NodeKind::Internal { children, .. } => stack.extend(children.iter().rev()),
                }
            }
            None
        })
    }

    pub fn clear(&mut self) {
        let mut nodes = Arena::default();
        self.root = nodes.alloc(HilbertNode::directory(1));
        self.nodes = nodes;
        self.len = 0;
    }

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
            for &child_id in self.nodes[id].node.children() {
                let child = &self.nodes[child_id].node;
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
            .filter_map(|id| self.nodes[id].node.item())
            .collect()
    }

    /// Visit all geometries whose envelope intersects `envelope`, stops when the visitor breaks.
    pub fn visit_search<C, V>(&self, envelope: &Envelope, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SpatialVisitor<G, C>,
    {
        self.visit_leaf_ids(envelope, |id| match self.nodes[id].node.item() {
            Some(item) => visitor.visit(item),
            None => C::continuing(),
        })
    }

    /// Sort the children of `id` by LHV and recompute its envelope and LHV.
    fn refresh(&mut self, id: NodeId) {
        let filled = self.child_count(id) >= self.min_children;
        let mut children = self.nodes[id].node.children().to_vec();
        children.sort_by_key(|&c| self.nodes[c].lhv);
        let envelope = children
            .iter()
            .map(|&c| self.nodes[c].node.envelope)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let lhv = children
            .iter()
            .map(|&c| self.nodes[c].lhv)
            .max()
            .unwrap_or(0);

        let target = &mut self.nodes[id];
        if let Some(slot) = target.node.children_mut() {
            *slot = children;
        }
        target.node.envelope = envelope;
        target.lhv = lhv;
        if filled {
            target.relaxed = false;
        }
    }

    fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        for &c in &children {
            self.nodes[c].node.parent = Some(id);
        }
        if let Some(slot) = self.nodes[id].node.children_mut() {
            *slot = children;
        }
        self.refresh(id);
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].node.parent = Some(parent);
        if let Some(children) = self.nodes[parent].node.children_mut() {
            children.push(child);
        }
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent].node.children_mut() {
            children.retain(|&c| c != child);
        }
    }

    /// Immediate left and right siblings of `id` under `parent`.
    fn neighbours(&self, parent: NodeId, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let siblings = self.nodes[parent].node.children();
        let pos = siblings.iter().position(|&c| c == id);
        debug_assert!(pos.is_some(), "node {id} missing from its parent {parent}");
        match pos {
            Some(pos) => (
                pos.checked_sub(1).map(|i| siblings[i]),
                siblings.get(pos + 1).copied(),
            ),
            None => (None, None),
        }
    }

    #[inline]
    fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id].node.children().len()
    }

    /// Spread `items` and the children of `group` over `group` in LHV order, see [fill_sizes].
    /// A node left with fewer than `min_children` is marked relaxed.
    fn redistribute(&mut self, group: &[NodeId], mut items: Vec<NodeId>) {
        for &g in group {
            items.extend_from_slice(self.nodes[g].node.children());
        }
        items.sort_by_key(|&c| self.nodes[c].lhv);

        let floors: Vec<usize> = group.iter().map(|&g| self.min_fill(g)).collect();
        let sizes = fill_sizes(items.len(), &floors, self.max_children);
        let mut rest = items.into_iter();
        for (&g, size) in group.iter().zip(sizes) {
            let chunk: Vec<NodeId> = rest.by_ref().take(size).collect();
            self.set_children(g, chunk);
            self.nodes[g].relaxed = size < self.min_children;
        }
    }

    fn choose_leaf_container(&self, rank: u128) -> NodeId {
        let mut current = self.root;
        while self.nodes[current].node.level() > 1 {
            let children = self.nodes[current].node.children();
            let next = children
                .iter()
                .find(|&&c| self.nodes[c].lhv >= rank)
                .or_else(|| children.last());
            match next {
                Some(&child) => current = child,
                None => break,
            }
        }

        current
    }

    fn insert_leaf(&mut self, leaf: NodeId) {
        let container = self.choose_leaf_container(self.nodes[leaf].lhv);
        self.attach(container, leaf);
        self.handle_overflow(container);
    }

    /// Resolve overflowing nodes and refresh LHVs and envelopes from `start` up to the root.
    fn handle_overflow(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            let parent = self.nodes[current].node.parent;
            if self.child_count(current) > self.max_children {
                match parent {
                    Some(parent) => self.share_overflow(parent, current),
                    None => {
                        self.split_root();
                        return;
                    }
                }
            } else {
                self.refresh(current);
            }

            match parent {
                Some(parent) => current = parent,
                None => return,
            }
        }
    }

    /// Redistribute the children of an overflowing node with a sibling that has room (right
    /// sibling first), or over the node, a sibling and a new node.
    fn share_overflow(&mut self, parent: NodeId, id: NodeId) {
        let (left, right) = self.neighbours(parent, id);
        let has_room = |s: &NodeId| self.child_count(*s) < self.max_children;
        let right_room = right.filter(has_room);
        let left_room = left.filter(has_room);

        let group = match (right_room, left_room) {
            (Some(r), _) => vec![id, r],
            (None, Some(l)) => vec![l, id],
            (None, None) => {
                let level = self.nodes[id].node.level();
                let fresh = self.nodes.alloc(HilbertNode::directory(level));
                self.attach(parent, fresh);
                debug!("created level {} node for overflow", level);
                match (right, left) {
                    (Some(r), _) => vec![id, r, fresh],
                    (None, Some(l)) => vec![l, id, fresh],
                    (None, None) => vec![id, fresh],
                }
            }
        };

        debug!("redistributing overflow over {} nodes", group.len());
        self.redistribute(&group, Vec::new());
    }

    fn split_root(&mut self) {
        let old_root = self.root;
        let level = self.nodes[old_root].node.level();
        let sibling = self.nodes.alloc(HilbertNode::directory(level));
        self.redistribute(&[old_root, sibling], Vec::new());
        let root = self.nodes.alloc(HilbertNode::directory(level + 1));
        self.set_children(root, vec![old_root, sibling]);
        self.root = root;
        debug!("root split, height is now {}", level + 1);
    }

    fn remove_leaf(&mut self, leaf: NodeId) -> Option<G> {
        let parent = self.nodes[leaf].node.parent;
        let removed = self.nodes.take(leaf);
        self.len -= 1;
        if let Some(parent) = parent {
            self.detach(parent, leaf);
            self.handle_underflow(parent);
        }

        match removed.node.kind {
            NodeKind::Leaf(item) => Some(item),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Resolve underflowing nodes and refresh LHVs and envelopes from `start` up to the root.
    fn handle_underflow(&mut self, start: NodeId) {
        let mut current = start;
        while let Some(parent) = self.nodes[current].node.parent {
            if self.child_count(current) < self.min_fill(current) {
                self.resolve_underflow(parent, current);
            } else {
                self.refresh(current);
            }
            current = parent;
        }

        self.refresh(self.root);
        self.shrink_root();
    }

    /// Borrow children from a sibling with spare children (right sibling first), otherwise merge
    /// the node into its two nearest siblings.
    fn resolve_underflow(&mut self, parent: NodeId, id: NodeId) {
        let (left, right) = self.neighbours(parent, id);
        let has_spare = |s: &NodeId| self.child_count(*s) > self.min_fill(*s);
        if let Some(donor) = right.filter(has_spare) {
            debug!("borrowing children from right sibling");
            self.redistribute(&[id, donor], Vec::new());
            return;
        }
        if let Some(donor) = left.filter(has_spare) {
            debug!("borrowing children from left sibling");
            self.redistribute(&[donor, id], Vec::new());
            return;
        }

        let group = self.underflow_group(parent, id);
        let siblings: Vec<NodeId> = group.iter().copied().filter(|&s| s != id).collect();
        if siblings.is_empty() {
            if self.child_count(id) == 0 {
                self.detach(parent, id);
                self.nodes.take(id);
            } else {
                self.refresh(id);
            }
            return;
        }

        let total: usize = group.iter().map(|&g| self.child_count(g)).sum();
        let need: usize = group.iter().map(|&g| self.min_fill(g)).sum();
        if total >= need {
            // the second sibling on one side has spare children
            debug!("borrowing children through {} siblings", siblings.len());
            self.redistribute(&group, Vec::new());
        } else if total <= siblings.len() * self.max_children {
            let orphans = self.nodes[id].node.children().to_vec();
            self.redistribute(&siblings, orphans);
            self.detach(parent, id);
            self.nodes.take(id);
            debug!("merged underflowing node into {} siblings", siblings.len());
        } else {
            // only one sibling, both keep at least half of a full node
            debug!("spreading underflowing node over {} nodes", group.len());
            self.redistribute(&group, Vec::new());
        }
    }

    /// `id` with up to two nearest siblings, contiguous in the parent's child order.
    fn underflow_group(&self, parent: NodeId, id: NodeId) -> Vec<NodeId> {
        let siblings = self.nodes[parent].node.children();
        let Some(pos) = siblings.iter().position(|&c| c == id) else {
            return vec![id];
        };
        let start = pos.saturating_sub(1).min(siblings.len().saturating_sub(3));
        let end = (start + 3).min(siblings.len());
        siblings[start..end].to_vec()
    }

    /// Replace a root with a single child by that child, repeatedly.
    fn shrink_root(&mut self) {
        loop {
            let root = &self.nodes[self.root].node;
            let level = root.level();
            if level <= 1 {
                return;
            }

            match *root.children().to_vec() {
                [] => {
                    self.nodes[self.root] = HilbertNode::directory(1);
                    return;
                }
                [only] => {
                    self.nodes.take(self.root);
                    self.nodes[only].node.parent = None;
                    self.root = only;
                    debug!("collapsed root, height is now {}", level - 1);
                }
                _ => return,
            }
        }
    }
}

impl<G, E> HilbertRTree<G, E>
where
    G: Spatial + PartialEq,
    E: SpaceFillingCurveEncoder,
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

        let lhv = self.encoder.encode(&item.representative_coordinate());
        let leaf = self.nodes.alloc(HilbertNode {
            node: Node::leaf(item, envelope),
            lhv,
            relaxed: false,
        });
        self.insert_leaf(leaf);
        self.len += 1;
        Ok(())
    }

    fn find_leaf(&self, item: &G) -> Option<NodeId> {
        if self.len == 0 {
            return None;
        }

        let envelope = item.envelope();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            for &child_id in self.nodes[id].node.children() {
                let child = &self.nodes[child_id].node;
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
            let Control::Break(leaf) = self.visit_leaf_ids(envelope, Control::Break) else {
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

    /// Check the structural invariants of the tree.
    ///
    /// Fails with [GeometryError::CorruptIndex] if a parent link, level, child count, child
    /// order, LHV or envelope is inconsistent, or if the number of reachable geometries differs
    /// from [HilbertRTree::len].
    pub fn validate_structure(&self) -> Result<()> {
        let corrupt = |msg: String| Err(GeometryError::CorruptIndex(msg));
        let root = &self.nodes[self.root].node;
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
            let HilbertNode { node, lhv, .. } = &self.nodes[id];
            let level = node.level();
            let children = node.children();
            let count = children.len();
            let min = if id == self.root { 0 } else { self.min_fill(id) };
            if count > self.max_children || count < min {
                return corrupt(format!(
                    "node {id} at level {level} has {count} children, allowed {min} to {}",
                    self.max_children
                ));
            }

            let mut union: Option<Envelope> = None;
            let mut previous_lhv = 0;
            for &child_id in children {
                let Some(child) = self.nodes.get(child_id) else {
                    return corrupt(format!("node {id} references free slot {child_id}"));
                };
                if child.node.parent != Some(id) {
                    return corrupt(format!("node {child_id} does not link back to {id}"));
                }
                if child.node.level() + 1 != level {
                    return corrupt(format!(
                        "node {child_id} at level {} is a child of level {level}",
                        child.node.level()
                    ));
                }
                if child.lhv < previous_lhv {
                    return corrupt(format!("children of node {id} are not sorted by LHV"));
                }
                previous_lhv = child.lhv;
                union = Some(union.map_or(child.node.envelope, |u| u.union(&child.node.envelope)));
                match &child.node.kind {
                    NodeKind::Leaf(item) => {
                        if child.lhv != self.encoder.encode(&item.representative_coordinate()) {
                            return corrupt(format!("leaf {child_id} has a stale Hilbert rank"));
                        }
                        leaf_count += 1;
                    }
                    NodeKind::Internal { .. } => stack.push(child_id),
                }
            }

            if let Some(union) = union {
                if union != node.envelope {
                    return corrupt(format!(
                        "node {id} envelope is not the union of its children"
                    ));
                }
                if previous_lhv != *lhv {
                    return corrupt(format!("node {id} LHV is not its largest child LHV"));
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
}

/// Chunk sizes for `n` items over nodes with minimum fills `floors`.
///
/// Every node gets its minimum first, the remainder is dealt out one at a time up to `max`. When
/// the minimums cannot all be met the items are split evenly.
fn fill_sizes(n: usize, floors: &[usize], max: usize) -> Vec<usize> {
    let k = floors.len();
    if k == 0 {
        return Vec::new();
    }

    let need: usize = floors.iter().sum();
    if n < need {
        return (0..k).map(|i| n / k + usize::from(i < n % k)).collect();
    }

    let mut sizes = floors.to_vec();
    let mut extra = n - need;
    while extra > 0 {
        let before = extra;
        for size in sizes.iter_mut() {
            if extra > 0 && *size < max {
                *size += 1;
                extra -= 1;
            }
        }
        debug_assert!(extra < before, "{n} items do not fit in {k} nodes");
        if extra == before {
            if let Some(last) = sizes.last_mut() {
                *last += extra;
            }
            break;
        }
    }

    sizes
}

impl<G, E> SpatialIndex<G> for HilbertRTree<G, E>
where
    G: Spatial + PartialEq,
    E: SpaceFillingCurveEncoder,
{
    #[inline]
    fn insert(&mut self, item: G) -> Result<()> {
        HilbertRTree::insert(self, item)
    }

    #[inline]
    fn search(&self, envelope: &Envelope) -> Vec<&G> {
        HilbertRTree::search(self, envelope)
    }

    #[inline]
    fn contains(&self, item: &G) -> bool {
        HilbertRTree::contains(self, item)
    }

    #[inline]
    fn remove(&mut self, item: &G) -> bool {
        HilbertRTree::remove(self, item)
    }

    #[inline]
    fn remove_in(&mut self, envelope: &Envelope) -> Vec<G> {
        HilbertRTree::remove_in(self, envelope)
    }

    #[inline]
    fn clear(&mut self) {
        HilbertRTree::clear(self)
    }

    #[inline]
    fn len(&self) -> usize {
        HilbertRTree::len(self)
    }
}
