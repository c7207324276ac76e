//! K-d tree over bare coordinates.
use super::SpatialVisitor;
use crate::{
    core::traits::ControlFlow,
    error::{GeometryError, Result},
    geometry::{Coordinate, Envelope},
};
use log::debug;
use std::{fmt, iter};

struct KdNode {
    coordinate: Coordinate,
    /// Coordinates strictly less than `coordinate` along the split axis.
    left: Option<Box<KdNode>>,
    /// Coordinates greater than or equal to `coordinate` along the split axis.
    right: Option<Box<KdNode>>,
}

impl KdNode {
    #[inline]
    fn new(coordinate: Coordinate) -> Self {
        KdNode {
            coordinate,
            left: None,
            right: None,
        }
    }
}

/// K-d tree over 2D or 3D coordinates.
///
/// The split axis cycles with depth (x, y, then z for 3 dimensions). Construction and
/// [KdTree::rebalance_tree] split at the median. [KdTree::add] does not rebalance, skewed
/// insertion order degrades the tree towards a linked list until `rebalance_tree` is called.
///
/// A 2 dimensional tree ignores the z component of coordinates and envelopes.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::index::*;
/// let coords: Vec<Coordinate> = (0..10)
///     .map(|i| Coordinate::new(i as f64, (i * 3 % 10) as f64))
///     .collect();
/// let mut tree = KdTree::new(&coords, 2).unwrap();
/// assert_eq!(tree.search(&Envelope::new(0.0, 0.0, 2.0, 9.0)).len(), 3);
/// assert_eq!(tree.search_nearest(&Coordinate::new(4.2, 1.9)), Some(Coordinate::new(4.0, 2.0)));
///
/// tree.add(Coordinate::new(20.0, 20.0)).unwrap();
/// assert!(tree.remove(&Coordinate::new(4.0, 2.0)));
/// assert!(!tree.contains(&Coordinate::new(4.0, 2.0)));
/// assert_eq!(tree.len(), 10);
/// ```
///
/// Every traversal (search, nearest, clone and drop) uses an explicit stack, a tree degraded by
/// skewed adds does not overflow the call stack.
pub struct KdTree {
    root: Option<Box<KdNode>>,
    dimension: usize,
    len: usize,
}

impl KdTree {
    /// Build a balanced tree over `coordinates`, `dimension` must be 2 or 3.
    pub fn new(coordinates: &[Coordinate], dimension: usize) -> Result<Self> {
        if dimension != 2 && dimension != 3 {
            return Err(GeometryError::InvalidDimension { dimension });
        }
        if !coordinates.iter().all(Coordinate::is_valid) {
            return Err(GeometryError::InvalidCoordinate);
        }

        Ok(KdTree {
            root: build(coordinates.to_vec(), 0, dimension),
            dimension,
            len: coordinates.len(),
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes on the longest root to leaf path, 0 if empty.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&KdNode, usize)> = self.root.iter().map(|n| (&**n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.left.iter().map(|n| (&**n, depth + 1)));
            stack.extend(node.right.iter().map(|n| (&**n, depth + 1)));
        }

        max_depth
    }

    pub fn clear(&mut self) {
        drain_nodes(self.root.take(), |_| {});
        self.len = 0;
    }

    /// Iterate over all coordinates in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        let mut stack: Vec<&KdNode> = self.root.iter().map(|n| &**n).collect();
        iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
            Some(&node.coordinate)
        })
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.iter().copied().collect()
    }

    #[inline]
    fn same(&self, a: &Coordinate, b: &Coordinate) -> bool {
        (0..self.dimension).all(|i| a.get(i) == b.get(i))
    }

    #[inline]
    fn in_envelope(&self, envelope: &Envelope, c: &Coordinate) -> bool {
        (0..self.dimension).all(|i| envelope.min(i) <= c.get(i) && c.get(i) <= envelope.max(i))
    }

    /// Add a coordinate without rebalancing.
    pub fn add(&mut self, c: Coordinate) -> Result<()> {
        if !c.is_valid() {
            return Err(GeometryError::InvalidCoordinate);
        }

        let mut slot = &mut self.root;
        let mut depth = 0;
        while let Some(node) = slot {
            let axis = depth % self.dimension;
            slot = if c.get(axis) < node.coordinate.get(axis) {
                &mut node.left
            } else {
                &mut node.right
            };
            depth += 1;
        }

        *slot = Some(Box::new(KdNode::new(c)));
        self.len += 1;
        Ok(())
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        let mut current = self.root.as_deref();
        let mut depth = 0;
        while let Some(node) = current {
            if self.same(&node.coordinate, c) {
                return true;
            }
            let axis = depth % self.dimension;
            current = if c.get(axis) < node.coordinate.get(axis) {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
            depth += 1;
        }

        false
    }

    /// Remove one coordinate equal to `c`, returns `true` if one was found.
    ///
    /// The subtree below the removed node is rebuilt around its median.
    pub fn remove(&mut self, c: &Coordinate) -> bool {
        let dimension = self.dimension;
        let mut slot = &mut self.root;
        let mut depth = 0;
        loop {
            let go_left = match slot.as_deref() {
                None => return false,
                Some(node) if (0..dimension).all(|i| node.coordinate.get(i) == c.get(i)) => break,
                Some(node) => {
                    let axis = depth % dimension;
                    c.get(axis) < node.coordinate.get(axis)
                }
            };
            slot = match slot {
                Some(node) => {
                    if go_left {
                        &mut node.left
                    } else {
                        &mut node.right
                    }
                }
                None => return false,
            };
            depth += 1;
        }

        if let Some(node) = slot.take() {
            let mut rest = Vec::new();
            drain_nodes(node.left, |c| rest.push(c));
            drain_nodes(node.right, |c| rest.push(c));
            *slot = build(rest, depth, dimension);
        }
        self.len -= 1;
        true
    }

    /// All coordinates inside `envelope` (boundaries inclusive).
    pub fn search(&self, envelope: &Envelope) -> Vec<Coordinate> {
        let mut result = Vec::new();
        self.visit_search(envelope, &mut |c: &Coordinate| result.push(*c));
        result
    }

    /// Visit all coordinates inside `envelope` (boundaries inclusive), stops when the visitor
    /// breaks.
    pub fn visit_search<C, V>(&self, envelope: &Envelope, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SpatialVisitor<Coordinate, C>,
    {
        let mut stack: Vec<(&KdNode, usize)> = self.root.iter().map(|n| (&**n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            if self.in_envelope(envelope, &node.coordinate) {
                try_cf!(visitor.visit(&node.coordinate));
            }

            let axis = depth % self.dimension;
            let v = node.coordinate.get(axis);
            if let Some(left) = node.left.as_deref() {
                if envelope.min(axis) < v {
                    stack.push((left, depth + 1));
                }
            }
            if let Some(right) = node.right.as_deref() {
                if envelope.max(axis) >= v {
                    stack.push((right, depth + 1));
                }
            }
        }

        C::continuing()
    }

    /// Stored coordinate closest to `c`, `None` if the tree is empty or `c` is not valid.
    pub fn search_nearest(&self, c: &Coordinate) -> Option<Coordinate> {
        if !c.is_valid() {
            return None;
        }

        let mut best: Option<(f64, Coordinate)> = None;
        // (node, depth, squared distance from `c` to the split plane bounding the node's side)
        let mut stack: Vec<(&KdNode, usize, f64)> =
            self.root.iter().map(|n| (&**n, 0, 0.0)).collect();
        while let Some((node, depth, plane_distance)) = stack.pop() {
            if best.map_or(false, |(d, _)| plane_distance >= d) {
                continue;
            }

            let distance = node.coordinate.distance_squared_in(c, self.dimension);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, node.coordinate));
            }

            let axis = depth % self.dimension;
            let offset = c.get(axis) - node.coordinate.get(axis);
            let (near, far) = if offset < 0.0 {
                (&node.left, &node.right)
            } else {
                (&node.right, &node.left)
            };

            // far side pushed first so the near side is searched first
            if let Some(far) = far.as_deref() {
                stack.push((far, depth + 1, offset * offset));
            }
            if let Some(near) = near.as_deref() {
                stack.push((near, depth + 1, plane_distance));
            }
        }

        best.map(|(_, coordinate)| coordinate)
    }

    /// Rebuild the whole tree around medians.
    pub fn rebalance_tree(&mut self) {
        let before = self.depth();
        let mut all = Vec::with_capacity(self.len);
        drain_nodes(self.root.take(), |c| all.push(c));
        self.root = build(all, 0, self.dimension);
        debug!(
            "rebalanced {} coordinates, depth {} -> {}",
            self.len,
            before,
            self.depth()
        );
    }

    /// Check that every coordinate lies on the correct side of all its ancestors' split planes
    /// and that [KdTree::len] matches the node count.
    pub fn validate_structure(&self) -> Result<()> {
        let mut count = 0;
        let mut stack: Vec<(&KdNode, usize, [f64; 3], [f64; 3])> = self
            .root
            .iter()
            .map(|n| (&**n, 0, [f64::NEG_INFINITY; 3], [f64::INFINITY; 3]))
            .collect();
        while let Some((node, depth, low, high)) = stack.pop() {
            count += 1;
            let c = &node.coordinate;
            for i in 0..self.dimension {
                if !(low[i] <= c.get(i) && c.get(i) < high[i]) {
                    return Err(GeometryError::CorruptIndex(format!(
                        "{c} at depth {depth} is outside its split bounds on axis {i}"
                    )));
                }
            }

            let axis = depth % self.dimension;
            let v = c.get(axis);
            if let Some(left) = node.left.as_deref() {
                let mut h = high;
                h[axis] = v;
                stack.push((left, depth + 1, low, h));
            }
            if let Some(right) = node.right.as_deref() {
                let mut l = low;
                l[axis] = v;
                stack.push((right, depth + 1, l, high));
            }
        }

        if count != self.len {
            return Err(GeometryError::CorruptIndex(format!(
                "{count} reachable coordinates, expected {}",
                self.len
            )));
        }

        Ok(())
    }
}

/// Median split build, every coordinate left of the median is strictly less along the axis.
fn build(mut points: Vec<Coordinate>, depth: usize, dimension: usize) -> Option<Box<KdNode>> {
    if points.is_empty() {
        return None;
    }

    let axis = depth % dimension;
    points.sort_by(|a, b| a.get(axis).total_cmp(&b.get(axis)));
    let median = points[points.len() / 2].get(axis);
    // first of the run equal to the median value
    let mid = points.partition_point(|c| c.get(axis) < median);
    let right = points.split_off(mid + 1);
    let coordinate = points.pop()?;

    Some(Box::new(KdNode {
        coordinate,
        left: build(points, depth + 1, dimension),
        right: build(right, depth + 1, dimension),
    }))
}

/// Consume a subtree node by node, passing each coordinate to `f`.
fn drain_nodes(node: Option<Box<KdNode>>, mut f: impl FnMut(Coordinate)) {
    let mut stack: Vec<Box<KdNode>> = node.into_iter().collect();
    while let Some(node) = stack.pop() {
        let KdNode {
            coordinate,
            left,
            right,
        } = *node;
        f(coordinate);
        stack.extend(left);
        stack.extend(right);
    }
}

impl Drop for KdTree {
    fn drop(&mut self) {
        drain_nodes(self.root.take(), |_| {});
    }
}

impl Clone for KdTree {
    fn clone(&self) -> Self {
        let mut root = None;
        let mut stack: Vec<(&KdNode, &mut Option<Box<KdNode>>)> = Vec::new();
        if let Some(node) = self.root.as_deref() {
            stack.push((node, &mut root));
        }
        while let Some((source, slot)) = stack.pop() {
            let node = slot.insert(Box::new(KdNode::new(source.coordinate)));
            if let Some(left) = source.left.as_deref() {
                stack.push((left, &mut node.left));
            }
            if let Some(right) = source.right.as_deref() {
                stack.push((right, &mut node.right));
            }
        }

        KdTree {
            root,
            dimension: self.dimension,
            len: self.len,
        }
    }
}

impl fmt::Debug for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("dimension", &self.dimension)
            .field("len", &self.len)
            .field("coordinates", &self.coordinates())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_coords(rng: &mut StdRng, n: usize) -> Vec<Coordinate> {
        (0..n)
            .map(|_| {
                Coordinate::new_3d(
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-100.0..100.0),
                )
            })
            .collect()
    }

    fn brute_nearest(coords: &[Coordinate], target: &Coordinate, dimension: usize) -> f64 {
        coords
            .iter()
            .map(|c| c.distance_squared_in(target, dimension))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn arguments_validated() {
        assert_eq!(
            KdTree::new(&[], 4).unwrap_err(),
            GeometryError::InvalidDimension { dimension: 4 }
        );
        assert!(KdTree::new(&[], 1).is_err());
        assert_eq!(
            KdTree::new(&[Coordinate::new(f64::NAN, 0.0)], 2).unwrap_err(),
            GeometryError::InvalidCoordinate
        );
        let mut tree = KdTree::new(&[], 3).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.search_nearest(&Coordinate::new(0.0, 0.0)), None);
        assert_eq!(
            tree.add(Coordinate::new(0.0, f64::INFINITY)),
            Err(GeometryError::InvalidCoordinate)
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn median_construction_is_balanced() {
        let coords: Vec<Coordinate> = (0..15)
            .map(|i| Coordinate::new(i as f64, ((i * 7) % 15) as f64))
            .collect();
        let tree = KdTree::new(&coords, 2).unwrap();
        assert_eq!(tree.len(), 15);
        assert_eq!(tree.depth(), 4);
        tree.validate_structure().unwrap();
        assert!(coords.iter().all(|c| tree.contains(c)));
    }

    #[test]
    fn skewed_adds_then_rebalance() {
        let mut tree = KdTree::new(&[], 2).unwrap();
        for i in 0..31 {
            tree.add(Coordinate::new(i as f64, i as f64)).unwrap();
        }
        assert_eq!(tree.depth(), 31);
        tree.validate_structure().unwrap();

        tree.rebalance_tree();
        assert_eq!(tree.depth(), 5);
        assert_eq!(tree.len(), 31);
        tree.validate_structure().unwrap();
        assert!(tree.contains(&Coordinate::new(17.0, 17.0)));
    }

    #[test]
    fn search_is_inclusive() {
        let coords: Vec<Coordinate> = (0..100)
            .map(|i| Coordinate::new((i % 10) as f64, (i / 10) as f64))
            .collect();
        let tree = KdTree::new(&coords, 2).unwrap();
        let found = tree.search(&Envelope::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(found.len(), 9);
        assert!(found.iter().all(|c| (2.0..=4.0).contains(&c.x) && (3.0..=5.0).contains(&c.y)));
        assert!(tree.search(&Envelope::new(2.1, 3.1, 2.9, 3.9)).is_empty());
    }

    #[test]
    fn remove_rebuilds_subtree() {
        let coords: Vec<Coordinate> = (0..64)
            .map(|i| Coordinate::new((i % 8) as f64, (i / 8) as f64))
            .collect();
        let mut tree = KdTree::new(&coords, 2).unwrap();
        let root = tree.coordinates()[0];
        assert!(tree.remove(&root));
        assert!(!tree.contains(&root));
        assert_eq!(tree.len(), 63);
        tree.validate_structure().unwrap();

        for c in coords.iter().filter(|&c| *c != root) {
            assert!(tree.contains(c), "lost {c}");
        }
        assert!(!tree.remove(&root));
        assert!(!tree.remove(&Coordinate::new(100.0, 100.0)));
    }

    #[test]
    fn duplicates() {
        let p = Coordinate::new(1.0, 1.0);
        let mut tree = KdTree::new(&[p, p, Coordinate::new(0.0, 0.0)], 2).unwrap();
        tree.add(p).unwrap();
        assert!(tree.remove(&p));
        assert!(tree.remove(&p));
        assert!(tree.contains(&p));
        assert!(tree.remove(&p));
        assert!(!tree.contains(&p));
        assert_eq!(tree.len(), 1);
        tree.validate_structure().unwrap();
    }

    #[test]
    fn nearest_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        for dimension in [2, 3] {
            let coords = random_coords(&mut rng, 300);
            let tree = KdTree::new(&coords, dimension).unwrap();
            for target in random_coords(&mut rng, 50) {
                let found = tree.search_nearest(&target).unwrap();
                assert_fuzzy_eq!(
                    found.distance_squared_in(&target, dimension),
                    brute_nearest(&coords, &target, dimension)
                );
            }
        }
    }

    #[test]
    fn sorted_adds_on_small_stack() {
        // sorted adds degrade the tree to a chain as deep as the tree is long
        let handle = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(|| {
                let count = 10_000;
                let mut tree = KdTree::new(&[], 2).unwrap();
                for i in 0..count {
                    tree.add(Coordinate::new(i as f64, i as f64)).unwrap();
                }
                assert_eq!(tree.depth(), count);
                assert_eq!(
                    tree.search_nearest(&Coordinate::new(-1.0, -1.0)),
                    Some(Coordinate::new(0.0, 0.0))
                );
                assert_eq!(
                    tree.search_nearest(&Coordinate::new(1e6, 1e6)),
                    Some(Coordinate::new(9999.0, 9999.0))
                );

                let copy = tree.clone();
                tree.clear();
                assert!(tree.is_empty());
                assert_eq!(tree.search_nearest(&Coordinate::new(0.0, 0.0)), None);
                assert_eq!(copy.len(), count);
                assert_eq!(copy.depth(), count);
                copy.validate_structure().unwrap();
                drop(copy);
            })
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn visit_search_breaks() {
        let coords: Vec<Coordinate> = (0..20).map(|i| Coordinate::new(i as f64, 0.0)).collect();
        let tree = KdTree::new(&coords, 2).unwrap();
        let mut seen = 0;
        let result = tree.visit_search(&Envelope::new(0.0, 0.0, 19.0, 0.0), &mut |_: &Coordinate| {
            seen += 1;
            if seen == 5 {
                crate::core::Control::Break(())
            } else {
                crate::core::Control::Continue
            }
        });
        assert_eq!(seen, 5);
        assert_eq!(result, crate::core::Control::Break(()));
    }
}
