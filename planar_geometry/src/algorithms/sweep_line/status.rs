//! Sweep line status: active segments ordered by their y value at the sweep position.
//!
//! The status is a treap with parent links. Order is structural: the comparator only places a new
//! segment, crossings reorder stored segments in place, so stored segments are never compared
//! against each other at a later sweep position. Insert, remove and neighbour lookups are
//! `O(log n)` expected.
use super::events::SweepSegment;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct StatusNode {
    segment: usize,
    priority: u64,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SweepStatus {
    nodes: Vec<StatusNode>,
    free: Vec<usize>,
    root: Option<usize>,
    /// Node holding each segment, `None` while the segment is not active.
    node_of: Vec<Option<usize>>,
    len: usize,
    seed: u64,
}

/// Active segments around a sweep position, see [SweepStatus::neighbourhood].
#[derive(Debug, Clone, Default)]
pub(crate) struct Neighbourhood {
    /// Contiguous run of segments near the position, bottom to top.
    pub run: Vec<usize>,
    /// First segment below the run.
    pub below: Option<usize>,
    /// First segment above the run.
    pub above: Option<usize>,
}

impl Neighbourhood {
    /// Every segment of the neighbourhood except `segment`.
    pub fn candidates(&self, segment: usize) -> impl Iterator<Item = usize> + '_ {
        self.run
            .iter()
            .copied()
            .filter(move |&s| s != segment)
            .chain(self.below)
            .chain(self.above)
    }
}

impl SweepStatus {
    /// Status for segment indexes `0..segment_count`.
    pub fn new(segment_count: usize) -> Self {
        SweepStatus {
            node_of: vec![None; segment_count],
            ..Default::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn contains(&self, segment: usize) -> bool {
        self.node(segment).is_some()
    }

    #[inline]
    fn node(&self, segment: usize) -> Option<usize> {
        self.node_of.get(segment).copied().flatten()
    }

    /// Insert `segment` at its ordered position for sweep position `x`.
    pub fn insert(&mut self, segments: &[SweepSegment], segment: usize, x: f64) {
        debug_assert!(!self.contains(segment));
        let s = &segments[segment];
        let mut parent = None;
        let mut go_left = false;
        let mut current = self.root;
        while let Some(id) = current {
            let other = self.nodes[id].segment;
            parent = Some(id);
            go_left = compare_at(s, segment, &segments[other], other, x) == Ordering::Less;
            current = if go_left {
                self.nodes[id].left
            } else {
                self.nodes[id].right
            };
        }

        let priority = self.next_priority();
        let id = self.alloc(StatusNode {
            segment,
            priority,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) if go_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }
        self.node_of[segment] = Some(id);
        self.len += 1;

        while let Some(p) = self.nodes[id].parent {
            if self.nodes[p].priority >= priority {
                break;
            }
            self.rotate_up(id);
        }
    }

    /// Remove `segment`, returns `false` if it was not active.
    pub fn remove(&mut self, segment: usize) -> bool {
        let Some(id) = self.node_of.get_mut(segment).and_then(Option::take) else {
            return false;
        };

        // rotate the node down to a leaf, then unlink it
        loop {
            let child = match (self.nodes[id].left, self.nodes[id].right) {
                (None, None) => break,
                (Some(c), None) | (None, Some(c)) => c,
                (Some(l), Some(r)) => {
                    if self.nodes[l].priority > self.nodes[r].priority {
                        l
                    } else {
                        r
                    }
                }
            };
            self.rotate_up(child);
        }

        match self.nodes[id].parent {
            None => self.root = None,
            Some(p) if self.nodes[p].left == Some(id) => self.nodes[p].left = None,
            Some(p) => self.nodes[p].right = None,
        }
        self.free.push(id);
        self.len -= 1;
        true
    }

    /// Segment directly above `segment`.
    pub fn above(&self, segment: usize) -> Option<usize> {
        let id = self.node(segment)?;
        let next = match self.nodes[id].right {
            Some(mut n) => {
                while let Some(l) = self.nodes[n].left {
                    n = l;
                }
                Some(n)
            }
            None => self.climb(id, |node| node.left),
        };
        next.map(|n| self.nodes[n].segment)
    }

    /// Segment directly below `segment`.
    pub fn below(&self, segment: usize) -> Option<usize> {
        let id = self.node(segment)?;
        let prev = match self.nodes[id].left {
            Some(mut n) => {
                while let Some(r) = self.nodes[n].right {
                    n = r;
                }
                Some(n)
            }
            None => self.climb(id, |node| node.right),
        };
        prev.map(|n| self.nodes[n].segment)
    }

    /// First ancestor of `id` reached from its `side` child.
    fn climb(&self, id: usize, side: impl Fn(&StatusNode) -> Option<usize>) -> Option<usize> {
        let mut child = id;
        let mut parent = self.nodes[id].parent;
        while let Some(p) = parent {
            if side(&self.nodes[p]) == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    /// Active segments next to `segment` whose span at `x` comes within `tolerance` of
    /// `[lo, hi]`.
    ///
    /// The run always contains `segment` and is extended in both directions until the first
    /// segment that is not near, which is returned as `below`/`above`.
    pub fn neighbourhood(
        &self,
        segments: &[SweepSegment],
        segment: usize,
        x: f64,
        lo: f64,
        hi: f64,
        tolerance: f64,
    ) -> Neighbourhood {
        let near = |s: usize| {
            let (s_lo, s_hi) = segments[s].span_at(x);
            s_lo <= hi + tolerance && s_hi >= lo - tolerance
        };

        let mut result = Neighbourhood::default();
        let mut current = self.below(segment);
        while let Some(s) = current {
            if !near(s) {
                result.below = Some(s);
                break;
            }
            result.run.push(s);
            current = self.below(s);
        }

        result.run.reverse();
        result.run.push(segment);

        let mut current = self.above(segment);
        while let Some(s) = current {
            if !near(s) {
                result.above = Some(s);
                break;
            }
            result.run.push(s);
            current = self.above(s);
        }

        result
    }

    /// Place the segments of `order` into the positions currently held by `run` (same
    /// segments, new order).
    pub fn reorder(&mut self, run: &[usize], order: &[usize]) {
        debug_assert_eq!(run.len(), order.len());
        let ids: Vec<usize> = run.iter().filter_map(|&s| self.node(s)).collect();
        for (&id, &segment) in ids.iter().zip(order) {
            self.nodes[id].segment = segment;
            self.node_of[segment] = Some(id);
        }
    }

    fn alloc(&mut self, node: StatusNode) -> usize {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Deterministic priorities (splitmix64 sequence), the sweep result never depends on them.
    fn next_priority(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Rotate node `n` above its parent, in order sequence is unchanged.
    fn rotate_up(&mut self, n: usize) {
        let Some(p) = self.nodes[n].parent else {
            return;
        };
        let grand = self.nodes[p].parent;

        if self.nodes[p].left == Some(n) {
            let inner = self.nodes[n].right;
            self.nodes[p].left = inner;
            if let Some(i) = inner {
                self.nodes[i].parent = Some(p);
            }
            self.nodes[n].right = Some(p);
        } else {
            let inner = self.nodes[n].left;
            self.nodes[p].right = inner;
            if let Some(i) = inner {
                self.nodes[i].parent = Some(p);
            }
            self.nodes[n].left = Some(p);
        }

        self.nodes[p].parent = Some(n);
        self.nodes[n].parent = grand;
        match grand {
            None => self.root = Some(n),
            Some(g) if self.nodes[g].left == Some(p) => self.nodes[g].left = Some(n),
            Some(g) => self.nodes[g].right = Some(n),
        }
    }
}

/// Order of two segments at sweep position `x`: by y, then as [compare_after].
pub(crate) fn compare_at(
    a: &SweepSegment,
    a_index: usize,
    b: &SweepSegment,
    b_index: usize,
    x: f64,
) -> Ordering {
    a.y_at(x)
        .total_cmp(&b.y_at(x))
        .then_with(|| compare_after(a, a_index, b, b_index))
}

/// Order of two segments leaving a common point: by slope, then by index for a total order.
pub(crate) fn compare_after(
    a: &SweepSegment,
    a_index: usize,
    b: &SweepSegment,
    b_index: usize,
) -> Ordering {
    a.slope()
        .total_cmp(&b.slope())
        .then(a_index.cmp(&b_index))
}

#[cfg(test)]
mod tests {
    use super::super::events::build_sweep_input;
    use super::*;
    use crate::geometry::Coordinate;

    fn in_order(status: &SweepStatus) -> Vec<usize> {
        let Some(mut current) = (0..status.node_of.len()).find(|&s| {
            status.contains(s) && status.below(s).is_none()
        }) else {
            return Vec::new();
        };
        let mut order = vec![current];
        while let Some(next) = status.above(current) {
            order.push(next);
            current = next;
        }
        order
    }

    #[test]
    fn ordered_by_y_then_slope() {
        let rings = vec![
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0)],
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(10.0, -10.0)],
            vec![Coordinate::new(0.0, 5.0), Coordinate::new(10.0, 5.0)],
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 3.0)],
        ];
        let input = build_sweep_input(&rings, 0.0).unwrap();
        let mut status = SweepStatus::new(4);
        for i in 0..4 {
            status.insert(&input.segments, i, 0.0);
        }

        // at x = 0: falling (y 0, slope -1), rising (y 0, slope 1), vertical (y 0), flat (y 5)
        assert_eq!(status.len(), 4);
        assert_eq!(in_order(&status), vec![1, 0, 3, 2]);
        assert_eq!(status.below(1), None);
        assert_eq!(status.above(1), Some(0));
        assert_eq!(status.above(2), None);

        assert!(status.remove(1));
        assert!(!status.remove(1));
        assert_eq!(status.below(0), None);
        assert_eq!(in_order(&status), vec![0, 3, 2]);
    }

    #[test]
    fn many_inserts_and_removes_stay_sorted() {
        // horizontal segments at scrambled heights
        let count = 500;
        let rings: Vec<Vec<Coordinate>> = (0..count)
            .map(|i| {
                let y = ((i * 7919) % count) as f64;
                vec![Coordinate::new(0.0, y), Coordinate::new(10.0, y)]
            })
            .collect();
        let input = build_sweep_input(&rings, 0.0).unwrap();
        let mut status = SweepStatus::new(count);
        for i in 0..count {
            status.insert(&input.segments, i, 0.0);
        }
        for i in (0..count).step_by(3) {
            assert!(status.remove(i));
        }

        let order = in_order(&status);
        assert_eq!(order.len(), status.len());
        assert!(order
            .windows(2)
            .all(|w| input.segments[w[0]].left.y < input.segments[w[1]].left.y));
    }

    #[test]
    fn neighbourhood_and_reorder() {
        // three lines through (5, 5) and one far below
        let rings = vec![
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0)],
            vec![Coordinate::new(0.0, 5.0), Coordinate::new(10.0, 5.0)],
            vec![Coordinate::new(0.0, 10.0), Coordinate::new(10.0, 0.0)],
            vec![Coordinate::new(0.0, -20.0), Coordinate::new(10.0, -20.0)],
        ];
        let input = build_sweep_input(&rings, 0.0).unwrap();
        let mut status = SweepStatus::new(4);
        for i in 0..4 {
            status.insert(&input.segments, i, 0.0);
        }
        assert_eq!(in_order(&status), vec![3, 0, 1, 2]);

        let hood = status.neighbourhood(&input.segments, 1, 5.0, 5.0, 5.0, 1e-9);
        assert_eq!(hood.run, vec![0, 1, 2]);
        assert_eq!(hood.below, Some(3));
        assert_eq!(hood.above, None);
        assert_eq!(hood.candidates(1).collect::<Vec<_>>(), vec![0, 2, 3]);

        status.reorder(&hood.run, &[2, 1, 0]);
        assert_eq!(in_order(&status), vec![3, 2, 1, 0]);
        assert_eq!(status.above(3), Some(2));
    }
}
