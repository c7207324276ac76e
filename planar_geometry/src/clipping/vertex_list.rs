//! Arena backed circular doubly linked vertex sequence used while clipping.
use crate::{
    algorithms::winding_number::RelativeLocation, core::math::midpoint, geometry::Coordinate,
};

pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy)]
pub(crate) struct VertexNode {
    pub pos: Coordinate,
    pub next: NodeId,
    pub prev: NodeId,
    /// Intersection record this node takes part in.
    pub record: Option<usize>,
    /// Location of the sub edge starting at this node relative to the other shell.
    pub status: RelativeLocation,
}

/// Vertexes of one shell. Nodes are never removed, intersections are spliced in between the
/// original vertexes.
#[derive(Debug, Clone)]
pub(crate) struct VertexList {
    nodes: Vec<VertexNode>,
    /// Node of each original ring vertex (edge `i` starts at `originals[i]`).
    originals: Vec<NodeId>,
}

impl VertexList {
    /// Build from an open ring (no closing coordinate).
    pub fn from_ring(ring: &[Coordinate]) -> Self {
        let n = ring.len();
        let nodes = ring
            .iter()
            .enumerate()
            .map(|(i, &pos)| VertexNode {
                pos,
                next: if i + 1 == n { 0 } else { i + 1 },
                prev: if i == 0 { n.saturating_sub(1) } else { i - 1 },
                record: None,
                status: RelativeLocation::Undefined,
            })
            .collect();

        Self {
            nodes,
            originals: (0..n).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &VertexNode {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut VertexNode {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> NodeId {
        self.nodes[id].next
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> NodeId {
        self.nodes[id].prev
    }

    #[inline]
    pub fn pos(&self, id: NodeId) -> Coordinate {
        self.nodes[id].pos
    }

    /// First node of the ring (original vertex 0).
    #[inline]
    pub fn head(&self) -> NodeId {
        self.originals[0]
    }

    /// Midpoint of the sub edge starting at `id`.
    pub fn sub_edge_midpoint(&self, id: NodeId) -> Coordinate {
        let a = self.pos(id);
        let b = self.pos(self.next(id));
        let m = midpoint(a.xy(), b.xy());
        Coordinate::new_3d(m.x, m.y, (a.z + b.z) / 2.0)
    }

    /// Node ids in ring order, one full cycle starting at `start`.
    pub fn cycle_from(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = Some(start);
        let mut remaining = self.nodes.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let id = current?;
            let next = self.next(id);
            current = if next == start { None } else { Some(next) };
            Some(id)
        })
    }

    /// Return the node at `pos` on the original edge `edge`, splicing a new node in if there is
    /// none yet.
    ///
    /// Existing nodes within `tolerance` of `pos` (including the edge end points) are reused. New
    /// nodes are ordered along the edge by distance from its start. Spliced nodes take the status
    /// of the sub edge they split.
    pub fn insert_on_edge(&mut self, edge: usize, pos: Coordinate, tolerance: f64) -> NodeId {
        let count = self.originals.len();
        let start = self.originals[edge % count];
        let end = self.originals[(edge + 1) % count];

        if self.pos(start).distance(&pos) <= tolerance {
            return start;
        }
        if self.pos(end).distance(&pos) <= tolerance {
            return end;
        }

        let start_pos = self.pos(start);
        let dist = start_pos.distance(&pos);
        let mut current = start;
        loop {
            let next = self.next(current);
            if next == end {
                break;
            }
            let next_pos = self.pos(next);
            if next_pos.distance(&pos) <= tolerance {
                return next;
            }
            if start_pos.distance(&next_pos) > dist {
                break;
            }
            current = next;
        }

        self.splice_after(current, pos)
    }

    fn splice_after(&mut self, after: NodeId, pos: Coordinate) -> NodeId {
        let id = self.nodes.len();
        let next = self.next(after);
        let status = self.nodes[after].status;
        self.nodes.push(VertexNode {
            pos,
            next,
            prev: after,
            record: None,
            status,
        });
        self.nodes[after].next = id;
        self.nodes[next].prev = id;
        id
    }

    /// Positions of one full cycle starting at the head.
    pub fn positions(&self) -> Vec<Coordinate> {
        self.cycle_from(self.head()).map(|id| self.pos(id)).collect()
    }
}
