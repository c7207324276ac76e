//! Walking the clip graph and turning the walked loops into polygons.
use super::{
    greiner_hormann::ClipGraph,
    intersection_table::{IntersectionKind, IntersectionRecord},
    vertex_list::{NodeId, VertexList},
};
use crate::{
    algorithms::{
        measures::{path_length, ring_centroid, ring_signed_area},
        winding_number::{classify_point, RelativeLocation},
    },
    geometry::{close_ring, open_ring, Coordinate, CoordinateKey, Polygon},
};
use log::{trace, warn};
use std::collections::HashMap;

/// Which region a trace walks around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceKind {
    /// A and B.
    Internal,
    /// A not B.
    ExternalA,
    /// B not A.
    ExternalB,
    /// A or B.
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

impl Side {
    #[inline]
    fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl TraceKind {
    /// Kind of the records a walk starts from.
    fn start_kind(self) -> IntersectionKind {
        match self {
            TraceKind::Internal | TraceKind::ExternalB => IntersectionKind::Entry,
            TraceKind::ExternalA | TraceKind::Union => IntersectionKind::Exit,
        }
    }

    fn start_side(self) -> Side {
        match self {
            TraceKind::ExternalB => Side::B,
            _ => Side::A,
        }
    }

    /// Returns `true` if the walk follows `side` against its vertex order.
    fn backward(self, side: Side) -> bool {
        matches!(
            (self, side),
            (TraceKind::ExternalA, Side::B) | (TraceKind::ExternalB, Side::A)
        )
    }
}

impl ClipGraph {
    #[inline]
    fn list(&self, side: Side) -> &VertexList {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Position of a node, the record position for intersection nodes.
    #[inline]
    fn walk_pos(&self, side: Side, node: NodeId) -> Coordinate {
        let list = self.list(side);
        match list.node(node).record {
            Some(r) => self.table.record(r).pos,
            None => list.pos(node),
        }
    }
}

#[inline]
fn node_on(record: &IntersectionRecord, side: Side) -> NodeId {
    match side {
        Side::A => record.node_a,
        Side::B => record.node_b,
    }
}

/// Walk every loop of the region `kind` starting from the unconsumed crossing records.
///
/// The walk stays on one shell until it reaches an Entry or Exit record, then continues on the
/// other shell from the same record. Boundary and removed records never switch. Inner loops
/// closed by a repeated position are excised as separate loops.
pub(crate) fn trace_loops(graph: &ClipGraph, kind: TraceKind) -> Vec<Vec<Coordinate>> {
    let table = &graph.table;
    let start_kind = kind.start_kind();
    let max_steps = 2 * (graph.a.len() + graph.b.len()) + 4;
    let mut consumed = vec![false; table.len()];
    let mut loops = Vec::new();

    let starts: Vec<usize> = graph
        .a
        .cycle_from(graph.a.head())
        .filter_map(|id| graph.a.node(id).record)
        .filter(|&r| table.record(r).kind == start_kind)
        .collect();

    for start in starts {
        if consumed[start] {
            continue;
        }
        consumed[start] = true;

        let mut side = kind.start_side();
        let mut node = node_on(table.record(start), side);
        let mut walk = Vec::new();
        let mut closed = false;
        for _ in 0..max_steps {
            walk.push(graph.walk_pos(side, node));
            let list = graph.list(side);
            node = if kind.backward(side) {
                list.prev(node)
            } else {
                list.next(node)
            };

            let Some(r) = list.node(node).record else {
                continue;
            };
            if r == start {
                closed = true;
                break;
            }

            let record = table.record(r);
            if record.is_crossing() {
                if record.kind == start_kind {
                    consumed[r] = true;
                }
                side = side.other();
                node = node_on(record, side);
            }
        }

        if !closed {
            warn!(
                "abandoned {:?} trace from {} after {} steps",
                kind,
                table.record(start).pos,
                walk.len()
            );
            continue;
        }

        trace!("{:?} walk with {} vertexes", kind, walk.len());
        loops.extend(excise_loops(walk));
    }

    loops
}

/// Split a walk at repeated positions.
///
/// When a position repeats, the vertexes walked since its first occurrence form a loop of their
/// own and are removed from the outer walk. The outer walk is the last loop returned.
pub(crate) fn excise_loops(walk: Vec<Coordinate>) -> Vec<Vec<Coordinate>> {
    let mut stack: Vec<Coordinate> = Vec::with_capacity(walk.len());
    let mut seen: HashMap<CoordinateKey, usize> = HashMap::new();
    let mut loops = Vec::new();

    for p in walk {
        let repeated = seen.get(&p.key()).copied();
        match repeated {
            Some(i) => {
                let inner: Vec<Coordinate> = stack.drain(i + 1..).collect();
                for c in inner.iter() {
                    seen.remove(&c.key());
                }
                let mut excised = Vec::with_capacity(inner.len() + 1);
                excised.push(stack[i]);
                excised.extend(inner);
                loops.push(excised);
            }
            None => {
                seen.insert(p.key(), stack.len());
                stack.push(p);
            }
        }
    }

    loops.push(stack);
    loops
}

/// Returns `true` if every vertex of `inner` is inside or on `outer` and some part of it is
/// strictly inside.
pub(crate) fn ring_inside(inner: &[Coordinate], outer: &[Coordinate], tolerance: f64) -> bool {
    let mut any_interior = false;
    for c in inner {
        match classify_point(outer, c, tolerance) {
            RelativeLocation::Interior => any_interior = true,
            RelativeLocation::Boundary => {}
            RelativeLocation::Exterior | RelativeLocation::Undefined => return false,
        }
    }

    any_interior
        || classify_point(outer, &ring_centroid(inner), tolerance) == RelativeLocation::Interior
}

/// Turn traced loops into polygons.
///
/// Loops with fewer than 3 distinct vertexes or zero area (within tolerance) are dropped. Counter
/// clockwise loops become shells, clockwise loops become holes of the smallest shell containing
/// them.
pub(crate) fn assemble_polygons(loops: Vec<Vec<Coordinate>>, tolerance: f64) -> Vec<Polygon> {
    let mut shells: Vec<(Vec<Coordinate>, f64)> = Vec::new();
    let mut holes: Vec<Vec<Coordinate>> = Vec::new();

    for l in loops {
        let ring = open_ring(&l);
        if ring.len() < 3 {
            continue;
        }

        let area = ring_signed_area(&ring);
        let closed = close_ring(ring);
        if area.abs() <= tolerance * path_length(&closed) {
            trace!("dropping zero area loop with {} vertexes", closed.len() - 1);
            continue;
        }

        if area > 0.0 {
            shells.push((closed, area));
        } else {
            holes.push(closed);
        }
    }

    shells.sort_by(|(_, a1), (_, a2)| a1.total_cmp(a2));
    let mut shell_holes: Vec<Vec<Vec<Coordinate>>> = vec![Vec::new(); shells.len()];
    for hole in holes {
        match shells
            .iter()
            .position(|(shell, _)| ring_inside(&hole, shell, tolerance))
        {
            Some(i) => shell_holes[i].push(hole),
            None => warn!(
                "dropping hole loop with {} vertexes not inside any traced shell",
                hole.len() - 1
            ),
        }
    }

    shells
        .into_iter()
        .zip(shell_holes)
        .map(|((shell, _), holes)| Polygon::from_closed_rings(shell, holes))
        .collect()
}
