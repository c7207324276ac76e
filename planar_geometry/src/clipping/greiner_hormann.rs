//! Greiner-Hormann clipping of one shell against another.
//!
//! Both shells must be simple, counter clockwise and open (no closing coordinate). Building a
//! [ClipGraph] runs the intersection, categorization and linking stages, the traces are then read
//! from it with [ClipGraph::clip] and [ClipGraph::union].
use super::{
    intersection_table::{IntersectionKind, IntersectionTable},
    trace::{assemble_polygons, trace_loops, TraceKind},
    vertex_list::{NodeId, VertexList},
};
use crate::{
    algorithms::{
        sweep_line::{
            build_sweep_input, global_tolerance, visit_segment_intersections, SweepIntersection,
        },
        winding_number::{classify_point, RelativeLocation},
    },
    error::Result,
    geometry::{close_ring, Coordinate, Envelope, Polygon, PrecisionModel},
};
use log::{debug, trace};

/// How two shells relate when the clip is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShellRelation {
    /// At least one crossing, the result comes from tracing.
    Crossing,
    Equal,
    AInsideB,
    BInsideA,
    /// No shared interior (touching boundaries allowed).
    Disjoint,
}

/// Shell level clip output.
#[derive(Debug, Clone, Default)]
pub(crate) struct ShellClip {
    pub internal: Vec<Polygon>,
    pub external_a: Vec<Polygon>,
    pub external_b: Vec<Polygon>,
}

/// Vertex lists of both shells with their shared intersection records.
#[derive(Debug, Clone)]
pub(crate) struct ClipGraph {
    pub a: VertexList,
    pub b: VertexList,
    pub table: IntersectionTable,
    pub tolerance: f64,
    a_ring: Vec<Coordinate>,
    b_ring: Vec<Coordinate>,
    relation: ShellRelation,
}

impl ClipGraph {
    pub fn build(a: &[Coordinate], b: &[Coordinate], precision: &PrecisionModel) -> Result<Self> {
        let tolerance = global_tolerance(&[a, b], precision);
        let mut graph = ClipGraph {
            a: VertexList::from_ring(a),
            b: VertexList::from_ring(b),
            table: IntersectionTable::new(),
            tolerance,
            a_ring: a.to_vec(),
            b_ring: b.to_vec(),
            relation: ShellRelation::Disjoint,
        };

        let overlapping = match (Envelope::from_coordinates(a), Envelope::from_coordinates(b)) {
            (Some(env_a), Some(env_b)) => env_a.intersects_xy_eps(&env_b, tolerance),
            _ => false,
        };

        if !overlapping {
            debug!("shell envelopes are disjoint, skipping intersection search");
            return Ok(graph);
        }

        graph.find_intersections(precision)?;
        graph.categorize();
        graph.link();
        graph.relation = graph.compute_relation();
        debug!(
            "shell relation {:?}, {} intersections, {} crossings",
            graph.relation,
            graph.table.len(),
            graph.table.crossing_count()
        );

        Ok(graph)
    }

    #[inline]
    pub fn relation(&self) -> ShellRelation {
        self.relation
    }

    fn find_intersections(&mut self, precision: &PrecisionModel) -> Result<()> {
        let closed_a = close_ring(self.a_ring.clone());
        let closed_b = close_ring(self.b_ring.clone());
        let input = build_sweep_input(&[&closed_a[..], &closed_b[..]], self.tolerance)?;
        let offset_b = input.ring_offsets[1];

        let mut found = Vec::new();
        visit_segment_intersections(&input, precision, &mut |intr: SweepIntersection| {
            if intr.edge1 < offset_b && intr.edge2 >= offset_b {
                found.push((intr.edge1, intr.edge2 - offset_b, intr.point));
            }
        });

        let tol = self.tolerance;
        for (edge_a, edge_b, point) in found {
            let point = self.table.snap(precision.make_precise(&point), tol);
            let node_a = self.a.insert_on_edge(edge_a, point, tol);
            // the node position on shell A is the canonical position of the record
            let pos = self.a.pos(node_a);
            let node_b = self.b.insert_on_edge(edge_b, pos, tol);

            match (self.a.node(node_a).record, self.b.node(node_b).record) {
                (None, None) => {
                    let id = self.table.insert(pos, node_a, node_b);
                    if self.table.record(id).node_a != node_a {
                        trace!("position {} already recorded for another vertex", pos);
                        continue;
                    }
                    self.a.node_mut(node_a).record = Some(id);
                    self.b.node_mut(node_b).record = Some(id);
                }
                (Some(ra), Some(rb)) if ra == rb => {}
                _ => {
                    trace!("skipping intersection {} linked to a different vertex", pos);
                }
            }
        }

        debug!(
            "found {} shell intersections ({} vertexes on A, {} on B)",
            self.table.len(),
            self.a.len(),
            self.b.len()
        );

        Ok(())
    }

    fn categorize(&mut self) {
        let tol = self.tolerance;
        for id in 0..self.a.len() {
            let mid = self.a.sub_edge_midpoint(id);
            self.a.node_mut(id).status = classify_point(&self.b_ring, &mid, tol);
        }
        for id in 0..self.b.len() {
            let mid = self.b.sub_edge_midpoint(id);
            self.b.node_mut(id).status = classify_point(&self.a_ring, &mid, tol);
        }

        let record_nodes: Vec<NodeId> = self
            .a
            .cycle_from(self.a.head())
            .filter(|&id| self.a.node(id).record.is_some())
            .collect();

        let mut counts = [0usize; 4];
        for node in record_nodes {
            let kind = self.classify_node(node);
            if let Some(r) = self.a.node(node).record {
                self.table.record_mut(r).kind = kind;
            }
            match kind {
                IntersectionKind::Entry => counts[0] += 1,
                IntersectionKind::Exit => counts[1] += 1,
                IntersectionKind::Boundary => counts[2] += 1,
                _ => counts[3] += 1,
            }
        }

        debug!(
            "categorized intersections: {} entry, {} exit, {} boundary, {} removed",
            counts[0], counts[1], counts[2], counts[3]
        );
    }

    /// Kind of the intersection at `node` from the locations of the sub edges around it.
    fn classify_node(&self, node: NodeId) -> IntersectionKind {
        use RelativeLocation::*;
        let before = self.a.node(self.a.prev(node)).status;
        let after = self.a.node(node).status;
        match (before, after) {
            (Boundary, Boundary) => IntersectionKind::Removed,
            (Exterior, Interior) => IntersectionKind::Entry,
            (Interior, Exterior) => IntersectionKind::Exit,
            (Boundary, after) => {
                let (run_start, before) = self.overlap_run_start(node);
                self.overlap_run_kind(before, after, run_start, false)
            }
            (before, Boundary) => {
                let after = self.overlap_run_end_status(node);
                self.overlap_run_kind(before, after, node, true)
            }
            _ => IntersectionKind::Boundary,
        }
    }

    /// Kind of an end point of a run of sub edges overlapping shell B.
    ///
    /// A run that crosses from one side to the other crosses at its end. A run that leaves and
    /// returns to the same side while following B in the same direction is a pair of crossings
    /// (leave at its start, enter at its end). Anything else is a touch.
    fn overlap_run_kind(
        &self,
        before: RelativeLocation,
        after: RelativeLocation,
        run_start: NodeId,
        at_start: bool,
    ) -> IntersectionKind {
        use RelativeLocation::*;
        match (before, after) {
            (Exterior, Interior) if !at_start => IntersectionKind::Entry,
            (Interior, Exterior) if !at_start => IntersectionKind::Exit,
            (Exterior, Interior) | (Interior, Exterior) => IntersectionKind::Boundary,
            (Interior, Interior) | (Exterior, Exterior) if self.same_direction(run_start) => {
                match (before, at_start) {
                    (Interior, true) | (Exterior, false) => IntersectionKind::Exit,
                    _ => IntersectionKind::Entry,
                }
            }
            // every sub edge overlaps
            (Boundary, _) | (_, Boundary) => IntersectionKind::Removed,
            _ => IntersectionKind::Boundary,
        }
    }

    /// First node of the overlap run ending at `node` and the location before the run.
    fn overlap_run_start(&self, node: NodeId) -> (NodeId, RelativeLocation) {
        let mut start = self.a.prev(node);
        for _ in 0..self.a.len() {
            let prev = self.a.prev(start);
            let status = self.a.node(prev).status;
            if status != RelativeLocation::Boundary {
                return (start, status);
            }
            start = prev;
        }

        (start, RelativeLocation::Boundary)
    }

    /// Location after the overlap run starting at `node`.
    fn overlap_run_end_status(&self, node: NodeId) -> RelativeLocation {
        let mut current = self.a.next(node);
        for _ in 0..self.a.len() {
            let status = self.a.node(current).status;
            if status != RelativeLocation::Boundary {
                return status;
            }
            current = self.a.next(current);
        }

        RelativeLocation::Boundary
    }

    /// Returns `true` if both shells leave the overlap run start `node` towards the same record.
    fn same_direction(&self, node: NodeId) -> bool {
        let Some(r) = self.a.node(node).record else {
            return false;
        };

        let node_b = self.table.record(r).node_b;
        let next_a = self.a.node(self.a.next(node)).record;
        let next_b = self.b.node(self.b.next(node_b)).record;
        next_a.is_some() && next_a == next_b
    }

    fn link(&mut self) {
        let order_a: Vec<usize> = self
            .a
            .cycle_from(self.a.head())
            .filter_map(|id| self.a.node(id).record)
            .filter(|&r| self.table.record(r).is_crossing())
            .collect();
        for (i, &r) in order_a.iter().enumerate() {
            self.table.record_mut(r).next_a = Some(order_a[(i + 1) % order_a.len()]);
        }

        let order_b: Vec<usize> = self
            .b
            .cycle_from(self.b.head())
            .filter_map(|id| self.b.node(id).record)
            .filter(|&r| self.table.record(r).is_crossing())
            .collect();
        for (i, &r) in order_b.iter().enumerate() {
            self.table.record_mut(r).next_b = Some(order_b[(i + 1) % order_b.len()]);
        }

        let alternating = order_a.iter().zip(order_a.iter().cycle().skip(1)).all(|(&r1, &r2)| {
            self.table.record(r1).kind != self.table.record(r2).kind
        });
        if !alternating {
            debug!("entry and exit intersections do not alternate along shell A");
        }
    }

    fn compute_relation(&self) -> ShellRelation {
        if self.table.crossing_count() > 0 {
            return ShellRelation::Crossing;
        }

        let outside = |list: &VertexList| {
            list.cycle_from(list.head())
                .any(|id| list.node(id).status == RelativeLocation::Exterior)
        };

        match (outside(&self.a), outside(&self.b)) {
            (false, false) => ShellRelation::Equal,
            (false, true) => ShellRelation::AInsideB,
            (true, false) => ShellRelation::BInsideA,
            (true, true) => ShellRelation::Disjoint,
        }
    }

    /// Splice the intersections of each shell with the other polygon's holes into the shells'
    /// vertex lists (plain vertexes, no records).
    pub fn add_hole_intersections(
        &mut self,
        holes_a: &[Vec<Coordinate>],
        holes_b: &[Vec<Coordinate>],
        precision: &PrecisionModel,
    ) -> Result<()> {
        let mut spliced = 0;
        for hole in holes_b {
            spliced += splice_ring_crossings(&mut self.a, &self.a_ring, hole, precision)?;
        }
        for hole in holes_a {
            spliced += splice_ring_crossings(&mut self.b, &self.b_ring, hole, precision)?;
        }

        debug!("spliced {} shell/hole intersections", spliced);
        Ok(())
    }

    /// Internal and external traces, or the trivial outcome when the shells do not cross.
    pub fn clip(&self) -> ShellClip {
        let tol = self.tolerance;
        let result = match self.relation {
            ShellRelation::Crossing => ShellClip {
                internal: assemble_polygons(trace_loops(self, TraceKind::Internal), tol),
                external_a: assemble_polygons(trace_loops(self, TraceKind::ExternalA), tol),
                external_b: assemble_polygons(trace_loops(self, TraceKind::ExternalB), tol),
            },
            ShellRelation::Equal => ShellClip {
                internal: vec![self.shell_polygon_a()],
                ..Default::default()
            },
            ShellRelation::AInsideB => ShellClip {
                internal: vec![self.shell_polygon_a()],
                external_a: Vec::new(),
                external_b: vec![with_hole(&self.b, &self.a)],
            },
            ShellRelation::BInsideA => ShellClip {
                internal: vec![self.shell_polygon_b()],
                external_a: vec![with_hole(&self.a, &self.b)],
                external_b: Vec::new(),
            },
            ShellRelation::Disjoint => ShellClip {
                internal: Vec::new(),
                external_a: vec![self.shell_polygon_a()],
                external_b: vec![self.shell_polygon_b()],
            },
        };

        debug!(
            "traced {} internal, {} external A, {} external B clips",
            result.internal.len(),
            result.external_a.len(),
            result.external_b.len()
        );

        result
    }

    /// Union of the two shells, outer loops counter clockwise and enclosed gaps as clockwise
    /// holes.
    pub fn union(&self) -> Vec<Polygon> {
        match self.relation {
            ShellRelation::Crossing => {
                assemble_polygons(trace_loops(self, TraceKind::Union), self.tolerance)
            }
            ShellRelation::Equal | ShellRelation::BInsideA => vec![self.shell_polygon_a()],
            ShellRelation::AInsideB => vec![self.shell_polygon_b()],
            ShellRelation::Disjoint => vec![self.shell_polygon_a(), self.shell_polygon_b()],
        }
    }

    fn shell_polygon_a(&self) -> Polygon {
        Polygon::from_closed_rings(close_ring(self.a.positions()), Vec::new())
    }

    fn shell_polygon_b(&self) -> Polygon {
        Polygon::from_closed_rings(close_ring(self.b.positions()), Vec::new())
    }
}

fn with_hole(outer: &VertexList, inner: &VertexList) -> Polygon {
    let mut hole = inner.positions();
    hole.reverse();
    Polygon::from_closed_rings(close_ring(outer.positions()), vec![close_ring(hole)])
}

/// Splice the crossings of `shell` (the ring `list` was built from) with `ring` into `list`.
fn splice_ring_crossings(
    list: &mut VertexList,
    shell: &[Coordinate],
    ring: &[Coordinate],
    precision: &PrecisionModel,
) -> Result<usize> {
    let tol = global_tolerance(&[shell, ring], precision);
    let overlapping = match (
        Envelope::from_coordinates(shell),
        Envelope::from_coordinates(ring),
    ) {
        (Some(env_shell), Some(env_ring)) => env_shell.intersects_xy_eps(&env_ring, tol),
        _ => false,
    };
    if !overlapping {
        return Ok(0);
    }

    let closed_shell = close_ring(shell.to_vec());
    let closed_ring = close_ring(ring.to_vec());
    let input = build_sweep_input(&[&closed_shell[..], &closed_ring[..]], tol)?;
    let offset = input.ring_offsets[1];

    let mut found = Vec::new();
    visit_segment_intersections(&input, precision, &mut |intr: SweepIntersection| {
        if intr.edge1 < offset && intr.edge2 >= offset {
            found.push((intr.edge1, intr.point));
        }
    });

    let before = list.len();
    for (edge, point) in found {
        list.insert_on_edge(edge, precision.make_precise(&point), tol);
    }

    Ok(list.len() - before)
}
