use super::{
    events::{EventKind, SweepInput, SweepSegment},
    status::{compare_after, SweepStatus},
    SweepIntersectVisitor, SweepIntersection,
};
use crate::{
    algorithms::segment_intersection::{segment_intersection, SegmentIntersection},
    core::traits::ControlFlow,
    geometry::{Coordinate, PrecisionModel},
};
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashSet},
};

/// Two active segments crossing at an interior point ahead of the sweep.
#[derive(Debug, Clone, Copy)]
struct CrossingEvent {
    /// Sweep position the event fires at.
    x: f64,
    point: Coordinate,
    a: usize,
    b: usize,
}

impl Ord for CrossingEvent {
    // reversed so the max heap pops the leftmost crossing first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .x
            .total_cmp(&self.x)
            .then(other.point.y.total_cmp(&self.point.y))
            .then(other.a.cmp(&self.a))
            .then(other.b.cmp(&self.b))
    }
}

impl PartialOrd for CrossingEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CrossingEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CrossingEvent {}

/// Sweep enumerating every intersecting segment pair (Bentley-Ottmann).
///
/// Segments are tested only when they become neighbors in the sweep status: on insertion, on
/// removal and after a crossing swaps them. Segments passing within tolerance of the event point
/// are treated as neighbors of each other. Interior crossings are queued as events that reorder
/// the segments meeting there. Every pair is tested at most once, cost is `O((n + k) log n)` for
/// `k` intersections plus the pairs of segments passing through a common point.
pub(crate) fn visit_segment_intersections<C, V>(
    input: &SweepInput,
    precision: &PrecisionModel,
    visitor: &mut V,
) -> C
where
    C: ControlFlow,
    V: SweepIntersectVisitor<C>,
{
    BentleyOttmann::new(input, precision).run(visitor)
}

struct BentleyOttmann<'a> {
    input: &'a SweepInput,
    precision: &'a PrecisionModel,
    status: SweepStatus,
    /// Active vertical segments, they span many status positions at their sweep position.
    verticals: Vec<usize>,
    crossings: BinaryHeap<CrossingEvent>,
    /// Segment pairs (lower index first) already tested.
    tested: HashSet<(usize, usize)>,
    sweep_x: f64,
}

impl<'a> BentleyOttmann<'a> {
    fn new(input: &'a SweepInput, precision: &'a PrecisionModel) -> Self {
        BentleyOttmann {
            input,
            precision,
            status: SweepStatus::new(input.segments.len()),
            verticals: Vec::new(),
            crossings: BinaryHeap::new(),
            tested: HashSet::new(),
            sweep_x: f64::NEG_INFINITY,
        }
    }

    fn run<C, V>(&mut self, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SweepIntersectVisitor<C>,
    {
        let input = self.input;
        let events = &input.events;
        let mut next = 0;
        loop {
            // crossings at the same position fire before segments start or end there
            let crossing_first = match (self.crossings.peek(), events.get(next)) {
                (Some(c), Some(e)) => c.x <= e.x,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            if crossing_first {
                if let Some(crossing) = self.crossings.pop() {
                    try_cf!(self.cross(crossing, visitor));
                }
                continue;
            }

            let event = events[next];
            next += 1;
            self.sweep_x = event.x;
            match event.kind {
                EventKind::Left => try_cf!(self.insert(event.segment, visitor)),
                EventKind::Right => try_cf!(self.remove(event.segment, visitor)),
            }
        }

        log::trace!("sweep finished, {} segment pairs tested", self.tested.len());
        C::continuing()
    }

    fn insert<C, V>(&mut self, index: usize, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SweepIntersectVisitor<C>,
    {
        let input = self.input;
        let s = &input.segments[index];
        let x = s.left.x;
        self.status.insert(&input.segments, index, x);
        log::trace!(
            "sweep insert edge {} at x = {}, status size {}",
            s.ordinal,
            x,
            self.status.len()
        );

        let (lo, hi) = s.span_at(x);
        let near = self
            .status
            .neighbourhood(&input.segments, index, x, lo, hi, input.tolerance);
        for other in near.candidates(index) {
            try_cf!(self.test(index, other, visitor));
        }
        for i in 0..self.verticals.len() {
            let vertical = self.verticals[i];
            try_cf!(self.test(index, vertical, visitor));
        }

        if s.is_vertical() {
            self.verticals.push(index);
        }

        C::continuing()
    }

    fn remove<C, V>(&mut self, index: usize, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SweepIntersectVisitor<C>,
    {
        if !self.status.contains(index) {
            debug_assert!(false, "right event for segment not in sweep status");
            return C::continuing();
        }

        let input = self.input;
        let s = &input.segments[index];
        let x = s.right.x;
        let (lo, hi) = s.span_at(x);
        let near = self
            .status
            .neighbourhood(&input.segments, index, x, lo, hi, input.tolerance);
        for &other in near.run.iter() {
            try_cf!(self.test(index, other, visitor));
        }
        for i in 0..self.verticals.len() {
            let vertical = self.verticals[i];
            try_cf!(self.test(index, vertical, visitor));
        }

        let above = self.status.above(index);
        let below = self.status.below(index);
        self.status.remove(index);
        self.verticals.retain(|&v| v != index);
        if let (Some(above), Some(below)) = (above, below) {
            try_cf!(self.test(above, below, visitor));
        }

        C::continuing()
    }

    fn cross<C, V>(&mut self, crossing: CrossingEvent, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SweepIntersectVisitor<C>,
    {
        if !(self.status.contains(crossing.a) && self.status.contains(crossing.b)) {
            return C::continuing();
        }

        let input = self.input;
        let segments = &input.segments;
        self.sweep_x = crossing.x;
        let p = crossing.point;
        let near = self
            .status
            .neighbourhood(segments, crossing.a, p.x, p.y, p.y, input.tolerance);
        if !near.run.contains(&crossing.b) {
            log::trace!(
                "crossing of edges {} and {} at {:?} skipped, segments not adjacent",
                segments[crossing.a].ordinal,
                segments[crossing.b].ordinal,
                p
            );
            return C::continuing();
        }

        // every segment through the point meets every other there
        for i in 0..near.run.len() {
            for j in (i + 1)..near.run.len() {
                try_cf!(self.test(near.run[i], near.run[j], visitor));
            }
        }

        let mut order = near.run.clone();
        order.sort_by(|&a, &b| compare_after(&segments[a], a, &segments[b], b));
        self.status.reorder(&near.run, &order);

        if let (Some(&bottom), Some(below)) = (order.first(), near.below) {
            try_cf!(self.test(bottom, below, visitor));
        }
        if let (Some(&top), Some(above)) = (order.last(), near.above) {
            try_cf!(self.test(top, above, visitor));
        }

        C::continuing()
    }

    /// Test a segment pair once, report its intersections and queue an interior crossing.
    fn test<C, V>(&mut self, a: usize, b: usize, visitor: &mut V) -> C
    where
        C: ControlFlow,
        V: SweepIntersectVisitor<C>,
    {
        let key = if a < b { (a, b) } else { (b, a) };
        if a == b || !self.tested.insert(key) {
            return C::continuing();
        }

        let input = self.input;
        let s = &input.segments[a];
        let t = &input.segments[b];
        if s.is_ring_adjacent(t) {
            return C::continuing();
        }

        let tol = self.precision.tolerance(&[s.left, s.right, t.left, t.right]);
        if !s.envelope.intersects_xy_eps(&t.envelope, tol) {
            return C::continuing();
        }

        let (edge1, edge2) = if t.ordinal < s.ordinal {
            (t.ordinal, s.ordinal)
        } else {
            (s.ordinal, t.ordinal)
        };

        match segment_intersection(&s.left, &s.right, &t.left, &t.right, tol) {
            SegmentIntersection::None => {}
            SegmentIntersection::Point(point) => {
                if is_interior_crossing(s, t, &point) {
                    self.crossings.push(CrossingEvent {
                        x: point.x.max(self.sweep_x),
                        point,
                        a,
                        b,
                    });
                }
                try_cf!(visitor.visit_intr(SweepIntersection {
                    edge1,
                    edge2,
                    point
                }));
            }
            SegmentIntersection::Overlap(p0, p1) => {
                try_cf!(visitor.visit_intr(SweepIntersection {
                    edge1,
                    edge2,
                    point: p0
                }));
                try_cf!(visitor.visit_intr(SweepIntersection {
                    edge1,
                    edge2,
                    point: p1
                }));
            }
        }

        C::continuing()
    }
}

/// Returns `true` if two non vertical segments cross at `point` away from all their end points
/// (intersection points within tolerance of an end point are snapped to it).
fn is_interior_crossing(a: &SweepSegment, b: &SweepSegment, point: &Coordinate) -> bool {
    !a.is_vertical()
        && !b.is_vertical()
        && [a.left, a.right, b.left, b.right]
            .iter()
            .all(|e| e.x != point.x || e.y != point.y)
}
