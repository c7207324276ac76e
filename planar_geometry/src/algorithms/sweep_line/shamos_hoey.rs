use super::{
    events::{EventKind, SweepInput, SweepSegment},
    status::SweepStatus,
};
use crate::{
    algorithms::segment_intersection::segment_intersection, geometry::PrecisionModel,
};

/// Shamos-Hoey sweep, returns `true` at the first pair of intersecting segments.
///
/// Only segments adjacent in the sweep status are tested: on insertion the new segment against
/// its neighbors, on removal the two neighbors that become adjacent. Neighbors passing within
/// tolerance of the event point are all tested, and vertical segments are tested against every
/// segment inserted or removed while they are active.
pub(crate) fn any_intersection(input: &SweepInput, precision: &PrecisionModel) -> bool {
    let segments = &input.segments;
    let mut status = SweepStatus::new(segments.len());
    let mut verticals: Vec<usize> = Vec::new();

    let test = |a: usize, b: usize| -> bool {
        let found = segments_intersect(&segments[a], &segments[b], precision);
        if found {
            log::trace!(
                "sweep found intersection between edges {} and {}",
                segments[a].ordinal,
                segments[b].ordinal
            );
        }
        found
    };

    for event in input.events.iter() {
        let index = event.segment;
        let s = &segments[index];
        match event.kind {
            EventKind::Left => {
                let x = s.left.x;
                status.insert(segments, index, x);
                log::trace!(
                    "sweep insert edge {} at x = {}, status size {}",
                    s.ordinal,
                    x,
                    status.len()
                );
                let (lo, hi) = s.span_at(x);
                let near = status.neighbourhood(segments, index, x, lo, hi, input.tolerance);
                if near.candidates(index).any(|other| test(index, other))
                    || verticals.iter().any(|&v| test(index, v))
                {
                    return true;
                }
                if s.is_vertical() {
                    verticals.push(index);
                }
            }
            EventKind::Right => {
                if !status.contains(index) {
                    debug_assert!(false, "right event for segment not in sweep status");
                    continue;
                }
                let x = s.right.x;
                let (lo, hi) = s.span_at(x);
                let near = status.neighbourhood(segments, index, x, lo, hi, input.tolerance);
                if near.run.iter().any(|&other| other != index && test(index, other))
                    || verticals.iter().any(|&v| v != index && test(index, v))
                {
                    return true;
                }
                if let (Some(above), Some(below)) = (status.above(index), status.below(index)) {
                    if test(above, below) {
                        return true;
                    }
                }
                status.remove(index);
                verticals.retain(|&v| v != index);
            }
        }
    }

    false
}

/// Returns `true` if two segments intersect and are not consecutive edges of the same ring.
pub(crate) fn segments_intersect(
    a: &SweepSegment,
    b: &SweepSegment,
    precision: &PrecisionModel,
) -> bool {
    if a.is_ring_adjacent(b) {
        return false;
    }

    let tol = precision.tolerance(&[a.left, a.right, b.left, b.right]);
    if !a.envelope.intersects_xy_eps(&b.envelope, tol) {
        return false;
    }

    !segment_intersection(&a.left, &a.right, &b.left, &b.right, tol).is_none()
}
