//! Tolerance aware intersection of two line segments.
use crate::{
    core::math::{point_from_parametric, seg_seg_intr, SegSegIntr},
    geometry::Coordinate,
};

/// Result of intersecting two segments, see [segment_intersection].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// Segments meet at a single point.
    Point(Coordinate),
    /// Segments are collinear and share the run between the two points (ordered along the first
    /// segment).
    Overlap(Coordinate, Coordinate),
}

impl SegmentIntersection {
    /// Returns `true` if there is no intersection.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, SegmentIntersection::None)
    }

    /// The intersection points (zero, one, or two).
    pub fn points(&self) -> Vec<Coordinate> {
        match *self {
            SegmentIntersection::None => Vec::new(),
            SegmentIntersection::Point(p) => vec![p],
            SegmentIntersection::Overlap(p0, p1) => vec![p0, p1],
        }
    }
}

/// Intersect segment `a0 -> a1` with segment `b0 -> b1`.
///
/// Intersection points within `tolerance` of any of the four segment end points are snapped to
/// that end point exactly, so intersections found at a shared vertex from different segment pairs
/// always produce the identical coordinate.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::algorithms::segment_intersection::*;
/// let a0 = Coordinate::new(0.0, 0.0);
/// let a1 = Coordinate::new(4.0, 4.0);
/// let b0 = Coordinate::new(0.0, 4.0);
/// let b1 = Coordinate::new(4.0, 0.0);
/// assert_eq!(
///     segment_intersection(&a0, &a1, &b0, &b1, 1e-9),
///     SegmentIntersection::Point(Coordinate::new(2.0, 2.0))
/// );
///
/// // result snaps to the end point when within tolerance
/// let b0 = Coordinate::new(4.0 + 1e-10, 4.0);
/// let b1 = Coordinate::new(8.0, 0.0);
/// assert_eq!(
///     segment_intersection(&a0, &a1, &b0, &b1, 1e-9),
///     SegmentIntersection::Point(a1)
/// );
/// ```
pub fn segment_intersection(
    a0: &Coordinate,
    a1: &Coordinate,
    b0: &Coordinate,
    b1: &Coordinate,
    tolerance: f64,
) -> SegmentIntersection {
    if !(a0.is_valid() && a1.is_valid() && b0.is_valid() && b1.is_valid()) {
        return SegmentIntersection::None;
    }

    let at = |t: f64| -> Coordinate {
        let p = point_from_parametric(a0.xy(), a1.xy(), t);
        Coordinate::new_3d(p.x, p.y, a0.z + (a1.z - a0.z) * t)
    };
    let snap = |p: Coordinate| snap_to_end_points(p, [a0, a1, b0, b1], tolerance);

    match seg_seg_intr(a0.xy(), a1.xy(), b0.xy(), b1.xy(), tolerance) {
        SegSegIntr::NoIntersect => SegmentIntersection::None,
        SegSegIntr::Point { seg1_t, .. } => SegmentIntersection::Point(snap(at(seg1_t))),
        SegSegIntr::Overlapping { seg1_t0, seg1_t1 } => {
            let p0 = snap(at(seg1_t0));
            let p1 = snap(at(seg1_t1));
            if p0 == p1 {
                SegmentIntersection::Point(p0)
            } else {
                SegmentIntersection::Overlap(p0, p1)
            }
        }
    }
}

fn snap_to_end_points(p: Coordinate, end_points: [&Coordinate; 4], tolerance: f64) -> Coordinate {
    let mut best: Option<(f64, Coordinate)> = None;
    for e in end_points {
        let d = e.distance(&p);
        if d <= tolerance && best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, *e));
        }
    }

    best.map_or(p, |(_, e)| e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_run() {
        let r = segment_intersection(
            &Coordinate::new(0.0, 0.0),
            &Coordinate::new(10.0, 0.0),
            &Coordinate::new(12.0, 0.0),
            &Coordinate::new(4.0, 0.0),
            1e-9,
        );
        assert_eq!(
            r,
            SegmentIntersection::Overlap(Coordinate::new(4.0, 0.0), Coordinate::new(10.0, 0.0))
        );
        assert_eq!(r.points().len(), 2);
    }

    #[test]
    fn shared_vertex() {
        let shared = Coordinate::new(3.0, 3.0);
        let r = segment_intersection(
            &Coordinate::new(0.0, 0.0),
            &shared,
            &shared,
            &Coordinate::new(6.0, 0.0),
            1e-9,
        );
        assert_eq!(r, SegmentIntersection::Point(shared));
    }

    #[test]
    fn none_for_invalid() {
        let r = segment_intersection(
            &Coordinate::new(f64::NAN, 0.0),
            &Coordinate::new(1.0, 0.0),
            &Coordinate::new(0.0, 0.0),
            &Coordinate::new(1.0, 0.0),
            1e-9,
        );
        assert!(r.is_none());
    }
}
