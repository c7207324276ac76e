//! Point in ring classification using the winding number.
use crate::{
    core::math::{dist_to_line_seg, is_left},
    geometry::{distinct_point_count, Coordinate, Polygon, PrecisionModel},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Location of a coordinate relative to a ring or polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RelativeLocation {
    Interior,
    Exterior,
    /// Within tolerance of the boundary.
    Boundary,
    /// Input coordinate invalid or ring degenerate.
    Undefined,
}

/// Signed winding number of `ring` around `point` (planar).
///
/// Positive for counter clockwise rings enclosing the point, negative for clockwise, zero outside.
/// The ring may be open or closed. Points exactly on the boundary get an unspecified value, use
/// [classify_point] when boundary matters.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::winding_number::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let ccw = ring![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
/// assert_eq!(winding_number(&ccw, &Coordinate::new(1.0, 1.0)), 1);
/// assert_eq!(winding_number(&ccw, &Coordinate::new(3.0, 1.0)), 0);
/// let cw: Vec<_> = ccw.iter().rev().copied().collect();
/// assert_eq!(winding_number(&cw, &Coordinate::new(1.0, 1.0)), -1);
/// ```
pub fn winding_number(ring: &[Coordinate], point: &Coordinate) -> i32 {
    if ring.len() < 2 {
        return 0;
    }

    let p = point.xy();
    let mut winding = 0;
    for (a, b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        let (v1, v2) = (a.xy(), b.xy());
        if v1.y <= p.y {
            if v2.y > p.y && is_left(v1, v2, p) {
                // upward crossing with point left of edge
                winding += 1;
            }
        } else if v2.y <= p.y && !is_left(v1, v2, p) {
            // downward crossing with point right of edge
            winding -= 1;
        }
    }

    winding
}

/// Classify `point` relative to `ring` with boundary `tolerance`.
///
/// Points within `tolerance` of any edge are [RelativeLocation::Boundary], otherwise any non zero
/// winding number is [RelativeLocation::Interior].
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::winding_number::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let square = ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
/// let at = |x, y| classify_point(&square, &Coordinate::new(x, y), 1e-9);
/// assert_eq!(at(2.0, 2.0), RelativeLocation::Interior);
/// assert_eq!(at(4.0, 2.0), RelativeLocation::Boundary);
/// assert_eq!(at(5.0, 2.0), RelativeLocation::Exterior);
/// assert_eq!(
///     classify_point(&square, &Coordinate::new(f64::NAN, 2.0), 1e-9),
///     RelativeLocation::Undefined
/// );
/// ```
pub fn classify_point(ring: &[Coordinate], point: &Coordinate, tolerance: f64) -> RelativeLocation {
    if !point.is_valid() || ring.iter().any(|c| !c.is_valid()) || distinct_point_count(ring) < 3 {
        return RelativeLocation::Undefined;
    }

    let p = point.xy();
    let on_boundary = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .any(|(a, b)| dist_to_line_seg(a.xy(), b.xy(), p) <= tolerance);
    if on_boundary {
        return RelativeLocation::Boundary;
    }

    if winding_number(ring, point) != 0 {
        RelativeLocation::Interior
    } else {
        RelativeLocation::Exterior
    }
}

/// Classify `point` relative to a polygon with holes.
///
/// Points on a hole boundary are [RelativeLocation::Boundary], points inside a hole are
/// [RelativeLocation::Exterior].
pub fn classify_point_in_polygon(
    polygon: &Polygon,
    point: &Coordinate,
    tolerance: f64,
) -> RelativeLocation {
    match classify_point(polygon.shell(), point, tolerance) {
        RelativeLocation::Interior => {}
        other => return other,
    }

    for hole in polygon.holes() {
        match classify_point(hole, point, tolerance) {
            RelativeLocation::Interior => return RelativeLocation::Exterior,
            RelativeLocation::Boundary => return RelativeLocation::Boundary,
            RelativeLocation::Undefined => return RelativeLocation::Undefined,
            RelativeLocation::Exterior => {}
        }
    }

    RelativeLocation::Interior
}

/// Winding number classification of one coordinate against one ring, computed on demand and
/// cached until the coordinate is changed.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::winding_number::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let square = ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
/// let mut alg = WindingNumberAlgorithm::new(&square, Coordinate::new(1.0, 1.0));
/// assert_eq!(alg.result(), RelativeLocation::Interior);
/// alg.set_coordinate(Coordinate::new(0.0, 1.0));
/// assert_eq!(alg.result(), RelativeLocation::Boundary);
/// ```
#[derive(Debug, Clone)]
pub struct WindingNumberAlgorithm<'a> {
    ring: &'a [Coordinate],
    coordinate: Coordinate,
    precision: PrecisionModel,
    result: Option<RelativeLocation>,
}

impl<'a> WindingNumberAlgorithm<'a> {
    /// Create using the default precision model.
    pub fn new(ring: &'a [Coordinate], coordinate: Coordinate) -> Self {
        Self::with_precision(ring, coordinate, PrecisionModel::default())
    }

    pub fn with_precision(
        ring: &'a [Coordinate],
        coordinate: Coordinate,
        precision: PrecisionModel,
    ) -> Self {
        WindingNumberAlgorithm {
            ring,
            coordinate,
            precision,
            result: None,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Change the coordinate being classified, invalidates the cached result.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        if coordinate != self.coordinate {
            self.coordinate = coordinate;
            self.result = None;
        }
    }

    /// Relative location of the coordinate, computed on first call.
    pub fn result(&mut self) -> RelativeLocation {
        if let Some(r) = self.result {
            return r;
        }

        let tolerance = self.precision.tolerance(&[self.coordinate]);
        let r = classify_point(self.ring, &self.coordinate, tolerance);
        self.result = Some(r);
        r
    }

    /// Raw winding number of the ring around the coordinate.
    pub fn winding_number(&self) -> i32 {
        winding_number(self.ring, &self.coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concave_ring() {
        // U shape opening upward
        let u = ring![
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0)
        ];
        let at = |x, y| classify_point(&u, &Coordinate::new(x, y), 1e-9);
        assert_eq!(at(3.0, 4.0), RelativeLocation::Exterior);
        assert_eq!(at(1.0, 4.0), RelativeLocation::Interior);
        assert_eq!(at(3.0, 1.0), RelativeLocation::Interior);
        assert_eq!(at(3.0, 2.0), RelativeLocation::Boundary);
        // ray passes exactly through vertexes
        assert_eq!(at(-1.0, 6.0), RelativeLocation::Exterior);
        assert_eq!(at(5.0, 2.0), RelativeLocation::Interior);
    }

    #[test]
    fn polygon_with_hole() {
        let p = Polygon::new(
            ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![ring![(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)]],
        )
        .unwrap();
        let loc = |x, y| classify_point_in_polygon(&p, &Coordinate::new(x, y), 1e-9);
        assert_eq!(loc(2.0, 2.0), RelativeLocation::Interior);
        assert_eq!(loc(5.0, 5.0), RelativeLocation::Exterior);
        assert_eq!(loc(4.0, 5.0), RelativeLocation::Boundary);
        assert_eq!(loc(11.0, 5.0), RelativeLocation::Exterior);
    }

    #[test]
    fn degenerate_ring_is_undefined() {
        let line = ring![(0.0, 0.0), (1.0, 0.0)];
        assert_eq!(
            classify_point(&line, &Coordinate::new(0.5, 0.0), 1e-9),
            RelativeLocation::Undefined
        );
    }

    #[test]
    fn cached_result_invalidated() {
        let tri = ring![(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)];
        let mut alg = WindingNumberAlgorithm::new(&tri, Coordinate::new(3.0, 3.0));
        assert_eq!(alg.result(), RelativeLocation::Exterior);
        assert_eq!(alg.result(), RelativeLocation::Exterior);
        alg.set_coordinate(Coordinate::new(1.0, 1.0));
        assert_eq!(alg.result(), RelativeLocation::Interior);
        assert_eq!(alg.winding_number(), 1);
    }
}
