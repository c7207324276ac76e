use super::{open_ring, Coordinate};
use crate::{algorithms::measures::ring_signed_area, core::math::perp_dot_test_value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Turn direction of three coordinates, or of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
    /// Returned when an input coordinate is invalid or a ring is degenerate.
    Undefined,
}

/// Orientation of the turn `a -> b -> c`.
///
/// `c` is collinear if its distance to the line through `a` and `b` is within `tolerance`.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(1.0, 0.0);
/// let turn = |x, y| orientation(&a, &b, &Coordinate::new(x, y), 1e-9);
/// assert_eq!(turn(1.0, 1.0), Orientation::CounterClockwise);
/// assert_eq!(turn(1.0, -1.0), Orientation::Clockwise);
/// assert_eq!(turn(5.0, 1e-12), Orientation::Collinear);
/// assert_eq!(orientation(&a, &b, &Coordinate::new(f64::NAN, 0.0), 1e-9), Orientation::Undefined);
/// ```
pub fn orientation(a: &Coordinate, b: &Coordinate, c: &Coordinate, tolerance: f64) -> Orientation {
    if !a.is_valid() || !b.is_valid() || !c.is_valid() {
        return Orientation::Undefined;
    }

    let base = (b.xy() - a.xy()).length();
    if base <= tolerance {
        return Orientation::Collinear;
    }

    let signed_dist = perp_dot_test_value(a.xy(), b.xy(), c.xy()) / base;
    if signed_dist.abs() <= tolerance {
        Orientation::Collinear
    } else if signed_dist > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Orientation of a ring (closed or open) from the sign of its area.
///
/// Rings with fewer than 3 distinct vertexes or invalid coordinates are `Undefined`, rings whose
/// area is within `tolerance` of zero (relative to their length) are `Collinear`.
pub fn ring_orientation(ring: &[Coordinate], tolerance: f64) -> Orientation {
    if ring.iter().any(|c| !c.is_valid()) {
        return Orientation::Undefined;
    }

    let open = open_ring(ring);
    if open.len() < 3 {
        return Orientation::Undefined;
    }

    let area = ring_signed_area(&open);
    let perimeter: f64 = open
        .iter()
        .zip(open.iter().cycle().skip(1))
        .map(|(a, b)| a.distance(b))
        .sum();

    if area.abs() <= tolerance * perimeter {
        Orientation::Collinear
    } else if area > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_orientations() {
        let ccw = ring![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(ring_orientation(&ccw, 1e-9), Orientation::CounterClockwise);
        assert_eq!(ring_orientation(&cw, 1e-9), Orientation::Clockwise);

        let flat = ring![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        assert_eq!(ring_orientation(&flat, 1e-9), Orientation::Collinear);

        let two_points = ring![(0.0, 0.0), (1.0, 0.0)];
        assert_eq!(ring_orientation(&two_points, 1e-9), Orientation::Undefined);
    }

    #[test]
    fn coincident_base_is_collinear() {
        let a = Coordinate::new(1.0, 1.0);
        assert_eq!(
            orientation(&a, &a, &Coordinate::new(5.0, 3.0), 1e-9),
            Orientation::Collinear
        );
    }
}
