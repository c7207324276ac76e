//! Polygon and ring validity checks.
use super::{
    sweep_line::{intersections, intersects, SweepLineOptions},
    winding_number::{classify_point, RelativeLocation},
};
use crate::{
    error::Result,
    geometry::{distinct_point_count, Coordinate, Polygon, PrecisionModel},
};
use std::collections::{hash_map::Entry, HashMap};

/// Reason a polygon is not valid, see [validate_polygon].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidityIssue {
    #[error("ring {ring} is not closed")]
    RingNotClosed { ring: usize },
    #[error("ring {ring} has fewer than 3 distinct points")]
    TooFewPoints { ring: usize },
    #[error("coordinate {0} has a NaN or infinite component")]
    InvalidCoordinate(Coordinate),
    #[error("polygon boundary self-intersects")]
    SelfIntersection,
    #[error("hole {hole} is not inside the shell")]
    HoleOutsideShell { hole: usize },
}

/// Returns `true` if the ring has at least 3 distinct points and no two non consecutive edges
/// intersect.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::validity::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let pm = PrecisionModel::default();
/// assert!(is_simple_ring(&ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)], &pm));
/// assert!(!is_simple_ring(&ring![(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)], &pm));
/// ```
pub fn is_simple_ring(ring: &[Coordinate], precision: &PrecisionModel) -> bool {
    if ring.iter().any(|c| !c.is_valid()) || distinct_point_count(ring) < 3 {
        return false;
    }

    matches!(
        intersects(&[ring], &SweepLineOptions::with_precision(*precision)),
        Ok(false)
    )
}

/// Validate a polygon: closed rings with at least 3 distinct valid coordinates, no ring touching
/// or crossing itself, two rings meeting at no more than a single point, every hole inside the
/// shell.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::validity::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let pm = PrecisionModel::default();
/// let shell = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
/// let hole = ring![(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0)];
/// let outside = ring![(20.0, 2.0), (20.0, 4.0), (24.0, 4.0)];
///
/// let valid = Polygon::new(shell.clone(), vec![hole]).unwrap();
/// assert_eq!(validate_polygon(&valid, &pm), Ok(()));
///
/// let invalid = Polygon::new(shell, vec![outside]).unwrap();
/// assert_eq!(
///     validate_polygon(&invalid, &pm),
///     Err(ValidityIssue::HoleOutsideShell { hole: 0 })
/// );
/// ```
pub fn validate_polygon(
    polygon: &Polygon,
    precision: &PrecisionModel,
) -> std::result::Result<(), ValidityIssue> {
    let rings: Vec<&[Coordinate]> = std::iter::once(polygon.shell())
        .chain(polygon.holes().iter().map(|h| h.as_slice()))
        .collect();

    for (i, ring) in rings.iter().enumerate() {
        if let Some(c) = ring.iter().find(|c| !c.is_valid()) {
            return Err(ValidityIssue::InvalidCoordinate(*c));
        }
        if ring.first() != ring.last() {
            return Err(ValidityIssue::RingNotClosed { ring: i });
        }
        if distinct_point_count(ring) < 3 {
            return Err(ValidityIssue::TooFewPoints { ring: i });
        }
    }

    match boundary_intersects(&rings, precision) {
        Ok(false) => {}
        _ => return Err(ValidityIssue::SelfIntersection),
    }

    // boundaries meet at single points at most, a hole is entirely inside or entirely outside
    let shell = polygon.shell();
    for (i, hole) in polygon.holes().iter().enumerate() {
        let location = hole
            .iter()
            .map(|c| classify_point(shell, c, precision.tolerance(std::slice::from_ref(c))))
            .find(|&location| location != RelativeLocation::Boundary);
        if location != Some(RelativeLocation::Interior) {
            return Err(ValidityIssue::HoleOutsideShell { hole: i });
        }
    }

    Ok(())
}

/// Returns `true` if the boundary `rings` of a polygon intersect in a way a valid polygon does not
/// allow: a ring touching or crossing itself, or two rings meeting at more than one point.
///
/// Two different rings may touch at a single point, crossings and overlaps always meet at two.
pub(crate) fn boundary_intersects(
    rings: &[&[Coordinate]],
    precision: &PrecisionModel,
) -> Result<bool> {
    let options = SweepLineOptions::with_precision(*precision);
    for ring in rings {
        if intersects(&[*ring], &options)? {
            return Ok(true);
        }
    }

    if rings.len() < 2 {
        return Ok(false);
    }

    let found = intersections(rings, &options)?;
    // first meeting point of each ring pair
    let mut touches: HashMap<(usize, usize), Coordinate> = HashMap::new();
    for (point, (edge1, edge2)) in found.iter() {
        let (Some((ring1, _)), Some((ring2, _))) =
            (found.edge_location(edge1), found.edge_location(edge2))
        else {
            continue;
        };

        match touches.entry((ring1, ring2)) {
            Entry::Vacant(entry) => {
                entry.insert(point);
            }
            Entry::Occupied(entry) => {
                if !precision.are_equal(entry.get(), &point) {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}

/// Returns `true` if [validate_polygon] finds no issue.
#[inline]
pub fn is_valid_polygon(polygon: &Polygon, precision: &PrecisionModel) -> bool {
    validate_polygon(polygon, precision).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hole_crossing_shell() {
        let pm = PrecisionModel::default();
        let p = Polygon::new(
            ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![ring![(8.0, 2.0), (12.0, 2.0), (12.0, 4.0), (8.0, 4.0)]],
        )
        .unwrap();
        assert_eq!(validate_polygon(&p, &pm), Err(ValidityIssue::SelfIntersection));
        assert!(!is_valid_polygon(&p, &pm));
    }

    #[test]
    fn rings_touching_at_one_point() {
        let pm = PrecisionModel::default();
        let shell = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

        let touching_shell = Polygon::new(
            shell.clone(),
            vec![ring![(0.0, 4.0), (4.0, 4.0), (4.0, 6.0)]],
        )
        .unwrap();
        assert_eq!(validate_polygon(&touching_shell, &pm), Ok(()));

        let touching_each_other = Polygon::new(
            shell.clone(),
            vec![
                ring![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)],
                ring![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)],
            ],
        )
        .unwrap();
        assert_eq!(validate_polygon(&touching_each_other, &pm), Ok(()));

        // spans the shell and touches both sides
        let touching_twice = Polygon::new(
            shell.clone(),
            vec![ring![(0.0, 4.0), (10.0, 4.0), (5.0, 6.0)]],
        )
        .unwrap();
        assert_eq!(
            validate_polygon(&touching_twice, &pm),
            Err(ValidityIssue::SelfIntersection)
        );

        // shares part of the shell's left edge
        let overlapping = Polygon::new(
            shell,
            vec![ring![(0.0, 4.0), (4.0, 5.0), (0.0, 6.0)]],
        )
        .unwrap();
        assert_eq!(
            validate_polygon(&overlapping, &pm),
            Err(ValidityIssue::SelfIntersection)
        );
    }

    #[test]
    fn self_intersecting_shell() {
        let pm = PrecisionModel::default();
        let p = Polygon::from_xy(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]).unwrap();
        assert_eq!(validate_polygon(&p, &pm), Err(ValidityIssue::SelfIntersection));
    }
}
