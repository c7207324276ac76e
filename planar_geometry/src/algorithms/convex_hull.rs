//! Convex hull of a coordinate set.
use crate::{
    core::math::perp_dot_test_value,
    error::{GeometryError, Result},
    geometry::{close_ring, Coordinate},
};

/// Convex hull of `coords` using Andrew's monotone chain.
///
/// Returns a closed counter clockwise ring without collinear vertexes. Fails with
/// [GeometryError::TooFewPoints] if the hull has fewer than 3 vertexes (all input coordinates
/// coincident or collinear).
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::convex_hull::*;
/// # use planar_geometry::geometry::*;
/// let coords: Vec<_> = [(0.0, 0.0), (2.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 2.0), (1.0, 0.0)]
///     .iter()
///     .map(|&(x, y)| Coordinate::new(x, y))
///     .collect();
/// let hull = convex_hull(&coords).unwrap();
/// assert_eq!(
///     hull,
///     vec![
///         Coordinate::new(0.0, 0.0),
///         Coordinate::new(2.0, 0.0),
///         Coordinate::new(2.0, 2.0),
///         Coordinate::new(0.0, 2.0),
///         Coordinate::new(0.0, 0.0),
///     ]
/// );
/// ```
pub fn convex_hull(coords: &[Coordinate]) -> Result<Vec<Coordinate>> {
    if coords.iter().any(|c| !c.is_valid()) {
        return Err(GeometryError::InvalidCoordinate);
    }

    let mut sorted = coords.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| a.x == b.x && a.y == b.y);

    if sorted.len() < 3 {
        return Err(GeometryError::TooFewPoints {
            required: 3,
            found: sorted.len(),
        });
    }

    let mut hull: Vec<Coordinate> = Vec::with_capacity(2 * sorted.len());
    // lower chain
    for c in sorted.iter() {
        push_with_left_turn(&mut hull, *c, 2);
    }
    // upper chain
    let lower_len = hull.len() + 1;
    for c in sorted.iter().rev().skip(1) {
        push_with_left_turn(&mut hull, *c, lower_len);
    }
    // last point pushed is the first point again
    hull.pop();

    if hull.len() < 3 {
        return Err(GeometryError::TooFewPoints {
            required: 3,
            found: hull.len(),
        });
    }

    Ok(close_ring(hull))
}

fn push_with_left_turn(hull: &mut Vec<Coordinate>, c: Coordinate, min_len: usize) {
    while hull.len() >= min_len {
        let n = hull.len();
        if perp_dot_test_value(hull[n - 2].xy(), hull[n - 1].xy(), c.xy()) > 0.0 {
            break;
        }
        hull.pop();
    }
    hull.push(c);
}
