//! Helpers for coordinate rings (closed coordinate sequences).
use super::Coordinate;

/// Returns the ring with consecutive duplicate coordinates and the closing coordinate removed.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let closed = ring![(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
/// assert_eq!(closed.len(), 5);
/// let open = open_ring(&closed);
/// assert_eq!(open.len(), 3);
/// assert_eq!(close_ring(open), ring![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
/// ```
pub fn open_ring(ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut result: Vec<Coordinate> = Vec::with_capacity(ring.len());
    for c in ring {
        if result.last() != Some(c) {
            result.push(*c);
        }
    }

    while result.len() > 1 && result.first() == result.last() {
        result.pop();
    }

    result
}

/// Appends the first coordinate to the end of `ring` if it is not already closed.
pub fn close_ring(mut ring: Vec<Coordinate>) -> Vec<Coordinate> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }

    ring
}

/// Number of distinct vertexes of a ring (see [open_ring]).
pub fn distinct_point_count(ring: &[Coordinate]) -> usize {
    open_ring(ring).len()
}
