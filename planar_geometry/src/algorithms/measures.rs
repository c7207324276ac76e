//! Simple measures over coordinate rings and paths.
use crate::{
    core::math::dist_to_line_seg,
    geometry::{open_ring, Coordinate},
};

/// Signed area of a ring, positive if counter clockwise.
///
/// The ring may be given open or closed.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::measures::*;
/// # use planar_geometry::ring;
/// let ccw = ring![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
/// assert_eq!(ring_signed_area(&ccw), 4.0);
/// let cw: Vec<_> = ccw.iter().rev().copied().collect();
/// assert_eq!(ring_signed_area(&cw), -4.0);
/// ```
pub fn ring_signed_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    // relative to the first vertex to reduce round off for coordinates far from the origin
    let origin = ring[0];
    let mut double_area = 0.0;
    for (a, b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        let (ax, ay) = (a.x - origin.x, a.y - origin.y);
        let (bx, by) = (b.x - origin.x, b.y - origin.y);
        double_area += ax * by - bx * ay;
    }

    double_area / 2.0
}

/// Absolute area enclosed by a ring.
#[inline]
pub fn ring_area(ring: &[Coordinate]) -> f64 {
    ring_signed_area(ring).abs()
}

/// Area of a shell minus the area of its holes, clamped to zero.
pub fn polygon_area(shell: &[Coordinate], holes: &[Vec<Coordinate>]) -> f64 {
    let holes_area: f64 = holes.iter().map(|h| ring_area(h)).sum();
    (ring_area(shell) - holes_area).max(0.0)
}

/// Length of a path (sum of segment lengths, no implicit closing segment).
pub fn path_length(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Area weighted centroid of a ring.
///
/// Falls back to the average of the distinct vertexes if the ring has zero area.
pub fn ring_centroid(ring: &[Coordinate]) -> Coordinate {
    let (cx, cy, area) = weighted_centroid(ring);
    if area != 0.0 {
        return Coordinate::new(cx / area, cy / area);
    }

    vertex_average(ring)
}

/// Area weighted centroid of a polygon with holes.
///
/// Falls back to the average of the distinct shell vertexes if the polygon has zero area.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::measures::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::ring;
/// let shell = ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
/// assert_eq!(polygon_centroid(&shell, &[]), Coordinate::new(2.0, 2.0));
/// // hole on the right half moves the centroid left
/// let hole = ring![(2.0, 0.0), (2.0, 4.0), (4.0, 4.0), (4.0, 0.0)];
/// assert_eq!(polygon_centroid(&shell, &[hole]), Coordinate::new(1.0, 2.0));
/// ```
pub fn polygon_centroid(shell: &[Coordinate], holes: &[Vec<Coordinate>]) -> Coordinate {
    let (mut cx, mut cy, shell_area) = weighted_centroid(shell);
    // normalize so the shell contributes positively and holes negatively regardless of the
    // orientation they were given in
    let sign = if shell_area < 0.0 { -1.0 } else { 1.0 };
    cx *= sign;
    cy *= sign;
    let mut area = shell_area * sign;
    for h in holes {
        let (hx, hy, ha) = weighted_centroid(h);
        let hole_sign = if ha < 0.0 { -1.0 } else { 1.0 };
        cx -= hx * hole_sign;
        cy -= hy * hole_sign;
        area -= ha * hole_sign;
    }

    if area != 0.0 {
        return Coordinate::new(cx / area, cy / area);
    }

    vertex_average(shell)
}

/// Distance from `point` to the segment `a` to `b` (planar).
#[inline]
pub fn point_segment_distance(point: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    dist_to_line_seg(a.xy(), b.xy(), point.xy())
}

/// Returns (sum of x * area, sum of y * area, signed area) of the ring's triangle fan.
fn weighted_centroid(ring: &[Coordinate]) -> (f64, f64, f64) {
    if ring.len() < 3 {
        return (0.0, 0.0, 0.0);
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut double_area = 0.0;
    for (a, b) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        let cross = a.x * b.y - b.x * a.y;
        double_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    let area = double_area / 2.0;
    (cx / 6.0, cy / 6.0, area)
}

fn vertex_average(ring: &[Coordinate]) -> Coordinate {
    let open = open_ring(ring);
    if open.is_empty() {
        return Coordinate::default();
    }

    let n = open.len() as f64;
    let (sx, sy) = open
        .iter()
        .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
    Coordinate::new(sx / n, sy / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_inputs() {
        assert_eq!(ring_signed_area(&[]), 0.0);
        let line = ring![(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)];
        assert_eq!(ring_area(&line), 0.0);
        assert_eq!(ring_centroid(&line), Coordinate::new(2.0, 0.0));
    }

    #[test]
    fn triangle_centroid() {
        let tri = ring![(0.0, 0.0), (3.0, 0.0), (0.0, 3.0)];
        assert_eq!(ring_centroid(&tri), Coordinate::new(1.0, 1.0));
        assert_eq!(path_length(&ring![(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]), 12.0);
    }

    #[test]
    fn segment_distance() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(10.0, 0.0);
        assert_eq!(point_segment_distance(&Coordinate::new(5.0, 2.0), &a, &b), 2.0);
        assert_eq!(point_segment_distance(&Coordinate::new(-3.0, 4.0), &a, &b), 5.0);
    }
}
