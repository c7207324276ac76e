use super::Vector2;
use crate::core::traits::Real;

/// Returns the (min, max) values from `v1` and `v2`.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::math::*;
/// let (min_val, max_val) = min_max(8, 4);
/// assert_eq!(min_val, 4);
/// assert_eq!(max_val, 8);
/// ```
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Distance squared between the points `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Midpoint of a line segment defined by `p0` to `p1`.
#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

/// Returns the point on the line segment going from `p0` to `p1` at parametric value `t`.
#[inline]
pub fn point_from_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Returns the parametric value of the projection of `point` onto the line through `p0` and `p1`.
///
/// Unlike a closest point query the result is not clamped to `[0, 1]`. If `p0` and `p1` are the
/// same point then zero is returned.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::math::*;
/// let p0 = Vector2::new(0.0, 0.0);
/// let p1 = Vector2::new(2.0, 0.0);
/// assert_eq!(projected_parametric(p0, p1, Vector2::new(1.0, 5.0)), 0.5);
/// assert_eq!(projected_parametric(p0, p1, Vector2::new(-2.0, 1.0)), -1.0);
/// ```
#[inline]
pub fn projected_parametric<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let v = p1 - p0;
    let len_sq = v.length_squared();
    if len_sq == T::zero() {
        return T::zero();
    }

    (point - p0).dot(v) / len_sq
}

/// Returns the closest point on the line segment from `p0` to `p1` to the `point` given.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    // http://geomalgorithms.com/a02-_lines.html
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 <= T::zero() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 <= c1 {
        return p1;
    }

    p0 + v.scale(c1 / c2)
}

/// Distance from `point` to the closest point on the segment `p0` to `p1`.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::math::*;
/// let p0 = Vector2::new(0.0, 0.0);
/// let p1 = Vector2::new(4.0, 0.0);
/// assert_eq!(dist_to_line_seg(p0, p1, Vector2::new(2.0, 3.0)), 3.0);
/// // beyond the end point the distance is to the end point
/// assert_eq!(dist_to_line_seg(p0, p1, Vector2::new(7.0, 4.0)), 5.0);
/// ```
#[inline]
pub fn dist_to_line_seg<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    dist_squared(line_seg_closest_point(p0, p1, point), point).sqrt()
}

/// Perpendicular distance from `point` to the infinite line through `p0` and `p1`.
///
/// If `p0` and `p1` are the same point the distance to `p0` is returned.
#[inline]
pub fn dist_to_line<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    let len = (p1 - p0).length();
    if len == T::zero() {
        return dist_squared(p0, point).sqrt();
    }

    perp_dot_test_value(p0, p1, point).abs() / len
}

/// Twice the signed area of the triangle `p0`, `p1`, `point`.
///
/// Positive when `point` is left of the direction vector `p1 - p0`, negative when right, zero
/// when collinear.
#[inline]
pub fn perp_dot_test_value<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    (p1.x - p0.x) * (point.y - p0.y) - (p1.y - p0.y) * (point.x - p0.x)
}

/// Returns true if `point` is left of a direction vector.
///
/// Direction vector is defined as `p1 - p0`.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::math::*;
/// let p0 = Vector2::new(1.0, 1.0);
/// let p1 = Vector2::new(2.0, 2.0);
/// assert!(is_left(p0, p1, Vector2::new(0.0, 1.0)));
/// assert!(!is_left(p0, p1, Vector2::new(1.0, 0.0)));
/// ```
#[inline]
pub fn is_left<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> bool
where
    T: Real,
{
    perp_dot_test_value(p0, p1, point) > T::zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_clamps() {
        let p0 = Vector2::new(0.0, 0.0);
        let p1 = Vector2::new(10.0, 0.0);
        assert!(line_seg_closest_point(p0, p1, Vector2::new(-3.0, 1.0)).fuzzy_eq(p0));
        assert!(line_seg_closest_point(p0, p1, Vector2::new(13.0, 1.0)).fuzzy_eq(p1));
        assert!(line_seg_closest_point(p0, p1, Vector2::new(4.0, -2.0))
            .fuzzy_eq(Vector2::new(4.0, 0.0)));
    }

    #[test]
    fn closest_point_degenerate_segment() {
        let p = Vector2::new(1.0, 1.0);
        assert!(line_seg_closest_point(p, p, Vector2::new(5.0, 5.0)).fuzzy_eq(p));
        assert_eq!(dist_to_line(p, p, Vector2::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn distance_to_infinite_line() {
        let p0 = Vector2::new(0.0, 0.0);
        let p1 = Vector2::new(1.0, 1.0);
        let d = dist_to_line(p0, p1, Vector2::new(10.0, 0.0));
        assert!((d - 10.0 / 2.0f64.sqrt()).abs() < 1e-12);
    }
}
