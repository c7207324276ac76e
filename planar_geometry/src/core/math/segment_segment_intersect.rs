use super::{
    base_math::{dist_to_line, dist_to_line_seg, min_max, projected_parametric},
    Vector2,
};
use crate::core::traits::{FuzzyOrd, Real};

/// Holds the result of finding the intersect between two line segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegSegIntr<T>
where
    T: Real,
{
    /// Segments do not intersect.
    NoIntersect,
    /// Segments intersect at a single point.
    Point {
        /// Parametric value for the intersect on the first segment.
        seg1_t: T,
        /// Parametric value for the intersect on the second segment.
        seg2_t: T,
    },
    /// Segments are collinear and overlap along a run.
    Overlapping {
        /// Parametric value for the start of the overlap along the first segment.
        seg1_t0: T,
        /// Parametric value for the end of the overlap along the first segment.
        seg1_t1: T,
    },
}

/// Finds the intersect between two line segments `v1->v2` and `u1->u2`.
///
/// All fuzzy comparisons are done in length units using `epsilon` (a distance, not a parametric
/// delta), so the result is independent of segment length. Parametric values use the segment
/// equation `P(t) = p0 + t * (p1 - p0)` and are clamped to `[0, 1]`.
///
/// Degenerate (single point) segments are handled: a point segment intersects another segment if
/// it lies within `epsilon` of it.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::math::*;
/// let v1 = Vector2::new(0.0, 0.0);
/// let v2 = Vector2::new(2.0, 0.0);
/// let u1 = Vector2::new(1.0, -1.0);
/// let u2 = Vector2::new(1.0, 1.0);
/// if let SegSegIntr::Point { seg1_t, seg2_t } = seg_seg_intr(v1, v2, u1, u2, 1e-9) {
///     assert_eq!(seg1_t, 0.5);
///     assert_eq!(seg2_t, 0.5);
/// } else {
///     unreachable!("expected single point intersect");
/// }
///
/// // collinear overlap reported as a parametric range along the first segment
/// let u1 = Vector2::new(1.0, 0.0);
/// let u2 = Vector2::new(5.0, 0.0);
/// assert_eq!(
///     seg_seg_intr(v1, v2, u1, u2, 1e-9),
///     SegSegIntr::Overlapping { seg1_t0: 0.5, seg1_t1: 1.0 }
/// );
/// ```
pub fn seg_seg_intr<T>(
    v1: Vector2<T>,
    v2: Vector2<T>,
    u1: Vector2<T>,
    u2: Vector2<T>,
    epsilon: T,
) -> SegSegIntr<T>
where
    T: Real,
{
    use SegSegIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_len = v.length();
    let u_len = u.length();
    let v_is_point = v_len <= epsilon;
    let u_is_point = u_len <= epsilon;

    if v_is_point && u_is_point {
        if (v1 - u1).length() <= epsilon {
            return Point {
                seg1_t: T::zero(),
                seg2_t: T::zero(),
            };
        }
        return NoIntersect;
    }

    if v_is_point {
        if dist_to_line_seg(u1, u2, v1) <= epsilon {
            return Point {
                seg1_t: T::zero(),
                seg2_t: clamp_unit(projected_parametric(u1, u2, v1)),
            };
        }
        return NoIntersect;
    }

    if u_is_point {
        if dist_to_line_seg(v1, v2, u1) <= epsilon {
            return Point {
                seg1_t: clamp_unit(projected_parametric(v1, v2, u1)),
                seg2_t: T::zero(),
            };
        }
        return NoIntersect;
    }

    // collinear when both end points of the second segment lie on the line of the first
    if dist_to_line(v1, v2, u1) <= epsilon && dist_to_line(v1, v2, u2) <= epsilon {
        let (t0, t1) = min_max(
            projected_parametric(v1, v2, u1),
            projected_parametric(v1, v2, u2),
        );
        let slack = epsilon / v_len;
        if t1 < -slack || t0 > T::one() + slack {
            return NoIntersect;
        }

        let t0 = clamp_unit(t0);
        let t1 = clamp_unit(t1);
        if (t1 - t0) * v_len <= epsilon {
            // touching end to end
            let seg1_t = t0;
            let p = v1 + v.scale(seg1_t);
            return Point {
                seg1_t,
                seg2_t: clamp_unit(projected_parametric(u1, u2, p)),
            };
        }

        return Overlapping {
            seg1_t0: t0,
            seg1_t1: t1,
        };
    }

    let v_pdot_u = v.perp_dot(u);
    if v_pdot_u != T::zero() {
        let w = v1 - u1;
        let seg1_t = u.perp_dot(w) / v_pdot_u;
        let seg2_t = v.perp_dot(w) / v_pdot_u;
        let in_seg1 = (seg1_t * v_len).fuzzy_in_range_eps(T::zero(), v_len, epsilon);
        let in_seg2 = (seg2_t * u_len).fuzzy_in_range_eps(T::zero(), u_len, epsilon);
        if in_seg1 && in_seg2 {
            return Point {
                seg1_t: clamp_unit(seg1_t),
                seg2_t: clamp_unit(seg2_t),
            };
        }
    }

    // nearly parallel segments can still touch at an end point within epsilon even though the
    // line intersect lies far away
    for (p, on_first) in [(u1, true), (u2, true), (v1, false), (v2, false)] {
        if on_first {
            if dist_to_line_seg(v1, v2, p) <= epsilon {
                return Point {
                    seg1_t: clamp_unit(projected_parametric(v1, v2, p)),
                    seg2_t: if p == u1 { T::zero() } else { T::one() },
                };
            }
        } else if dist_to_line_seg(u1, u2, p) <= epsilon {
            return Point {
                seg1_t: if p == v1 { T::zero() } else { T::one() },
                seg2_t: clamp_unit(projected_parametric(u1, u2, p)),
            };
        }
    }

    NoIntersect
}

#[inline]
fn clamp_unit<T>(t: T) -> T
where
    T: Real,
{
    num_traits::real::Real::min(num_traits::real::Real::max(t, T::zero()), T::one())
}
