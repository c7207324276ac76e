/// Macro used for test assertions.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !$crate::core::traits::FuzzyEq::fuzzy_eq(left_val, *right_val) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !$crate::core::traits::FuzzyEq::fuzzy_eq_eps(left_val, *right_val, *eps_val) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Construct a closed coordinate ring from a list of (x, y) tuples.
///
/// The first coordinate is repeated at the end if it is not already there.
///
/// # Examples
///
/// ```
/// # use planar_geometry::ring;
/// # use planar_geometry::geometry::*;
/// let r = ring![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
/// assert_eq!(r.len(), 4);
/// assert_eq!(r[0], r[3]);
/// assert_eq!(r[1], Coordinate::new(1.0, 0.0));
/// ```
#[macro_export]
macro_rules! ring {
    ($( $x:expr ),* $(,)?) => {
        {
            let mut r = ::std::vec::Vec::<$crate::geometry::Coordinate>::new();
            $(
                r.push($crate::geometry::Coordinate::new($x.0, $x.1));
            )*
            if let (Some(first), Some(last)) = (r.first().copied(), r.last().copied()) {
                if first != last {
                    r.push(first);
                }
            }
            r
        }
    };
}

/// Construct a [Polygon](crate::geometry::Polygon) shell from a list of (x, y) tuples.
///
/// Expands to a `Result`, construction fails if the shell has fewer than 3 distinct points.
///
/// # Examples
///
/// ```
/// # use planar_geometry::polygon;
/// let square = polygon![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)].unwrap();
/// assert_eq!(square.area(), 4.0);
/// ```
#[macro_export]
macro_rules! polygon {
    ($( $x:expr ),* $(,)?) => {
        $crate::geometry::Polygon::new($crate::ring![$($x),*], ::std::vec::Vec::new())
    };
}

/// Internal macro used for try return on visitor control flow.
macro_rules! try_cf {
    ($e:expr) => {
        match $e {
            x => {
                if x.should_break() {
                    return x;
                }
            }
        }
    };
}
