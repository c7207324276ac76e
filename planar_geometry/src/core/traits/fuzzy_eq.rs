/// Trait for fuzzy equality comparisons with floating point numbers.
///
/// Geometric predicates in this crate take their epsilon from a
/// [PrecisionModel](crate::geometry::PrecisionModel), the `*_eps` methods are what they call. The
/// default epsilon is only used by convenience methods and test assertions.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::traits::*;
/// let a = 0.1 + 0.2;
/// assert_ne!(a, 0.3);
/// assert!(a.fuzzy_eq(0.3));
/// assert!(!1.0f64.fuzzy_eq_eps(1.1, 0.05));
/// ```
pub trait FuzzyEq: Sized + Copy {
    /// Returns the default epsilon value for fuzzy comparisons.
    fn fuzzy_epsilon() -> Self;

    /// Returns `true` if this value is approximately equal to `other` within `fuzzy_epsilon`.
    fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    /// Same as [FuzzyEq::fuzzy_eq_eps] using [FuzzyEq::fuzzy_epsilon].
    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }
}

macro_rules! impl_fuzzy_eq {
    ($ty:ty, $eps:expr) => {
        impl FuzzyEq for $ty {
            #[inline]
            fn fuzzy_epsilon() -> Self {
                $eps
            }
            #[inline]
            fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                (*self - other).abs() <= fuzzy_epsilon
            }
        }
    };
}

impl_fuzzy_eq!(f32, 1.0e-6);
impl_fuzzy_eq!(f64, 1.0e-9);
