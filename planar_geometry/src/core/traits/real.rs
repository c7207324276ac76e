use super::FuzzyOrd;
use static_aabb2d_index::IndexableNum;

/// Trait representing a real number that can be fuzzy compared and ordered.
///
/// The generic math in [crate::core::math] is written against this trait, the geometry layer
/// instantiates it with `f64`. `IndexableNum` lets the same values feed a
/// [StaticAABB2DIndex](static_aabb2d_index::StaticAABB2DIndex).
pub trait Real:
    num_traits::real::Real
    + num_traits::Bounded
    + FuzzyOrd
    + std::default::Default
    + std::fmt::Debug
    + IndexableNum
    + 'static
{
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn half() -> Self {
        Self::one() / Self::two()
    }
}

impl Real for f32 {
    #[inline]
    fn two() -> Self {
        2.0f32
    }

    #[inline]
    fn half() -> Self {
        0.5f32
    }
}

impl Real for f64 {
    #[inline]
    fn two() -> Self {
        2.0f64
    }

    #[inline]
    fn half() -> Self {
        0.5f64
    }
}
