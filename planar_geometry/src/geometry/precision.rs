use super::Coordinate;
use crate::error::{GeometryError, Result};

/// Default base tolerance of the floating precision model.
const DEFAULT_FLOATING_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PrecisionKind {
    Floating { tolerance: f64 },
    Fixed { scale: f64 },
}

/// Tolerance policy used by every tolerance-aware predicate in the crate.
///
/// * Floating: coordinates are used as given, the tolerance is a base tolerance scaled up by the
///   magnitude of the coordinates being compared (so large coordinates get a proportionally
///   larger slack).
/// * Fixed: coordinates are snapped to a grid of `1 / scale`, the tolerance is half a grid cell.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// let floating = PrecisionModel::default();
/// let a = Coordinate::new(1.0, 1.0);
/// let b = Coordinate::new(1.0 + 1e-12, 1.0);
/// assert!(floating.are_equal(&a, &b));
///
/// let fixed = PrecisionModel::fixed(100.0).unwrap();
/// assert_eq!(fixed.make_precise(&Coordinate::new(1.234, 5.678)), Coordinate::new(1.23, 5.68));
/// assert_eq!(fixed.tolerance(&[a, b]), 0.005);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionModel {
    kind: PrecisionKind,
}

impl PrecisionModel {
    /// Floating precision model with the default base tolerance.
    pub fn floating() -> Self {
        PrecisionModel {
            kind: PrecisionKind::Floating {
                tolerance: DEFAULT_FLOATING_TOLERANCE,
            },
        }
    }

    /// Floating precision model with a custom base tolerance.
    pub fn floating_with_tolerance(tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(GeometryError::InvalidTolerance);
        }

        Ok(PrecisionModel {
            kind: PrecisionKind::Floating { tolerance },
        })
    }

    /// Fixed precision model snapping coordinates to multiples of `1 / scale`.
    pub fn fixed(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeometryError::InvalidPrecisionScale);
        }

        Ok(PrecisionModel {
            kind: PrecisionKind::Fixed { scale },
        })
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, PrecisionKind::Fixed { .. })
    }

    /// Tolerance independent of any coordinate magnitude.
    #[inline]
    pub fn base_tolerance(&self) -> f64 {
        match self.kind {
            PrecisionKind::Floating { tolerance } => tolerance,
            PrecisionKind::Fixed { scale } => 0.5 / scale,
        }
    }

    /// Tolerance to use when comparing the `coords` given.
    pub fn tolerance(&self, coords: &[Coordinate]) -> f64 {
        match self.kind {
            PrecisionKind::Floating { tolerance } => {
                let magnitude = coords
                    .iter()
                    .flat_map(|c| [c.x.abs(), c.y.abs(), c.z.abs()])
                    .filter(|v| v.is_finite())
                    .fold(1.0f64, f64::max);
                tolerance * magnitude
            }
            PrecisionKind::Fixed { scale } => 0.5 / scale,
        }
    }

    /// Round a scalar value to this precision model.
    #[inline]
    pub fn make_precise_value(&self, value: f64) -> f64 {
        match self.kind {
            PrecisionKind::Floating { .. } => value,
            PrecisionKind::Fixed { scale } => (value * scale).round() / scale,
        }
    }

    /// Round a coordinate to this precision model.
    #[inline]
    pub fn make_precise(&self, c: &Coordinate) -> Coordinate {
        Coordinate::new_3d(
            self.make_precise_value(c.x),
            self.make_precise_value(c.y),
            self.make_precise_value(c.z),
        )
    }

    /// Returns `true` if each component of `a` and `b` differs by at most the tolerance.
    #[inline]
    pub fn are_equal(&self, a: &Coordinate, b: &Coordinate) -> bool {
        let tol = self.tolerance(&[*a, *b]);
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol && (a.z - b.z).abs() <= tol
    }

    /// Returns `true` if the scalars `a` and `b` differ by at most the tolerance for their
    /// magnitude.
    #[inline]
    pub fn are_equal_values(&self, a: f64, b: f64) -> bool {
        let tol = self.tolerance(&[Coordinate::new(a, b)]);
        (a - b).abs() <= tol
    }
}

impl Default for PrecisionModel {
    #[inline]
    fn default() -> Self {
        PrecisionModel::floating()
    }
}
