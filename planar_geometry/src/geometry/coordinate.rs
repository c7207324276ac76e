use crate::core::math::Vector2;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position with x, y and z components.
///
/// Planar algorithms only read `x` and `y`, `z` is carried along (and used by the spatial
/// indexes when not degenerate). Equality is exact component equality, use
/// [PrecisionModel::are_equal](crate::geometry::PrecisionModel::are_equal) for tolerance based
/// comparisons.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: f64,
}

impl Coordinate {
    /// Create a new planar coordinate (z = 0).
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y, z: 0.0 }
    }

    #[inline]
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Coordinate { x, y, z }
    }

    /// Returns `true` if all components are finite (not NaN or infinite).
    ///
    /// # Examples
    ///
    /// ```
    /// # use planar_geometry::geometry::*;
    /// assert!(Coordinate::new(1.0, 2.0).is_valid());
    /// assert!(!Coordinate::new(f64::NAN, 2.0).is_valid());
    /// assert!(!Coordinate::new_3d(0.0, 0.0, f64::INFINITY).is_valid());
    /// ```
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The planar (x, y) part as a vector.
    #[inline]
    pub fn xy(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Component by dimension index (0 = x, 1 = y, anything else = z).
    #[inline]
    pub fn get(&self, dimension: usize) -> f64 {
        match dimension {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Planar distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.xy() - other.xy()).length()
    }

    /// Squared distance to `other` over the first `dimension` components (2 or 3).
    #[inline]
    pub fn distance_squared_in(&self, other: &Coordinate, dimension: usize) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let mut d = dx * dx + dy * dy;
        if dimension > 2 {
            let dz = self.z - other.z;
            d += dz * dz;
        }
        d
    }

    /// Exact hash key for this coordinate, see [CoordinateKey].
    #[inline]
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::new(self)
    }
}

impl From<Vector2<f64>> for Coordinate {
    #[inline]
    fn from(v: Vector2<f64>) -> Self {
        Coordinate::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.z == 0.0 {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "({}, {}, {})", self.x, self.y, self.z)
        }
    }
}

/// Hashable key with exact value identity for a [Coordinate].
///
/// Two coordinates produce the same key only if their components are bitwise equal (with `-0.0`
/// folded into `0.0`). Nearby coordinates must be snapped to one canonical value before being
/// used as keys, the key itself never applies a tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey([u64; 3]);

impl CoordinateKey {
    #[inline]
    fn new(c: &Coordinate) -> Self {
        #[inline]
        fn bits(v: f64) -> u64 {
            if v == 0.0 {
                0.0f64.to_bits()
            } else {
                v.to_bits()
            }
        }
        CoordinateKey([bits(c.x), bits(c.y), bits(c.z)])
    }
}
