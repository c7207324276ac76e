use super::Coordinate;
use crate::core::math::min_max;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis aligned bounding box over coordinates.
///
/// Constructors order each axis so `min <= max` always holds for non NaN input.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Envelope {
    min_x: f64,
    min_y: f64,
    min_z: f64,
    max_x: f64,
    max_y: f64,
    max_z: f64,
}

impl Envelope {
    /// Create a planar envelope (z extent is zero).
    ///
    /// # Examples
    ///
    /// ```
    /// # use planar_geometry::geometry::*;
    /// // axis values are ordered on construction
    /// let e = Envelope::new(4.0, 0.0, 0.0, 2.0);
    /// assert_eq!(e.min_x(), 0.0);
    /// assert_eq!(e.max_x(), 4.0);
    /// assert_eq!(e.surface(), 8.0);
    /// ```
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Envelope::new_3d(x1, y1, 0.0, x2, y2, 0.0)
    }

    #[inline]
    pub fn new_3d(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        let (min_x, max_x) = min_max(x1, x2);
        let (min_y, max_y) = min_max(y1, y2);
        let (min_z, max_z) = min_max(z1, z2);
        Envelope {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Degenerate envelope around a single coordinate.
    #[inline]
    pub fn from_coordinate(c: &Coordinate) -> Self {
        Envelope {
            min_x: c.x,
            min_y: c.y,
            min_z: c.z,
            max_x: c.x,
            max_y: c.y,
            max_z: c.z,
        }
    }

    /// Envelope of a set of coordinates, `None` if the set is empty.
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coords.into_iter();
        let mut result = Envelope::from_coordinate(iter.next()?);
        for c in iter {
            result.expand_to_include_coordinate(c);
        }
        Some(result)
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[inline]
    pub fn min_z(&self) -> f64 {
        self.min_z
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    #[inline]
    pub fn max_z(&self) -> f64 {
        self.max_z
    }

    /// Minimum along dimension index (0 = x, 1 = y, anything else = z).
    #[inline]
    pub fn min(&self, dimension: usize) -> f64 {
        match dimension {
            0 => self.min_x,
            1 => self.min_y,
            _ => self.min_z,
        }
    }

    /// Maximum along dimension index (0 = x, 1 = y, anything else = z).
    #[inline]
    pub fn max(&self, dimension: usize) -> f64 {
        match dimension {
            0 => self.max_x,
            1 => self.max_y,
            _ => self.max_z,
        }
    }

    /// Returns `true` if no component is NaN or infinite.
    #[inline]
    pub fn is_valid(&self) -> bool {
        [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Returns `true` if the envelope has zero z extent.
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.min_z == self.max_z
    }

    /// Returns `true` if `other` lies entirely inside this envelope (boundaries inclusive).
    #[inline]
    pub fn contains(&self, other: &Envelope) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.min_z <= other.min_z
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
            && other.max_z <= self.max_z
    }

    /// Returns `true` if `c` lies inside this envelope (boundaries inclusive).
    #[inline]
    pub fn contains_coordinate(&self, c: &Coordinate) -> bool {
        self.min_x <= c.x
            && c.x <= self.max_x
            && self.min_y <= c.y
            && c.y <= self.max_y
            && self.min_z <= c.z
            && c.z <= self.max_z
    }

    /// Returns `true` if this envelope and `other` share at least one point (touching counts).
    #[inline]
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
            && self.min_z <= other.max_z
            && other.min_z <= self.max_z
    }

    /// Same as [Envelope::intersects] but only compares x and y, expanded by `tolerance`.
    #[inline]
    pub fn intersects_xy_eps(&self, other: &Envelope, tolerance: f64) -> bool {
        self.min_x <= other.max_x + tolerance
            && other.min_x <= self.max_x + tolerance
            && self.min_y <= other.max_y + tolerance
            && other.min_y <= self.max_y + tolerance
    }

    /// Smallest envelope containing both this envelope and `other`.
    #[inline]
    pub fn union(&self, other: &Envelope) -> Envelope {
        let mut result = *self;
        result.expand_to_include(other);
        result
    }

    #[inline]
    pub fn expand_to_include(&mut self, other: &Envelope) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.min_z = self.min_z.min(other.min_z);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
        self.max_z = self.max_z.max(other.max_z);
    }

    #[inline]
    pub fn expand_to_include_coordinate(&mut self, c: &Coordinate) {
        self.expand_to_include(&Envelope::from_coordinate(c));
    }

    /// Center point of the envelope.
    #[inline]
    pub fn center(&self) -> Coordinate {
        Coordinate::new_3d(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Planar (x, y) area of the envelope.
    #[inline]
    pub fn surface(&self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// Half perimeter of the envelope in the plane, used as a secondary size measure for
    /// degenerate (zero area) envelopes.
    #[inline]
    pub fn margin(&self) -> f64 {
        (self.max_x - self.min_x) + (self.max_y - self.min_y)
    }

    /// Increase in [Envelope::surface] needed to include `other`.
    #[inline]
    pub fn enlargement(&self, other: &Envelope) -> f64 {
        self.union(other).surface() - self.surface()
    }
}
