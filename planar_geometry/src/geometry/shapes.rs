use super::{close_ring, distinct_point_count, open_ring, ring_orientation, Coordinate, Envelope};
use super::Orientation;
use crate::{
    algorithms::measures,
    error::{GeometryError, Result},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered sequence of coordinates forming connected line segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LineString {
    coordinates: Vec<Coordinate>,
}

impl LineString {
    /// Create a new line string, requires at least 2 distinct valid coordinates.
    pub fn new(coordinates: Vec<Coordinate>) -> Result<Self> {
        if coordinates.iter().any(|c| !c.is_valid()) {
            return Err(GeometryError::InvalidCoordinate);
        }

        let found = distinct_point_count(&coordinates);
        if found < 2 {
            return Err(GeometryError::TooFewPoints { required: 2, found });
        }

        Ok(LineString { coordinates })
    }

    #[inline]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Returns `true` if the first and last coordinates are equal.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.coordinates.first() == self.coordinates.last()
    }

    /// Total length of all segments.
    #[inline]
    pub fn length(&self) -> f64 {
        measures::path_length(&self.coordinates)
    }

    #[inline]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_coordinates(&self.coordinates).unwrap_or_default()
    }
}

impl AsRef<[Coordinate]> for LineString {
    #[inline]
    fn as_ref(&self) -> &[Coordinate] {
        &self.coordinates
    }
}

/// Polygon with a shell and zero or more holes.
///
/// All rings are stored closed (first coordinate == last coordinate). Construction validates the
/// rings but does not change their orientation, use [Polygon::normalized] to get the canonical
/// form (counter clockwise shell, clockwise holes) that clipping output always has.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Polygon {
    shell: Vec<Coordinate>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    holes: Vec<Vec<Coordinate>>,
}

impl Polygon {
    /// Create a new polygon from a shell and holes.
    ///
    /// Rings are closed if they are not already. Fails if any coordinate is invalid or any ring has
    /// fewer than 3 distinct vertexes.
    pub fn new(shell: Vec<Coordinate>, holes: Vec<Vec<Coordinate>>) -> Result<Self> {
        let shell = validated_ring(shell)?;
        let holes = holes
            .into_iter()
            .map(validated_ring)
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon { shell, holes })
    }

    /// Create a polygon without holes from (x, y) pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use planar_geometry::geometry::*;
    /// let triangle = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]).unwrap();
    /// assert_eq!(triangle.shell().len(), 4);
    /// assert_eq!(triangle.area(), 6.0);
    /// assert!(Polygon::from_xy(&[(0.0, 0.0), (1.0, 1.0)]).is_err());
    /// ```
    pub fn from_xy(points: &[(f64, f64)]) -> Result<Self> {
        Polygon::new(
            points.iter().map(|&(x, y)| Coordinate::new(x, y)).collect(),
            Vec::new(),
        )
    }

    /// Construct from rings already known to be closed and valid.
    pub(crate) fn from_closed_rings(shell: Vec<Coordinate>, holes: Vec<Vec<Coordinate>>) -> Self {
        debug_assert!(shell.first() == shell.last());
        Polygon { shell, holes }
    }

    /// Closed shell ring.
    #[inline]
    pub fn shell(&self) -> &[Coordinate] {
        &self.shell
    }

    /// Closed hole rings.
    #[inline]
    pub fn holes(&self) -> &[Vec<Coordinate>] {
        &self.holes
    }

    /// Split into (shell, holes).
    #[inline]
    pub fn into_rings(self) -> (Vec<Coordinate>, Vec<Vec<Coordinate>>) {
        (self.shell, self.holes)
    }

    /// Area enclosed by the shell minus the area of the holes (always non-negative).
    #[inline]
    pub fn area(&self) -> f64 {
        measures::polygon_area(&self.shell, &self.holes)
    }

    /// Signed area of the shell (positive if counter clockwise).
    #[inline]
    pub fn signed_area(&self) -> f64 {
        measures::ring_signed_area(&self.shell)
    }

    /// Area weighted centroid, see [measures::polygon_centroid].
    #[inline]
    pub fn centroid(&self) -> Coordinate {
        measures::polygon_centroid(&self.shell, &self.holes)
    }

    /// Total boundary length of the shell and holes.
    #[inline]
    pub fn perimeter(&self) -> f64 {
        measures::path_length(&self.shell)
            + self.holes.iter().map(|h| measures::path_length(h)).sum::<f64>()
    }

    #[inline]
    pub fn envelope(&self) -> Envelope {
        Envelope::from_coordinates(&self.shell).unwrap_or_default()
    }

    /// Returns a copy with the shell counter clockwise, holes clockwise, and consecutive duplicate
    /// vertexes removed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use planar_geometry::geometry::*;
    /// // clockwise shell
    /// let p = Polygon::from_xy(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]).unwrap();
    /// assert!(p.signed_area() < 0.0);
    /// let n = p.normalized();
    /// assert!(n.signed_area() > 0.0);
    /// assert_eq!(n.area(), p.area());
    /// ```
    pub fn normalized(&self) -> Polygon {
        Polygon {
            shell: oriented_ring(&self.shell, Orientation::CounterClockwise),
            holes: self
                .holes
                .iter()
                .map(|h| oriented_ring(h, Orientation::Clockwise))
                .collect(),
        }
    }
}

impl AsRef<[Coordinate]> for Polygon {
    /// The shell ring.
    #[inline]
    fn as_ref(&self) -> &[Coordinate] {
        &self.shell
    }
}

fn validated_ring(ring: Vec<Coordinate>) -> Result<Vec<Coordinate>> {
    if ring.iter().any(|c| !c.is_valid()) {
        return Err(GeometryError::InvalidCoordinate);
    }

    let found = distinct_point_count(&ring);
    if found < 3 {
        return Err(GeometryError::TooFewPoints { required: 3, found });
    }

    Ok(close_ring(ring))
}

/// Closed copy of `ring` with consecutive duplicates removed, reversed if its orientation is not
/// `target`.
pub(crate) fn oriented_ring(ring: &[Coordinate], target: Orientation) -> Vec<Coordinate> {
    let mut open = open_ring(ring);
    let current = ring_orientation(&open, 0.0);
    let flip = matches!(
        (current, target),
        (Orientation::Clockwise, Orientation::CounterClockwise)
            | (Orientation::CounterClockwise, Orientation::Clockwise)
    );
    if flip {
        open.reverse();
    }

    close_ring(open)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_with_hole() {
        let p = Polygon::new(
            ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![ring![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]],
        )
        .unwrap();
        assert_eq!(p.area(), 96.0);
        assert_eq!(p.perimeter(), 48.0);
        assert_eq!(p.envelope(), Envelope::new(0.0, 0.0, 10.0, 10.0));

        let n = p.normalized();
        assert!(n.signed_area() > 0.0);
        assert!(measures::ring_signed_area(&n.holes()[0]) < 0.0);
    }

    #[test]
    fn invalid_rings() {
        assert_eq!(
            Polygon::new(ring![(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)], Vec::new()),
            Err(GeometryError::TooFewPoints {
                required: 3,
                found: 2
            })
        );
        assert_eq!(
            Polygon::new(ring![(0.0, 0.0), (1.0, f64::NAN), (1.0, 1.0)], Vec::new()),
            Err(GeometryError::InvalidCoordinate)
        );
        assert_eq!(
            LineString::new(vec![Coordinate::new(1.0, 1.0)]),
            Err(GeometryError::TooFewPoints {
                required: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rings_are_closed() {
        let p = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).unwrap();
        assert_eq!(p.shell().first(), p.shell().last());
        let ls = LineString::new(ring![(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]).unwrap();
        assert!(ls.is_closed());
        assert_eq!(ls.length(), 12.0);
    }
}
