use super::{Coordinate, Envelope, LineString, Polygon};

/// Geometry that can be stored in a spatial index.
pub trait Spatial {
    /// Bounding envelope of the geometry.
    fn envelope(&self) -> Envelope;

    /// Single coordinate representing the geometry, used to rank it along a space filling curve.
    ///
    /// Defaults to the center of the envelope.
    fn representative_coordinate(&self) -> Coordinate {
        self.envelope().center()
    }
}

impl Spatial for Coordinate {
    #[inline]
    fn envelope(&self) -> Envelope {
        Envelope::from_coordinate(self)
    }

    #[inline]
    fn representative_coordinate(&self) -> Coordinate {
        *self
    }
}

impl Spatial for Envelope {
    #[inline]
    fn envelope(&self) -> Envelope {
        *self
    }
}

impl Spatial for LineString {
    #[inline]
    fn envelope(&self) -> Envelope {
        LineString::envelope(self)
    }
}

impl Spatial for Polygon {
    #[inline]
    fn envelope(&self) -> Envelope {
        Polygon::envelope(self)
    }
}
