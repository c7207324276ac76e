//! Geometry value types consumed by the algorithms and spatial indexes.
mod coordinate;
mod envelope;
mod orientation;
mod precision;
mod ring;
mod shapes;
mod spatial;

pub use coordinate::{Coordinate, CoordinateKey};
pub use envelope::Envelope;
pub use orientation::{orientation, ring_orientation, Orientation};
pub use precision::PrecisionModel;
pub use ring::{close_ring, distinct_point_count, open_ring};
pub(crate) use shapes::oriented_ring;
pub use shapes::{LineString, Polygon};
pub use spatial::Spatial;
