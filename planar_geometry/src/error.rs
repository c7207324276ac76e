//! Error type shared by all fallible operations in the crate.

/// Errors raised by geometry construction, algorithms, and spatial indexes.
///
/// Argument errors are raised at the call boundary before any state is mutated. Geometrically
/// undefined answers are not errors, they are returned as values (e.g.
/// [RelativeLocation::Undefined](crate::algorithms::winding_number::RelativeLocation::Undefined)).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A ring, line string or coordinate set has fewer distinct points than required.
    #[error("too few distinct points: {required} required, {found} found")]
    TooFewPoints { required: usize, found: usize },
    /// A coordinate component is NaN or infinite.
    #[error("coordinate has a NaN or infinite component")]
    InvalidCoordinate,
    /// An envelope has a NaN component or a minimum greater than its maximum.
    #[error("envelope has a NaN component or min greater than max")]
    InvalidEnvelope,
    /// R-tree child count bounds are out of range.
    #[error("invalid child bounds: min = {min}, max = {max} (requires 1 <= min <= max / 2)")]
    InvalidChildBounds { min: usize, max: usize },
    /// Hilbert R-tree maximum child count is not a positive multiple of 3.
    #[error("invalid maximum child count {max}, must be a positive multiple of 3")]
    HilbertMaxChildren { max: usize },
    /// Spatial dimension other than 2 or 3.
    #[error("unsupported dimension {dimension}, must be 2 or 3")]
    InvalidDimension { dimension: usize },
    /// Fixed precision model scale is not positive and finite.
    #[error("precision scale must be positive and finite")]
    InvalidPrecisionScale,
    /// Tolerance is negative, NaN or infinite.
    #[error("tolerance must be non-negative and finite")]
    InvalidTolerance,
    /// A clipping input polygon has intersecting boundary segments.
    #[error("input polygon {polygon} is self-intersecting")]
    SelfIntersectingPolygon {
        /// Which input polygon failed validation, `"a"` or `"b"`.
        polygon: &'static str,
    },
    /// A spatial index structural invariant does not hold.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeometryError>;
