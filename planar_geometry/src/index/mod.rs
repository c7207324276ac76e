//! Mutable spatial indexes.
//!
//! [RTree] and [HilbertRTree] store any [Spatial] geometry and answer envelope queries, [KdTree]
//! stores bare coordinates and additionally answers nearest neighbour queries. Both R-tree variants
//! implement [SpatialIndex].
//!
//! None of the indexes lock internally, mutation requires `&mut self`.
mod arena;
mod hilbert;
mod kd_tree;
mod rtree;

pub use hilbert::{HilbertEncoder, HilbertRTree, SpaceFillingCurveEncoder};
pub use kd_tree::KdTree;
pub use rtree::RTree;

use crate::{
    core::traits::ControlFlow,
    error::Result,
    geometry::{Envelope, Spatial},
};

/// Trait for visiting items found by a spatial index query.
pub trait SpatialVisitor<G, C>
where
    C: ControlFlow,
{
    fn visit(&mut self, item: &G) -> C;
}

impl<G, C, F> SpatialVisitor<G, C> for F
where
    C: ControlFlow,
    F: FnMut(&G) -> C,
{
    #[inline]
    fn visit(&mut self, item: &G) -> C {
        self(item)
    }
}

/// Common operations of the geometry indexes.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::index::*;
/// fn fill<I: SpatialIndex<Coordinate>>(index: &mut I) {
///     for i in 0..20 {
///         index.insert(Coordinate::new(i as f64, i as f64)).unwrap();
///     }
/// }
///
/// let mut rtree = RTree::default();
/// let mut hilbert = HilbertRTree::new(6).unwrap();
/// fill(&mut rtree);
/// fill(&mut hilbert);
/// let query = Envelope::new(2.5, 2.5, 5.5, 5.5);
/// assert_eq!(rtree.search(&query).len(), 3);
/// assert_eq!(hilbert.search(&query).len(), 3);
/// ```
pub trait SpatialIndex<G>
where
    G: Spatial + PartialEq,
{
    /// Insert `item`, fails with [GeometryError::InvalidEnvelope](crate::GeometryError) if the
    /// item's envelope has a NaN or infinite component (the index is left unchanged).
    fn insert(&mut self, item: G) -> Result<()>;

    /// All items whose envelope intersects `envelope` (touching counts).
    fn search(&self, envelope: &Envelope) -> Vec<&G>;

    /// Returns `true` if an item equal to `item` is stored.
    fn contains(&self, item: &G) -> bool;

    /// Remove one item equal to `item`, returns `true` if one was found.
    fn remove(&mut self, item: &G) -> bool;

    /// Remove every item whose envelope intersects `envelope`.
    fn remove_in(&mut self, envelope: &Envelope) -> Vec<G>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
