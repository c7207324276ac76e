//! Plane sweep intersection detection over sets of coordinate rings.
//!
//! [intersects] is a fail fast Shamos-Hoey test, [intersections] and [visit_intersections]
//! enumerate every intersection (Bentley-Ottmann style sweep) with the pair of global edge
//! ordinals that produced it.
//!
//! Input rings whose first and last coordinates are equal are treated as closed, any other input
//! is an open polyline. The global ordinal of an edge is the sum of the segment counts of the
//! rings before it plus the index of the edge's start coordinate in its ring, see
//! [SweepIntersections::edge_location]. Intersections between two edges that are consecutive in
//! the same ring (and so share a ring vertex) are never reported.
mod bentley_ottmann;
mod events;
mod shamos_hoey;
mod status;

use crate::{
    core::traits::ControlFlow,
    error::Result,
    geometry::{Coordinate, PrecisionModel},
};

pub(crate) use bentley_ottmann::visit_segment_intersections;
pub(crate) use events::build_sweep_input;

/// Options for the sweep line functions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepLineOptions {
    /// Precision model used to compute the tolerance of every segment pair test.
    pub precision: PrecisionModel,
}

impl SweepLineOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_precision(precision: PrecisionModel) -> Self {
        SweepLineOptions { precision }
    }
}

/// Intersection at a single position between two edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepIntersection {
    /// Global ordinal of the first edge (always less than `edge2`).
    pub edge1: usize,
    /// Global ordinal of the second edge.
    pub edge2: usize,
    pub point: Coordinate,
}

/// Trait for visiting sweep line intersections.
pub trait SweepIntersectVisitor<C>
where
    C: ControlFlow,
{
    fn visit_intr(&mut self, intr: SweepIntersection) -> C;
}

impl<C, F> SweepIntersectVisitor<C> for F
where
    C: ControlFlow,
    F: FnMut(SweepIntersection) -> C,
{
    #[inline]
    fn visit_intr(&mut self, intr: SweepIntersection) -> C {
        self(intr)
    }
}

/// All intersections found by [intersections].
///
/// `positions[i]` was produced by the edges `edge_pairs[i]`. Collinear overlaps contribute both
/// end points of the shared run (two entries for the same edge pair).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepIntersections {
    pub positions: Vec<Coordinate>,
    pub edge_pairs: Vec<(usize, usize)>,
    ring_offsets: Vec<usize>,
}

impl SweepIntersections {
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over (position, edge pair).
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, (usize, usize))> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.edge_pairs.iter().copied())
    }

    /// Map a global edge ordinal back to (ring index, segment index within the ring).
    ///
    /// # Examples
    ///
    /// ```
    /// # use planar_geometry::algorithms::sweep_line::*;
    /// # use planar_geometry::ring;
    /// let a = ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
    /// let b = ring![(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)];
    /// let result = intersections(&[a, b], &SweepLineOptions::new()).unwrap();
    /// assert_eq!(result.len(), 2);
    /// for &(e1, e2) in &result.edge_pairs {
    ///     assert_eq!(result.edge_location(e1).unwrap().0, 0);
    ///     assert_eq!(result.edge_location(e2).unwrap().0, 1);
    /// }
    /// assert_eq!(result.edge_location(5), Some((1, 1)));
    /// ```
    pub fn edge_location(&self, ordinal: usize) -> Option<(usize, usize)> {
        let ring = self
            .ring_offsets
            .partition_point(|&offset| offset <= ordinal)
            .checked_sub(1)?;
        Some((ring, ordinal - self.ring_offsets[ring]))
    }
}

/// Returns `true` if any two edges of the `rings` cross, touch or overlap (Shamos-Hoey).
///
/// Stops at the first intersection found. Fails with
/// [TooFewPoints](crate::GeometryError::TooFewPoints) if a ring has fewer than 2 distinct
/// coordinates.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::sweep_line::*;
/// # use planar_geometry::ring;
/// let square = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
/// assert!(!intersects(&[square], &SweepLineOptions::new()).unwrap());
/// let bowtie = ring![(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)];
/// assert!(intersects(&[bowtie], &SweepLineOptions::new()).unwrap());
/// ```
pub fn intersects<R>(rings: &[R], options: &SweepLineOptions) -> Result<bool>
where
    R: AsRef<[Coordinate]>,
{
    let input = build_sweep_input(rings, global_tolerance(rings, &options.precision))?;
    Ok(shamos_hoey::any_intersection(&input, &options.precision))
}

/// Enumerate all intersections between edges of the `rings`.
pub fn intersections<R>(rings: &[R], options: &SweepLineOptions) -> Result<SweepIntersections>
where
    R: AsRef<[Coordinate]>,
{
    let input = build_sweep_input(rings, global_tolerance(rings, &options.precision))?;
    let mut positions = Vec::new();
    let mut edge_pairs = Vec::new();
    visit_segment_intersections(&input, &options.precision, &mut |intr: SweepIntersection| {
        positions.push(intr.point);
        edge_pairs.push((intr.edge1, intr.edge2));
    });

    Ok(SweepIntersections {
        positions,
        edge_pairs,
        ring_offsets: input.ring_offsets,
    })
}

/// Visit all intersections between edges of the `rings`, the visitor may stop the sweep early.
///
/// # Examples
///
/// ```
/// # use planar_geometry::algorithms::sweep_line::*;
/// # use planar_geometry::core::Control;
/// # use planar_geometry::ring;
/// let star = ring![(0.0, 0.0), (2.0, 6.0), (4.0, 0.0), (-1.0, 4.0), (5.0, 4.0)];
/// let mut count = 0;
/// visit_intersections(&[star], &SweepLineOptions::new(), &mut |_intr: SweepIntersection| {
///     count += 1;
///     if count == 2 {
///         return Control::Break(());
///     }
///     Control::Continue
/// })
/// .unwrap();
/// assert_eq!(count, 2);
/// ```
pub fn visit_intersections<R, C, V>(
    rings: &[R],
    options: &SweepLineOptions,
    visitor: &mut V,
) -> Result<C>
where
    R: AsRef<[Coordinate]>,
    C: ControlFlow,
    V: SweepIntersectVisitor<C>,
{
    let input = build_sweep_input(rings, global_tolerance(rings, &options.precision))?;
    Ok(visit_segment_intersections(&input, &options.precision, visitor))
}

/// Tolerance for the magnitude of all input coordinates.
pub(crate) fn global_tolerance<R>(rings: &[R], precision: &PrecisionModel) -> f64
where
    R: AsRef<[Coordinate]>,
{
    let magnitude = rings
        .iter()
        .flat_map(|r| r.as_ref().iter())
        .filter(|c| c.is_valid())
        .fold(Coordinate::default(), |m, c| {
            Coordinate::new(m.x.max(c.x.abs()), m.y.max(c.y.abs()))
        });
    precision.tolerance(&[magnitude])
}
