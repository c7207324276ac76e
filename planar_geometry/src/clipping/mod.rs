//! Greiner-Hormann polygon clipping with recursive hole resolution.
//!
//! [clip] splits two polygons into the region covered by both (internal clips), the region
//! covered only by the first (external A clips) and the region covered only by the second
//! (external B clips). Degenerate touching and overlapping boundaries are resolved topologically
//! (overlap runs, loop excision and repeated sub clips), coordinates are never perturbed.
//!
//! Output polygons are normalized: counter clockwise shells, clockwise holes, closed rings.
mod greiner_hormann;
mod holes;
mod intersection_table;
mod trace;
mod vertex_list;

use self::holes::PolygonClipper;
use crate::{
    algorithms::validity::boundary_intersects,
    error::{GeometryError, Result},
    geometry::{close_ring, oriented_ring, Coordinate, Orientation, Polygon, PrecisionModel},
};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [clip].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipOptions {
    /// Precision model used for every intersection and point location test.
    pub precision: PrecisionModel,
    /// Reject self intersecting input with [GeometryError::SelfIntersectingPolygon] (shell and
    /// holes are tested together with a Shamos-Hoey sweep). Clipping self intersecting polygons
    /// without this check gives unspecified output.
    pub validate_input: bool,
}

impl ClipOptions {
    #[inline]
    pub fn new() -> Self {
        Self {
            precision: PrecisionModel::default(),
            validate_input: true,
        }
    }

    #[inline]
    pub fn with_precision(precision: PrecisionModel) -> Self {
        Self {
            precision,
            ..Self::new()
        }
    }
}

impl Default for ClipOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Result of clipping polygon A with polygon B.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ClipResult {
    /// Regions inside both A and B.
    pub internal: Vec<Polygon>,
    /// Regions inside A and outside B.
    pub external_a: Vec<Polygon>,
    /// Regions inside B and outside A.
    pub external_b: Vec<Polygon>,
}

impl ClipResult {
    #[inline]
    pub fn internal_area(&self) -> f64 {
        self.internal.iter().map(Polygon::area).sum()
    }

    #[inline]
    pub fn external_a_area(&self) -> f64 {
        self.external_a.iter().map(Polygon::area).sum()
    }

    #[inline]
    pub fn external_b_area(&self) -> f64 {
        self.external_b.iter().map(Polygon::area).sum()
    }
}

/// Clip polygon `a` with polygon `b`.
///
/// # Examples
///
/// ```
/// # use planar_geometry::clipping::*;
/// # use planar_geometry::geometry::*;
/// let a = Polygon::new(
///     planar_geometry::ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
///     vec![planar_geometry::ring![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]],
/// )
/// .unwrap();
/// let b = Polygon::from_xy(&[(5.0, 0.0), (15.0, 0.0), (15.0, 10.0), (5.0, 10.0)]).unwrap();
/// let result = clip(&a, &b, &ClipOptions::new()).unwrap();
/// assert!((result.internal_area() - 48.0).abs() < 1e-9);
/// assert!((result.external_a_area() - 48.0).abs() < 1e-9);
/// assert!((result.external_b_area() - 52.0).abs() < 1e-9);
///
/// let bowtie = Polygon::from_xy(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]).unwrap();
/// assert!(clip(&bowtie, &b, &ClipOptions::new()).is_err());
/// ```
pub fn clip(a: &Polygon, b: &Polygon, options: &ClipOptions) -> Result<ClipResult> {
    let precision = &options.precision;
    if options.validate_input {
        ensure_simple(a, "a", precision)?;
        ensure_simple(b, "b", precision)?;
    }

    let (a, b) = match (prepare(a, precision), prepare(b, precision)) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => {
            return Ok(ClipResult {
                external_a: vec![a],
                ..Default::default()
            })
        }
        (None, Some(b)) => {
            return Ok(ClipResult {
                external_b: vec![b],
                ..Default::default()
            })
        }
        (None, None) => return Ok(ClipResult::default()),
    };

    debug!(
        "clipping {} vertexes with {} holes against {} vertexes with {} holes",
        a.shell().len() - 1,
        a.holes().len(),
        b.shell().len() - 1,
        b.holes().len()
    );

    PolygonClipper::new(*precision).clip(&a, &b)
}

impl Polygon {
    /// Clip with `other` using default [ClipOptions], see [clip].
    #[inline]
    pub fn clip(&self, other: &Polygon) -> Result<ClipResult> {
        clip(self, other, &ClipOptions::new())
    }

    /// Clip with `other` using the options given, see [clip].
    #[inline]
    pub fn clip_opt(&self, other: &Polygon, options: &ClipOptions) -> Result<ClipResult> {
        clip(self, other, options)
    }
}

fn ensure_simple(
    polygon: &Polygon,
    name: &'static str,
    precision: &PrecisionModel,
) -> Result<()> {
    let rings: Vec<&[Coordinate]> = std::iter::once(polygon.shell())
        .chain(polygon.holes().iter().map(|h| h.as_slice()))
        .collect();
    if boundary_intersects(&rings, precision)? {
        return Err(GeometryError::SelfIntersectingPolygon { polygon: name });
    }

    Ok(())
}

/// Normalized copy with coordinates made precise and vertexes closer than the tolerance merged.
/// `None` if the shell collapses, collapsed holes are dropped.
fn prepare(polygon: &Polygon, precision: &PrecisionModel) -> Option<Polygon> {
    let shell = clean_ring(polygon.shell(), precision, Orientation::CounterClockwise)?;
    let holes = polygon
        .holes()
        .iter()
        .filter_map(|h| clean_ring(h, precision, Orientation::Clockwise))
        .collect();
    Some(Polygon::from_closed_rings(shell, holes))
}

fn clean_ring(
    ring: &[Coordinate],
    precision: &PrecisionModel,
    target: Orientation,
) -> Option<Vec<Coordinate>> {
    let mut cleaned: Vec<Coordinate> = Vec::with_capacity(ring.len());
    for c in ring {
        let c = precision.make_precise(c);
        if cleaned.last().map_or(true, |last| !precision.are_equal(last, &c)) {
            cleaned.push(c);
        }
    }

    while cleaned.len() > 1 && precision.are_equal(&cleaned[0], &cleaned[cleaned.len() - 1]) {
        cleaned.pop();
    }

    if cleaned.len() < 3 {
        return None;
    }

    Some(oriented_ring(&close_ring(cleaned), target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default() {
        let options = ClipOptions::default();
        assert!(options.validate_input);
        assert_eq!(options.precision, PrecisionModel::floating());
        let fixed = PrecisionModel::fixed(100.0).unwrap();
        assert_eq!(ClipOptions::with_precision(fixed).precision, fixed);
    }

    #[test]
    fn prepare_merges_close_vertexes() {
        let pm = PrecisionModel::fixed(10.0).unwrap();
        let p = Polygon::from_xy(&[
            (0.0, 0.0),
            (0.0, 4.0),
            (4.0, 4.0),
            (4.01, 4.0),
            (4.0, 0.0),
        ])
        .unwrap();
        let prepared = prepare(&p, &pm).unwrap();
        // snapped to the grid, the duplicate removed and the shell made counter clockwise
        assert_eq!(prepared.shell().len(), 5);
        assert!(prepared.signed_area() > 0.0);
        assert_fuzzy_eq!(prepared.area(), 16.0);

        let sliver = Polygon::from_xy(&[(0.0, 0.0), (0.01, 0.0), (0.0, 0.01)]).unwrap();
        assert!(prepare(&sliver, &pm).is_none());
    }

    #[test]
    fn collapsed_input() {
        let pm = PrecisionModel::fixed(1.0).unwrap();
        let options = ClipOptions::with_precision(pm);
        let tiny = Polygon::from_xy(&[(0.0, 0.0), (0.1, 0.0), (0.1, 0.1)]).unwrap();
        let square = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
        let result = tiny.clip_opt(&square, &options).unwrap();
        assert!(result.internal.is_empty());
        assert!(result.external_a.is_empty());
        assert_eq!(result.external_b.len(), 1);
    }

    #[test]
    fn self_intersecting_input_rejected() {
        let bowtie = Polygon::from_xy(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]).unwrap();
        let square = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
        assert_eq!(
            square.clip(&bowtie),
            Err(GeometryError::SelfIntersectingPolygon { polygon: "b" })
        );
        assert_eq!(
            bowtie.clip(&square),
            Err(GeometryError::SelfIntersectingPolygon { polygon: "a" })
        );

        let mut options = ClipOptions::new();
        options.validate_input = false;
        assert!(bowtie.clip_opt(&square, &options).is_ok());
    }
}
