//! Hilbert curve ranks for coordinates.
use crate::{
    error::{GeometryError, Result},
    geometry::Coordinate,
};

/// Maps coordinates to positions along a space filling curve.
pub trait SpaceFillingCurveEncoder {
    /// Rank of `c` along the curve.
    fn encode(&self, c: &Coordinate) -> u128;
}

/// Bits per dimension of the curve.
const ORDER: u32 = 32;

/// Offset applied after scaling so negative coordinates land on the unsigned grid.
const OFFSET: f64 = (1u64 << (ORDER - 1)) as f64;

/// Hilbert curve encoder over 2 or 3 dimensions at 32 bits per dimension.
///
/// A component `v` is mapped to the grid cell `floor(v * scale + 2^31)`, clamped to the grid.
/// Ranks are therefore only order preserving for `|v * scale| < 2^31`, coordinates further out
/// collapse onto the grid border.
///
/// # Examples
///
/// ```
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::index::*;
/// let encoder = HilbertEncoder::new(2).unwrap();
/// let a = encoder.encode(&Coordinate::new(-3.0, 4.0));
/// let b = encoder.encode(&Coordinate::new(-3.0, 4.0));
/// assert_eq!(a, b);
/// assert!(HilbertEncoder::new(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilbertEncoder {
    dimension: usize,
    scale: f64,
}

impl Default for HilbertEncoder {
    /// Planar encoder with unit scale.
    fn default() -> Self {
        HilbertEncoder {
            dimension: 2,
            scale: 1.0,
        }
    }
}

impl HilbertEncoder {
    /// Encoder with unit scale, `dimension` must be 2 or 3.
    pub fn new(dimension: usize) -> Result<Self> {
        HilbertEncoder::with_scale(dimension, 1.0)
    }

    /// Encoder multiplying components by `scale` before snapping them to the grid, a larger
    /// scale separates closer coordinates at the cost of a smaller coordinate range.
    pub fn with_scale(dimension: usize, scale: f64) -> Result<Self> {
        if dimension != 2 && dimension != 3 {
            return Err(GeometryError::InvalidDimension { dimension });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeometryError::InvalidPrecisionScale);
        }

        Ok(HilbertEncoder { dimension, scale })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    fn grid_value(&self, v: f64) -> u32 {
        // float to int casts saturate (NaN maps to 0)
        (v * self.scale + OFFSET).floor() as u32
    }
}

impl SpaceFillingCurveEncoder for HilbertEncoder {
    fn encode(&self, c: &Coordinate) -> u128 {
        let mut axes = [self.grid_value(c.x), self.grid_value(c.y), 0];
        if self.dimension == 3 {
            axes[2] = self.grid_value(c.z);
        }
        hilbert_index(&mut axes[..self.dimension], ORDER)
    }
}

/// Hilbert index of the grid cell `axes` on a curve of `bits` bits per axis.
///
/// Uses Skilling's transform ("Programming the Hilbert curve", 2004): the axes are converted in
/// place to the transposed index, whose bits are then interleaved with axis 0 most significant.
pub(crate) fn hilbert_index(axes: &mut [u32], bits: u32) -> u128 {
    debug_assert!(bits >= 1 && bits <= 32);
    debug_assert!(axes.len() as u32 * bits <= 128);
    let n = axes.len();
    let m: u32 = 1 << (bits - 1);

    // inverse undo
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..n {
            if axes[i] & q != 0 {
                axes[0] ^= p;
            } else {
                let t = (axes[0] ^ axes[i]) & p;
                axes[0] ^= t;
                axes[i] ^= t;
            }
        }
        q >>= 1;
    }

    // gray encode
    for i in 1..n {
        axes[i] ^= axes[i - 1];
    }
    let mut t = 0;
    let mut q = m;
    while q > 1 {
        if axes[n - 1] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for a in axes.iter_mut() {
        *a ^= t;
    }

    let mut index: u128 = 0;
    for bit in (0..bits).rev() {
        for a in axes.iter() {
            index = (index << 1) | u128::from((a >> bit) & 1);
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cells of a full curve of `bits` bits in `dim` dimensions sorted by Hilbert index.
    fn walk(dim: usize, bits: u32) -> Vec<Vec<u32>> {
        let side = 1u32 << bits;
        let count = (side as usize).pow(dim as u32);
        let mut cells: Vec<(u128, Vec<u32>)> = (0..count)
            .map(|i| {
                let cell: Vec<u32> = (0..dim)
                    .map(|d| ((i / (side as usize).pow(d as u32)) % side as usize) as u32)
                    .collect();
                let mut axes = cell.clone();
                (hilbert_index(&mut axes, bits), cell)
            })
            .collect();
        cells.sort_by_key(|(h, _)| *h);
        for (i, (h, _)) in cells.iter().enumerate() {
            assert_eq!(*h, i as u128);
        }
        cells.into_iter().map(|(_, c)| c).collect()
    }

    fn assert_adjacent_steps(cells: &[Vec<u32>]) {
        for pair in cells.windows(2) {
            let step: u32 = pair[0]
                .iter()
                .zip(pair[1].iter())
                .map(|(a, b)| a.abs_diff(*b))
                .sum();
            assert_eq!(step, 1, "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn planar_curve_is_continuous() {
        let cells = walk(2, 3);
        assert_eq!(cells.len(), 64);
        assert_eq!(cells[0], vec![0, 0]);
        assert_adjacent_steps(&cells);
    }

    #[test]
    fn spatial_curve_is_continuous() {
        let cells = walk(3, 2);
        assert_eq!(cells.len(), 64);
        assert_eq!(cells[0], vec![0, 0, 0]);
        assert_adjacent_steps(&cells);
    }

    #[test]
    fn encoder_arguments() {
        assert_eq!(
            HilbertEncoder::new(1),
            Err(GeometryError::InvalidDimension { dimension: 1 })
        );
        assert_eq!(
            HilbertEncoder::with_scale(2, 0.0),
            Err(GeometryError::InvalidPrecisionScale)
        );
        let e = HilbertEncoder::with_scale(3, 10.0).unwrap();
        assert_eq!(e.dimension(), 3);
        assert_eq!(e.scale(), 10.0);
        assert_eq!(HilbertEncoder::default(), HilbertEncoder::new(2).unwrap());
    }

    #[test]
    fn negative_coordinates_are_ordered() {
        let encoder = HilbertEncoder::default();
        let origin = encoder.encode(&Coordinate::new(0.0, 0.0));
        let below = encoder.encode(&Coordinate::new(-1.0, -1.0));
        let further = encoder.encode(&Coordinate::new(-2.0, -2.0));
        assert_ne!(origin, below);
        assert_ne!(below, further);
        assert_ne!(origin, further);
        // sub unit offsets share a cell at unit scale
        assert_eq!(encoder.encode(&Coordinate::new(-1.5, -1.5)), further);

        // out of range coordinates clamp onto the grid border
        let huge = encoder.encode(&Coordinate::new(1.0e12, 1.0e12));
        let border = encoder.encode(&Coordinate::new(u32::MAX as f64, u32::MAX as f64));
        assert_eq!(huge, border);
    }

    #[test]
    fn z_only_used_in_three_dimensions() {
        let planar = HilbertEncoder::new(2).unwrap();
        let spatial = HilbertEncoder::new(3).unwrap();
        let a = Coordinate::new_3d(5.0, 5.0, 0.0);
        let b = Coordinate::new_3d(5.0, 5.0, 100.0);
        assert_eq!(planar.encode(&a), planar.encode(&b));
        assert_ne!(spatial.encode(&a), spatial.encode(&b));
    }
}
