//! Planar computational geometry algorithms.
//!
//! The crate is organized around two subsystems:
//!
//! * [clipping] and [algorithms]: tolerance-aware planar algorithms. Greiner-Hormann polygon
//!   clipping (with recursive hole resolution) builds on the sweep-line intersection engine
//!   ([algorithms::sweep_line]) and winding-number point classification
//!   ([algorithms::winding_number]).
//! * [index]: mutable spatial indexes over geometries ([index::RTree], [index::HilbertRTree]) and
//!   over bare coordinates ([index::KdTree]).
//!
//! All numeric slack is controlled by a [geometry::PrecisionModel] passed in by the caller (a
//! default instance is used when none is given).
//!
//! # Examples
//!
//! ```
//! # use planar_geometry::geometry::*;
//! # use planar_geometry::clipping::*;
//! let a = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
//! let b = Polygon::from_xy(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]).unwrap();
//! let result = a.clip(&b).unwrap();
//! assert_eq!(result.internal.len(), 1);
//! assert!((result.internal[0].area() - 4.0).abs() < 1e-9);
//! ```

#[macro_use]
mod macros;

pub mod algorithms;
pub mod clipping;
pub mod core;
pub mod error;
pub mod geometry;
pub mod index;

pub use error::{GeometryError, Result};
