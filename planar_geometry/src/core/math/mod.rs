//! Core/common math functions for working with 2D vectors and line segments.
mod base_math;
mod segment_segment_intersect;
mod vector2;

pub use base_math::*;
pub use segment_segment_intersect::{seg_seg_intr, SegSegIntr};
pub use vector2::{vec2, Vector2};
