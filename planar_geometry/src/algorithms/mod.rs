//! Planar algorithms: measures, segment intersection, point classification, sweep-line
//! intersection detection, polygon validity and convex hulls.
pub mod convex_hull;
pub mod measures;
pub mod segment_intersection;
pub mod sweep_line;
pub mod validity;
pub mod winding_number;
