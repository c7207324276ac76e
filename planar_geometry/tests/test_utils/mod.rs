//! Helpers shared by the integration tests.
#![allow(dead_code)]

use planar_geometry::geometry::{Coordinate, Polygon};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Install `env_logger` once for the test binary, `RUST_LOG=debug` shows the library logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Seeded generator so failures reproduce.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Axis aligned rectangle polygon.
pub fn rectangle(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Polygon {
    Polygon::from_xy(&[(xmin, ymin), (xmax, ymin), (xmax, ymax), (xmin, ymax)])
        .expect("rectangle has 4 distinct points")
}

/// Random coordinates in `[min, max)` on both axes.
pub fn random_coordinates(rng: &mut StdRng, count: usize, min: f64, max: f64) -> Vec<Coordinate> {
    (0..count)
        .map(|_| Coordinate::new(rng.gen_range(min..max), rng.gen_range(min..max)))
        .collect()
}

/// Star shaped simple polygon with `count` vertexes around `center`, radii drawn from
/// `[inner, outer)`.
pub fn random_star(
    rng: &mut StdRng,
    center: (f64, f64),
    count: usize,
    inner: f64,
    outer: f64,
) -> Polygon {
    let points: Vec<(f64, f64)> = (0..count)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / count as f64;
            let radius = rng.gen_range(inner..outer);
            (
                center.0 + radius * angle.cos(),
                center.1 + radius * angle.sin(),
            )
        })
        .collect();
    Polygon::from_xy(&points).expect("star has distinct points")
}
