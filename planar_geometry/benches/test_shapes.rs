use planar_geometry::geometry::{Coordinate, Polygon};

/// Closed ring approximating a circle whose radius alternates between `radius` and
/// `radius * 0.6`, a simple but highly concave star.
pub fn star_ring(center: (f64, f64), radius: f64, vertex_count: usize) -> Vec<Coordinate> {
    let mut ring: Vec<Coordinate> = (0..vertex_count)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / vertex_count as f64;
            let r = if i % 2 == 0 { radius } else { radius * 0.6 };
            Coordinate::new(center.0 + r * angle.cos(), center.1 + r * angle.sin())
        })
        .collect();
    ring.push(ring[0]);
    ring
}

pub fn star_polygon(center: (f64, f64), radius: f64, vertex_count: usize) -> Polygon {
    Polygon::new(star_ring(center, radius, vertex_count), Vec::new()).unwrap()
}

/// Pseudo random coordinates from a linear congruential sequence (no rng needed for stable
/// bench input).
pub fn scattered_coordinates(count: usize) -> Vec<Coordinate> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|_| Coordinate::new(next() * 1000.0, next() * 1000.0))
        .collect()
}
