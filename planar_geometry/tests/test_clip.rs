mod test_utils;

use planar_geometry::{
    assert_fuzzy_eq,
    clipping::{clip, ClipOptions},
    geometry::{Coordinate, Polygon, PrecisionModel},
    ring, GeometryError,
};
use test_utils::{init_logging, random_star, rectangle, rng};

/// Vertexes of a closed ring without the closing coordinate, rotated to start at the smallest
/// (x, y).
fn canonical_vertexes(ring: &[Coordinate]) -> Vec<Coordinate> {
    let open = &ring[..ring.len() - 1];
    let start = (0..open.len())
        .min_by(|&i, &j| {
            open[i]
                .x
                .total_cmp(&open[j].x)
                .then(open[i].y.total_cmp(&open[j].y))
        })
        .unwrap();
    open[start..].iter().chain(open[..start].iter()).copied().collect()
}

#[test]
fn overlapping_squares() {
    init_logging();
    let a = rectangle(0.0, 0.0, 4.0, 4.0);
    let b = rectangle(2.0, 2.0, 6.0, 6.0);
    let result = clip(&a, &b, &ClipOptions::new()).unwrap();

    assert_eq!(result.internal.len(), 1);
    assert_eq!(result.external_a.len(), 1);
    assert_eq!(result.external_b.len(), 1);
    assert_fuzzy_eq!(result.internal[0].area(), 4.0);
    assert_fuzzy_eq!(result.external_a[0].area(), 12.0);
    assert_fuzzy_eq!(result.external_b[0].area(), 12.0);

    assert_eq!(
        canonical_vertexes(result.internal[0].shell()),
        vec![
            Coordinate::new(2.0, 2.0),
            Coordinate::new(4.0, 2.0),
            Coordinate::new(4.0, 4.0),
            Coordinate::new(2.0, 4.0),
        ]
    );
}

#[test]
fn output_is_normalized() {
    init_logging();
    // clockwise inputs
    let a = Polygon::from_xy(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]).unwrap();
    let b = Polygon::from_xy(&[(2.0, 2.0), (2.0, 6.0), (6.0, 6.0), (6.0, 2.0)]).unwrap();
    let result = a.clip(&b).unwrap();
    for p in result
        .internal
        .iter()
        .chain(result.external_a.iter())
        .chain(result.external_b.iter())
    {
        assert!(p.signed_area() > 0.0);
        assert_eq!(p.shell().first(), p.shell().last());
    }
}

#[test]
fn disjoint_and_nested() {
    init_logging();
    let a = rectangle(0.0, 0.0, 10.0, 10.0);

    let far = rectangle(20.0, 20.0, 30.0, 30.0);
    let result = a.clip(&far).unwrap();
    assert!(result.internal.is_empty());
    assert_fuzzy_eq!(result.external_a_area(), 100.0);
    assert_fuzzy_eq!(result.external_b_area(), 100.0);

    let inner = rectangle(2.0, 2.0, 4.0, 4.0);
    let result = a.clip(&inner).unwrap();
    assert_eq!(result.internal.len(), 1);
    assert_fuzzy_eq!(result.internal_area(), 4.0);
    assert_eq!(result.external_a.len(), 1);
    assert_eq!(result.external_a[0].holes().len(), 1);
    assert_fuzzy_eq!(result.external_a_area(), 96.0);
    assert!(result.external_b.is_empty());

    let result = inner.clip(&a).unwrap();
    assert_fuzzy_eq!(result.internal_area(), 4.0);
    assert!(result.external_a.is_empty());
    assert_fuzzy_eq!(result.external_b_area(), 96.0);
}

#[test]
fn clip_with_itself() {
    init_logging();
    let mut rng = rng(11);
    let polygons = [
        rectangle(0.0, 0.0, 4.0, 4.0),
        random_star(&mut rng, (0.0, 0.0), 9, 2.0, 5.0),
    ];
    for p in polygons.iter() {
        let result = p.clip(p).unwrap();
        assert_eq!(result.internal.len(), 1);
        assert!(result.external_a.is_empty());
        assert!(result.external_b.is_empty());
        assert_fuzzy_eq!(result.internal[0].area(), p.area(), 1e-9);
        assert_eq!(
            canonical_vertexes(result.internal[0].shell()),
            canonical_vertexes(p.normalized().shell())
        );
    }
}

#[test]
fn areas_are_complementary() {
    init_logging();
    let mut rng = rng(3);
    for i in 0..20 {
        let a = random_star(&mut rng, (0.0, 0.0), 7 + i % 5, 3.0, 8.0);
        let b = random_star(&mut rng, (4.0, 1.0), 6 + i % 4, 3.0, 8.0);
        let result = a.clip(&b).unwrap();
        assert_fuzzy_eq!(result.internal_area() + result.external_a_area(), a.area(), 1e-6);
        assert_fuzzy_eq!(result.internal_area() + result.external_b_area(), b.area(), 1e-6);
    }
}

#[test]
fn polygon_with_hole_split_by_square() {
    init_logging();
    let a = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]],
    )
    .unwrap();
    let b = rectangle(5.0, 0.0, 15.0, 10.0);
    let result = a.clip(&b).unwrap();
    assert_fuzzy_eq!(result.internal_area(), 48.0);
    assert_fuzzy_eq!(result.external_a_area(), 48.0);
    assert_fuzzy_eq!(result.external_b_area(), 52.0);
}

#[test]
fn square_covering_a_hole() {
    init_logging();
    let a = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]],
    )
    .unwrap();
    let b = rectangle(3.0, 3.0, 7.0, 7.0);
    let result = a.clip(&b).unwrap();

    assert_eq!(result.internal.len(), 1);
    assert_eq!(result.internal[0].holes().len(), 1);
    assert_fuzzy_eq!(result.internal_area(), 12.0);
    assert_fuzzy_eq!(result.external_a_area(), 84.0);
    // the hole of A is inside B and outside A
    assert_eq!(result.external_b.len(), 1);
    assert_fuzzy_eq!(result.external_b_area(), 4.0);
}

#[test]
fn hole_touching_shell_at_a_vertex() {
    init_logging();
    let a = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(0.0, 4.0), (4.0, 4.0), (4.0, 6.0)]],
    )
    .unwrap();
    let b = rectangle(2.0, 2.0, 8.0, 8.0);
    let result = clip(&a, &b, &ClipOptions::new()).unwrap();
    assert_fuzzy_eq!(result.internal_area(), 33.0);
    assert_fuzzy_eq!(result.external_a_area(), 63.0);
    assert_fuzzy_eq!(result.external_b_area(), 3.0);
    assert_fuzzy_eq!(result.internal_area() + result.external_a_area(), a.area());
    assert_fuzzy_eq!(result.internal_area() + result.external_b_area(), b.area());
}

#[test]
fn fixed_precision_snaps_input() {
    init_logging();
    let options = ClipOptions::with_precision(PrecisionModel::fixed(10.0).unwrap());
    let a = rectangle(0.0, 0.0, 4.0, 4.0);
    let b = rectangle(2.001, 2.001, 6.0, 6.0);
    let result = clip(&a, &b, &options).unwrap();
    assert_eq!(result.internal.len(), 1);
    assert_fuzzy_eq!(result.internal_area(), 4.0);
}

#[test]
fn self_intersecting_input() {
    init_logging();
    let bowtie = Polygon::from_xy(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]).unwrap();
    let square = rectangle(0.0, 0.0, 10.0, 10.0);
    assert_eq!(
        clip(&bowtie, &square, &ClipOptions::new()),
        Err(GeometryError::SelfIntersectingPolygon { polygon: "a" })
    );

    // a hole crossing the shell is a self intersection too
    let crossing_hole = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(8.0, 4.0), (12.0, 4.0), (12.0, 6.0), (8.0, 6.0)]],
    )
    .unwrap();
    assert_eq!(
        square.clip(&crossing_hole),
        Err(GeometryError::SelfIntersectingPolygon { polygon: "b" })
    );

    // touching the shell at two points splits the interior
    let pinching_hole = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(0.0, 5.0), (5.0, 4.0), (10.0, 5.0), (5.0, 6.0)]],
    )
    .unwrap();
    assert_eq!(
        pinching_hole.clip(&square),
        Err(GeometryError::SelfIntersectingPolygon { polygon: "a" })
    );
}
