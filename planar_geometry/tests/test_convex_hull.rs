mod test_utils;

use planar_geometry::{
    algorithms::{
        convex_hull::convex_hull,
        measures::{path_length, point_segment_distance, ring_area, ring_signed_area},
        winding_number::{classify_point, RelativeLocation},
    },
    assert_fuzzy_eq,
    geometry::{orientation, ring_orientation, Coordinate, Orientation, Polygon},
    ring, GeometryError,
};
use test_utils::{random_coordinates, rng};

#[test]
fn grid_hull_is_its_corners() {
    let coords: Vec<Coordinate> = (0..5)
        .flat_map(|i| (0..5).map(move |j| Coordinate::new(i as f64, j as f64)))
        .collect();
    let hull = convex_hull(&coords).unwrap();
    assert_eq!(
        hull,
        ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]
    );
    assert_fuzzy_eq!(ring_area(&hull), 16.0);
}

#[test]
fn random_hulls() {
    let mut rng = rng(17);
    for count in [3usize, 10, 100, 1000] {
        let coords = random_coordinates(&mut rng, count, -100.0, 100.0);
        let hull = convex_hull(&coords).unwrap();
        assert_eq!(hull.first(), hull.last());
        assert!(ring_signed_area(&hull) > 0.0);
        assert_eq!(ring_orientation(&hull, 1e-9), Orientation::CounterClockwise);

        // strictly convex: every consecutive vertex triple turns left
        let open = &hull[..hull.len() - 1];
        for i in 0..open.len() {
            let (a, b, c) = (open[i], open[(i + 1) % open.len()], open[(i + 2) % open.len()]);
            assert_eq!(orientation(&a, &b, &c, 1e-9), Orientation::CounterClockwise);
        }

        for v in open {
            assert!(coords.contains(v));
        }
        for c in &coords {
            assert_ne!(classify_point(&hull, c, 1e-9), RelativeLocation::Exterior);
        }
    }
}

#[test]
fn invalid_input() {
    assert_eq!(
        convex_hull(&[Coordinate::new(0.0, 0.0), Coordinate::new(f64::INFINITY, 1.0)]),
        Err(GeometryError::InvalidCoordinate)
    );
    let repeated = vec![Coordinate::new(2.0, 2.0); 10];
    assert_eq!(
        convex_hull(&repeated),
        Err(GeometryError::TooFewPoints {
            required: 3,
            found: 1
        })
    );
}

#[test]
fn polygon_measures() {
    let p = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(6.0, 6.0), (6.0, 8.0), (8.0, 8.0), (8.0, 6.0)]],
    )
    .unwrap();
    assert_fuzzy_eq!(p.area(), 96.0);
    assert_fuzzy_eq!(p.perimeter(), 48.0);
    assert_fuzzy_eq!(path_length(p.shell()), 40.0);

    // hole in the upper right pulls the centroid down and left
    let c = p.centroid();
    assert!(c.x < 5.0 && c.y < 5.0);
    assert_fuzzy_eq!(c.x, (100.0 * 5.0 - 4.0 * 7.0) / 96.0);
    assert_fuzzy_eq!(c.y, c.x);

    let e = p.envelope();
    assert_eq!((e.min_x(), e.min_y(), e.max_x(), e.max_y()), (0.0, 0.0, 10.0, 10.0));

    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(4.0, 0.0);
    assert_fuzzy_eq!(point_segment_distance(&Coordinate::new(2.0, 3.0), &a, &b), 3.0);
    assert_fuzzy_eq!(point_segment_distance(&Coordinate::new(7.0, 4.0), &a, &b), 5.0);
}
