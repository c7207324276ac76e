mod test_utils;

use planar_geometry::{
    core::Control,
    geometry::{Coordinate, Envelope},
    index::KdTree,
    GeometryError,
};
use proptest::prelude::*;
use rand::Rng;
use test_utils::{init_logging, random_coordinates, rng};

fn sorted(mut coords: Vec<Coordinate>) -> Vec<Coordinate> {
    coords.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    coords
}

fn brute_force_nearest(coords: &[Coordinate], target: &Coordinate, dimension: usize) -> f64 {
    coords
        .iter()
        .map(|c| c.distance_squared_in(target, dimension))
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn nearest_in_three_dimensions() {
    init_logging();
    let mut rng = rng(31);
    let coords: Vec<Coordinate> = (0..500)
        .map(|_| {
            Coordinate::new_3d(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect();
    let tree = KdTree::new(&coords, 3).unwrap();
    tree.validate_structure().unwrap();

    for _ in 0..100 {
        let target = Coordinate::new_3d(
            rng.gen_range(-10.0..110.0),
            rng.gen_range(-10.0..110.0),
            rng.gen_range(-10.0..110.0),
        );
        let found = tree.search_nearest(&target).unwrap();
        assert_eq!(
            found.distance_squared_in(&target, 3),
            brute_force_nearest(&coords, &target, 3)
        );
    }

    let cube = Envelope::new_3d(20.0, 20.0, 20.0, 60.0, 60.0, 60.0);
    let expected = sorted(
        coords
            .iter()
            .filter(|c| cube.contains_coordinate(c))
            .copied()
            .collect(),
    );
    assert_eq!(sorted(tree.search(&cube)), expected);
}

#[test]
fn planar_tree_ignores_z() {
    let coords = [
        Coordinate::new_3d(1.0, 1.0, 50.0),
        Coordinate::new_3d(2.0, 2.0, -50.0),
        Coordinate::new_3d(8.0, 8.0, 0.0),
    ];
    let tree = KdTree::new(&coords, 2).unwrap();
    assert_eq!(tree.search(&Envelope::new(0.0, 0.0, 3.0, 3.0)).len(), 2);
    assert_eq!(
        tree.search_nearest(&Coordinate::new_3d(1.0, 1.0, -50.0)),
        Some(coords[0])
    );
}

#[test]
fn invalid_arguments() {
    assert_eq!(
        KdTree::new(&[], 4).unwrap_err(),
        GeometryError::InvalidDimension { dimension: 4 }
    );
    assert_eq!(
        KdTree::new(&[Coordinate::new(f64::NAN, 0.0)], 2).unwrap_err(),
        GeometryError::InvalidCoordinate
    );

    let mut tree = KdTree::new(&[], 2).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.search_nearest(&Coordinate::new(0.0, 0.0)), None);
    assert_eq!(
        tree.add(Coordinate::new(0.0, f64::INFINITY)),
        Err(GeometryError::InvalidCoordinate)
    );
    assert!(tree.is_empty());

    tree.add(Coordinate::new(1.0, 1.0)).unwrap();
    assert_eq!(tree.search_nearest(&Coordinate::new(f64::NAN, 0.0)), None);
}

#[test]
fn visit_search_early_exit() {
    let coords: Vec<Coordinate> = (0..64)
        .map(|i| Coordinate::new((i % 8) as f64, (i / 8) as f64))
        .collect();
    let tree = KdTree::new(&coords, 2).unwrap();
    let mut seen = 0;
    let result = tree.visit_search(&Envelope::new(0.0, 0.0, 7.0, 7.0), &mut |_: &Coordinate| {
        seen += 1;
        if seen == 10 {
            Control::Break(())
        } else {
            Control::Continue
        }
    });
    assert_eq!(result, Control::Break(()));
    assert_eq!(seen, 10);
}

#[test]
fn remove_all_in_random_order() {
    init_logging();
    let mut rng = rng(2);
    let coords = random_coordinates(&mut rng, 400, -20.0, 20.0);
    let mut tree = KdTree::new(&coords, 2).unwrap();
    let mut remaining = coords.clone();
    while !remaining.is_empty() {
        let c = remaining.swap_remove(rng.gen_range(0..remaining.len()));
        assert!(tree.remove(&c));
        if remaining.len() % 50 == 0 {
            tree.validate_structure().unwrap();
            assert_eq!(sorted(tree.coordinates()), sorted(remaining.clone()));
        }
    }
    assert!(tree.is_empty());
    assert!(!tree.remove(&coords[0]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn search_is_exact_before_and_after_rebalance(
        initial in prop::collection::vec((-100i32..100, -100i32..100), 0..200),
        added in prop::collection::vec((-100i32..100, -100i32..100), 0..200),
        (x0, y0, w, h) in (-100i32..100, -100i32..100, 0i32..80, 0i32..80),
    ) {
        let to_coord = |&(x, y): &(i32, i32)| Coordinate::new(x as f64, y as f64);
        let mut all: Vec<Coordinate> = initial.iter().map(to_coord).collect();
        let mut tree = KdTree::new(&all, 2).unwrap();
        for c in added.iter().map(to_coord) {
            tree.add(c).unwrap();
            all.push(c);
        }

        let envelope = Envelope::new(x0 as f64, y0 as f64, (x0 + w) as f64, (y0 + h) as f64);
        let expected = sorted(
            all.iter().filter(|c| envelope.contains_coordinate(c)).copied().collect(),
        );

        prop_assert!(tree.validate_structure().is_ok());
        prop_assert_eq!(sorted(tree.search(&envelope)), expected.clone());

        tree.rebalance_tree();
        prop_assert!(tree.validate_structure().is_ok());
        prop_assert_eq!(tree.len(), all.len());
        prop_assert_eq!(sorted(tree.search(&envelope)), expected);

        let target = Coordinate::new(x0 as f64 + 0.5, y0 as f64 + 0.25);
        match tree.search_nearest(&target) {
            Some(found) => prop_assert_eq!(
                found.distance_squared_in(&target, 2),
                brute_force_nearest(&all, &target, 2)
            ),
            None => prop_assert!(all.is_empty()),
        }
    }
}
