mod test_utils;

use planar_geometry::{
    geometry::{Coordinate, Envelope, Spatial},
    index::{HilbertEncoder, HilbertRTree, RTree, SpaceFillingCurveEncoder, SpatialIndex},
    GeometryError,
};
use proptest::prelude::*;
use test_utils::{init_logging, random_coordinates, rng};

fn sorted(mut coords: Vec<Coordinate>) -> Vec<Coordinate> {
    coords.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    coords
}

#[test]
fn max_children_must_be_multiple_of_three() {
    for max in [0, 1, 2, 4, 5, 10] {
        assert_eq!(
            HilbertRTree::<Coordinate>::new(max).unwrap_err(),
            GeometryError::HilbertMaxChildren { max }
        );
    }
    let tree = HilbertRTree::<Coordinate>::new(9).unwrap();
    assert_eq!(tree.max_children(), 9);
    assert_eq!(tree.min_children(), 6);
    assert_eq!(HilbertRTree::<Coordinate>::default().max_children(), 12);
}

#[test]
fn agrees_with_rtree() {
    init_logging();
    let mut rng = rng(99);
    let coords = random_coordinates(&mut rng, 1500, -1000.0, 1000.0);
    let mut hilbert = HilbertRTree::new(6).unwrap();
    let mut rtree = RTree::default();
    for c in coords.iter() {
        hilbert.insert(*c).unwrap();
        rtree.insert(*c).unwrap();
    }
    hilbert.validate_structure().unwrap();
    assert!(hilbert.height() >= 4);

    for q in random_coordinates(&mut rng, 40, -1000.0, 1000.0) {
        let envelope = Envelope::new(q.x, q.y, q.x + 150.0, q.y + 100.0);
        let a = sorted(hilbert.search(&envelope).into_iter().copied().collect());
        let b = sorted(rtree.search(&envelope).into_iter().copied().collect());
        assert_eq!(a, b);
    }
    assert_eq!(hilbert.envelope(), rtree.envelope());
}

#[test]
fn ordered_iteration_is_by_rank() {
    init_logging();
    let mut rng = rng(4);
    let mut tree = HilbertRTree::new(3).unwrap();
    for c in random_coordinates(&mut rng, 400, 0.0, 5000.0) {
        tree.insert(c).unwrap();
    }

    let encoder = *tree.encoder();
    let ranks: Vec<u128> = tree
        .iter_ordered()
        .map(|c| encoder.encode(&c.representative_coordinate()))
        .collect();
    assert_eq!(ranks.len(), 400);
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn spatial_encoder_indexes_z() {
    init_logging();
    let encoder = HilbertEncoder::new(3).unwrap();
    let mut tree = HilbertRTree::with_encoder(6, encoder).unwrap();
    for i in 0..10 {
        for j in 0..10 {
            tree.insert(Coordinate::new_3d(i as f64, j as f64, (i * j) as f64))
                .unwrap();
        }
    }
    tree.validate_structure().unwrap();

    let slab = Envelope::new_3d(0.0, 0.0, 10.0, 9.0, 9.0, 20.0);
    let found = tree.search(&slab);
    let expected = (0..10)
        .flat_map(|i| (0..10).map(move |j| i * j))
        .filter(|&z| (10..=20).contains(&z))
        .count();
    assert_eq!(found.len(), expected);
    assert!(found.iter().all(|c| c.z >= 10.0 && c.z <= 20.0));
}

#[test]
fn drain_by_regions() {
    init_logging();
    let mut rng = rng(12);
    let coords = random_coordinates(&mut rng, 600, 0.0, 100.0);
    let mut tree = HilbertRTree::new(9).unwrap();
    for c in coords.iter() {
        tree.insert(*c).unwrap();
    }

    let mut removed = 0;
    for band in 0..10 {
        let y = band as f64 * 10.0;
        let region = Envelope::new(0.0, y, 100.0, y + 10.0);
        removed += SpatialIndex::remove_in(&mut tree, &region).len();
        tree.validate_structure().unwrap();
        assert!(tree.search(&region).is_empty());
    }
    assert_eq!(removed, 600);
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);

    tree.insert(Coordinate::new(1.0, 1.0)).unwrap();
    assert_eq!(tree.len(), 1);
    tree.clear();
    assert!(tree.is_empty());
}

#[derive(Debug, Clone)]
enum Op {
    Insert(i32, i32),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-50..50i32, -50..50i32).prop_map(|(x, y)| Op::Insert(x, y)),
        2 => (0..1000usize).prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mass_removal_keeps_nodes_filled(
        max in prop_oneof![Just(3usize), Just(6), Just(9), Just(12)],
        count in 50usize..600,
        step in 1usize..6,
    ) {
        let mut tree = HilbertRTree::new(max).unwrap();
        let points: Vec<Coordinate> = (0..count)
            .map(|i| Coordinate::new(((i * 37) % 101) as f64, ((i * 53) % 97) as f64 + i as f64))
            .collect();
        for &p in &points {
            tree.insert(p).unwrap();
        }

        let mut remaining = count;
        for p in points.iter().skip(step - 1).step_by(step) {
            prop_assert!(tree.remove(p));
            remaining -= 1;
            prop_assert_eq!(tree.validate_structure(), Ok(()));
        }
        prop_assert_eq!(tree.len(), remaining);
    }

    #[test]
    fn invariants_hold_after_any_operations(
        max in prop_oneof![Just(3usize), Just(6), Just(9), Just(12)],
        ops in prop::collection::vec(op_strategy(), 1..300),
    ) {
        let mut tree = HilbertRTree::new(max).unwrap();
        let mut model: Vec<Coordinate> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(x, y) => {
                    let c = Coordinate::new(x as f64, y as f64);
                    tree.insert(c).unwrap();
                    model.push(c);
                }
                Op::Remove(i) => {
                    if model.is_empty() {
                        continue;
                    }
                    let c = model.swap_remove(i % model.len());
                    prop_assert!(tree.remove(&c));
                }
            }
            // includes every non-root node holding its minimum number of children
            prop_assert_eq!(tree.validate_structure(), Ok(()));
        }

        prop_assert_eq!(tree.len(), model.len());
        let stored = sorted(tree.iter().copied().collect());
        prop_assert_eq!(stored, sorted(model.clone()));

        let query = Envelope::new(-10.0, -20.0, 15.0, 5.0);
        let found = sorted(tree.search(&query).into_iter().copied().collect());
        let expected = sorted(
            model.into_iter().filter(|c| query.contains_coordinate(c)).collect(),
        );
        prop_assert_eq!(found, expected);
    }
}
