use planar_geometry::{
    geometry::{Coordinate, Envelope, Polygon},
    index::{HilbertRTree, KdTree, RTree, SpatialIndex},
};

fn main() {
    env_logger::init();
    rtree_of_polygons();
    hilbert_rtree_of_points();
    kd_tree_nearest();
}

fn grid_points(side: usize) -> Vec<Coordinate> {
    (0..side * side)
        .map(|i| Coordinate::new((i % side) as f64, (i / side) as f64))
        .collect()
}

fn rtree_of_polygons() {
    println!("R-tree over polygons...");

    let mut tree = RTree::new(2, 4).unwrap();
    for i in 0..25 {
        let x = (i % 5) as f64 * 3.0;
        let y = (i / 5) as f64 * 3.0;
        let cell = Polygon::from_xy(&[(x, y), (x + 2.0, y), (x + 2.0, y + 2.0), (x, y + 2.0)])
            .unwrap();
        tree.insert(cell).unwrap();
    }
    println!("  {} polygons, height {}", tree.len(), tree.height());

    let query = Envelope::new(2.5, 2.5, 6.5, 6.5);
    let hits = tree.search(&query);
    println!("  {} polygons intersect {:?}", hits.len(), query);
    assert_eq!(hits.len(), 4);

    let removed = tree.remove_in(&query);
    assert_eq!(removed.len(), 4);
    assert_eq!(tree.len(), 21);
    tree.validate_structure().unwrap();
}

fn fill<I: SpatialIndex<Coordinate>>(index: &mut I, coords: &[Coordinate]) {
    for c in coords {
        index.insert(*c).unwrap();
    }
}

fn hilbert_rtree_of_points() {
    println!("Hilbert R-tree over grid points...");

    let coords = grid_points(30);
    let mut tree = HilbertRTree::new(9).unwrap();
    fill(&mut tree, &coords);
    println!("  {} points, height {}", tree.len(), tree.height());

    let first: Vec<&Coordinate> = tree.iter_ordered().take(4).collect();
    println!("  first points along the curve: {first:?}");

    let query = Envelope::new(10.0, 10.0, 12.0, 12.0);
    assert_eq!(tree.search(&query).len(), 9);
    for c in coords.iter().filter(|c| c.x < 15.0) {
        assert!(tree.remove(c));
    }
    assert_eq!(tree.len(), 450);
    tree.validate_structure().unwrap();
}

fn kd_tree_nearest() {
    println!("K-d tree nearest neighbour...");

    let coords = grid_points(20);
    let mut tree = KdTree::new(&coords, 2).unwrap();
    println!("  {} points, depth {}", tree.len(), tree.depth());

    let target = Coordinate::new(7.3, 12.6);
    let nearest = tree.search_nearest(&target).unwrap();
    println!("  nearest to {target} is {nearest}");
    assert_eq!(nearest, Coordinate::new(7.0, 13.0));

    // skewed additions deepen the tree until it is rebalanced
    for i in 0..50 {
        tree.add(Coordinate::new(100.0 + i as f64, 100.0 + i as f64)).unwrap();
    }
    let skewed = tree.depth();
    tree.rebalance_tree();
    println!("  depth {} after skewed additions, {} after rebalance", skewed, tree.depth());
    assert!(tree.depth() <= skewed);
}
