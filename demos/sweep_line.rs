use planar_geometry::{
    algorithms::{
        sweep_line::{
            intersections, intersects, visit_intersections, SweepIntersection, SweepLineOptions,
        },
        validity::is_simple_ring,
    },
    core::Control,
    geometry::PrecisionModel,
    ring,
};

fn main() {
    env_logger::init();
    simple_and_self_crossing();
    enumerate_with_provenance();
    first_crossing_only();
}

fn simple_and_self_crossing() {
    println!("Testing rings for self intersection...");

    let options = SweepLineOptions::new();
    let square = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
    let bowtie = ring![(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)];

    assert!(!intersects(&[&square], &options).unwrap());
    assert!(intersects(&[&bowtie], &options).unwrap());
    assert!(is_simple_ring(&square, &PrecisionModel::default()));
    println!("  square is simple, bowtie is not");
}

fn enumerate_with_provenance() {
    println!("Enumerating intersections between two rings...");

    let a = ring![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
    let b = ring![(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)];
    let result = intersections(&[a, b], &SweepLineOptions::new()).unwrap();

    for (position, (e1, e2)) in result.iter() {
        let (ring1, seg1) = result.edge_location(e1).unwrap();
        let (ring2, seg2) = result.edge_location(e2).unwrap();
        println!("  {position}: ring {ring1} segment {seg1} x ring {ring2} segment {seg2}");
    }
    assert_eq!(result.len(), 2);
}

fn first_crossing_only() {
    println!("Stopping at the first crossing...");

    let star = ring![(0.0, 0.0), (2.0, 6.0), (4.0, 0.0), (-1.0, 4.0), (5.0, 4.0)];
    let found = visit_intersections(
        &[star],
        &SweepLineOptions::new(),
        &mut |intr: SweepIntersection| Control::Break(intr.point),
    )
    .unwrap();

    match found {
        Control::Break(p) => println!("  first crossing at {p}"),
        Control::Continue => unreachable!("the star crosses itself"),
    }
}
