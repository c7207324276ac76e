use planar_geometry::{
    algorithms::validity::validate_polygon,
    clipping::{clip, ClipOptions},
    geometry::{Polygon, PrecisionModel},
    ring,
};

fn main() {
    env_logger::init();
    overlapping_squares();
    polygon_with_hole();
    fixed_precision();
    rejected_input();
}

fn print_polygons(label: &str, polygons: &[Polygon]) {
    for (i, p) in polygons.iter().enumerate() {
        println!(
            "  {label}[{i}]: area {:.3}, {} shell vertexes, {} holes",
            p.area(),
            p.shell().len() - 1,
            p.holes().len()
        );
    }
}

fn overlapping_squares() {
    println!("Clipping two overlapping squares...");

    let a = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
    let b = Polygon::from_xy(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]).unwrap();
    let result = a.clip(&b).unwrap();

    print_polygons("internal", &result.internal);
    print_polygons("external_a", &result.external_a);
    print_polygons("external_b", &result.external_b);

    assert_eq!(result.internal.len(), 1, "Squares overlap in one region");
    assert!((result.internal_area() - 4.0).abs() < 1e-9);
    assert!((result.external_a_area() - 12.0).abs() < 1e-9);
    assert!((result.external_b_area() - 12.0).abs() < 1e-9);
}

fn polygon_with_hole() {
    println!("Clipping a polygon with a hole...");

    let a = Polygon::new(
        ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        vec![ring![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]],
    )
    .unwrap();
    let pm = PrecisionModel::default();
    assert_eq!(validate_polygon(&a, &pm), Ok(()));

    // b covers the right half of a, including half of the hole
    let b = Polygon::from_xy(&[(5.0, 0.0), (15.0, 0.0), (15.0, 10.0), (5.0, 10.0)]).unwrap();
    let result = clip(&a, &b, &ClipOptions::new()).unwrap();

    print_polygons("internal", &result.internal);
    print_polygons("external_a", &result.external_a);
    print_polygons("external_b", &result.external_b);

    assert!((result.internal_area() - 48.0).abs() < 1e-9);
    assert!((result.external_a_area() - 48.0).abs() < 1e-9);
    assert!((result.external_b_area() - 52.0).abs() < 1e-9);
}

fn fixed_precision() {
    println!("Clipping with a fixed precision model...");

    // vertexes are snapped to a 0.01 grid before clipping
    let options = ClipOptions::with_precision(PrecisionModel::fixed(100.0).unwrap());
    let a = Polygon::from_xy(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)]).unwrap();
    let b = Polygon::from_xy(&[(1.0001, -1.0), (2.0, -1.0), (2.0, 4.0), (0.9999, 4.0)]).unwrap();
    let result = clip(&a, &b, &options).unwrap();

    print_polygons("internal", &result.internal);
    assert_eq!(result.internal.len(), 1);
    assert!((result.internal_area() - 3.0).abs() < 1e-9);
    assert_eq!(result.external_a.len(), 2, "a is cut in two");
}

fn rejected_input() {
    println!("Clipping a self intersecting polygon...");

    let bowtie = Polygon::from_xy(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]).unwrap();
    let square = Polygon::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]).unwrap();
    match bowtie.clip(&square) {
        Ok(_) => panic!("self intersecting input must be rejected"),
        Err(e) => println!("  rejected: {e}"),
    }
}
