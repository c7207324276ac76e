/// Trait for control flow inside visiting methods.
///
/// Visiting methods (e.g. [RTree::visit_search](crate::index::RTree::visit_search) or
/// [visit_intersections](crate::algorithms::sweep_line::visit_intersections)) call back into a
/// visitor for each result, the visitor's return value decides whether visiting continues.
///
/// # Examples
///
/// ```
/// # use planar_geometry::core::*;
/// # use planar_geometry::geometry::*;
/// # use planar_geometry::index::*;
/// let mut tree = RTree::new(2, 4).unwrap();
/// for i in 0..10 {
///     tree.insert(Coordinate::new(i as f64, 0.0)).unwrap();
/// }
///
/// let mut visited = 0;
/// tree.visit_search(&Envelope::new(0.0, -1.0, 100.0, 1.0), &mut |_c: &Coordinate| {
///     visited += 1;
///     // Return Control::Break to stop visiting early
///     Control::Break(())
/// });
///
/// assert_eq!(visited, 1);
/// ```
pub trait ControlFlow {
    /// Constructs state indicating to continue iteration/visiting.
    fn continuing() -> Self;

    /// Returns `true` if control flow should break/stop iteration.
    fn should_break(&self) -> bool;
}
