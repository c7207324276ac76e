//! Polygon level clipping: shells are clipped first, holes are then carved out of the shell clips
//! by clipping again.
use super::{
    greiner_hormann::{ClipGraph, ShellRelation},
    trace::ring_inside,
    ClipResult,
};
use crate::{
    algorithms::sweep_line::global_tolerance,
    error::{GeometryError, Result},
    geometry::{
        close_ring, open_ring, oriented_ring, Coordinate, Envelope, Orientation, Polygon,
        PrecisionModel,
    },
};
use log::debug;
use static_aabb2d_index::StaticAABB2DIndexBuilder;

/// Open counter clockwise copy of a ring.
pub(crate) fn ccw_open(ring: &[Coordinate]) -> Vec<Coordinate> {
    open_ring(&oriented_ring(ring, Orientation::CounterClockwise))
}

/// Closed clockwise copy of a counter clockwise open ring.
fn cw_closed(ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut reversed = ring.to_vec();
    reversed.reverse();
    close_ring(reversed)
}

/// Clips normalized polygons (counter clockwise shells, clockwise holes).
#[derive(Debug, Clone, Copy)]
pub(crate) struct PolygonClipper {
    precision: PrecisionModel,
}

impl PolygonClipper {
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    pub fn clip(&self, a: &Polygon, b: &Polygon) -> Result<ClipResult> {
        let shell_a = open_ring(a.shell());
        let shell_b = open_ring(b.shell());
        let holes_a: Vec<Vec<Coordinate>> = a.holes().iter().map(|h| ccw_open(h)).collect();
        let holes_b: Vec<Vec<Coordinate>> = b.holes().iter().map(|h| ccw_open(h)).collect();

        let mut graph = ClipGraph::build(&shell_a, &shell_b, &self.precision)?;
        graph.add_hole_intersections(&holes_a, &holes_b, &self.precision)?;
        let shells = graph.clip();

        let all_holes: Vec<Vec<Coordinate>> =
            holes_a.iter().chain(holes_b.iter()).cloned().collect();
        let internal = self.subtract_all(shells.internal, &all_holes)?;

        // A outside B is A outside B's shell plus the parts of A inside B's holes
        let mut external_a = self.subtract_all(shells.external_a, &holes_a)?;
        for hole in holes_b.iter() {
            let pieces = self.intersect_shells(&shell_a, hole)?;
            external_a.extend(self.subtract_all(pieces, &holes_a)?);
        }

        let mut external_b = self.subtract_all(shells.external_b, &holes_b)?;
        for hole in holes_a.iter() {
            let pieces = self.intersect_shells(&shell_b, hole)?;
            external_b.extend(self.subtract_all(pieces, &holes_b)?);
        }

        debug!(
            "resolved holes: {} internal, {} external A, {} external B clips",
            internal.len(),
            external_a.len(),
            external_b.len()
        );

        Ok(ClipResult {
            internal,
            external_a,
            external_b,
        })
    }

    fn intersect_shells(&self, a: &[Coordinate], b: &[Coordinate]) -> Result<Vec<Polygon>> {
        Ok(ClipGraph::build(a, b, &self.precision)?.clip().internal)
    }

    /// Subtract every ring of `holes` (open, counter clockwise) from every polygon.
    pub fn subtract_all(
        &self,
        polygons: Vec<Polygon>,
        holes: &[Vec<Coordinate>],
    ) -> Result<Vec<Polygon>> {
        let mut current = polygons;
        for hole in holes {
            let mut next = Vec::with_capacity(current.len());
            for polygon in current {
                next.extend(self.subtract(polygon, hole)?);
            }
            current = next;
        }

        Ok(current)
    }

    /// Subtract the region `hole` (open, counter clockwise) from `polygon`.
    pub fn subtract(&self, polygon: Polygon, hole: &[Coordinate]) -> Result<Vec<Polygon>> {
        let shell = open_ring(polygon.shell());
        let graph = ClipGraph::build(&shell, hole, &self.precision)?;
        match graph.relation() {
            ShellRelation::Disjoint => Ok(vec![polygon]),
            ShellRelation::Equal | ShellRelation::AInsideB => Ok(Vec::new()),
            ShellRelation::BInsideA => self.merge_hole(polygon, hole),
            ShellRelation::Crossing => {
                let pieces = graph.clip().external_a;
                let own_holes: Vec<Vec<Coordinate>> =
                    polygon.holes().iter().map(|h| ccw_open(h)).collect();
                self.subtract_all(pieces, &own_holes)
            }
        }
    }

    /// Add `hole` (strictly inside the shell of `polygon`) to the polygon's holes.
    ///
    /// Existing holes overlapping it are merged with it by union, holes it covers are dropped.
    /// Gaps enclosed by a union are part of the polygon again and come back as islands (separate
    /// polygons), taking the remaining holes that lie inside them.
    fn merge_hole(&self, polygon: Polygon, hole: &[Coordinate]) -> Result<Vec<Polygon>> {
        let mut pending: Vec<Vec<Coordinate>> =
            polygon.holes().iter().map(|h| ccw_open(h)).collect();
        let mut merged = hole.to_vec();
        let mut absorbed_holes = vec![hole.to_vec()];
        let mut gaps: Vec<Vec<Coordinate>> = Vec::new();

        loop {
            let candidates = self.overlapping_rings(&merged, &pending)?;
            let mut absorbed = vec![false; pending.len()];
            let mut changed = false;
            for i in candidates {
                let graph = ClipGraph::build(&merged, &pending[i], &self.precision)?;
                match graph.relation() {
                    ShellRelation::Disjoint => {}
                    ShellRelation::Equal | ShellRelation::BInsideA => absorbed[i] = true,
                    ShellRelation::AInsideB => {
                        merged = pending[i].clone();
                        absorbed[i] = true;
                        changed = true;
                    }
                    ShellRelation::Crossing => {
                        let union = graph.union();
                        if let [single] = union.as_slice() {
                            merged = open_ring(single.shell());
                            gaps.extend(single.holes().iter().map(|h| ccw_open(h)));
                            absorbed[i] = true;
                            changed = true;
                        } else {
                            debug!(
                                "hole union produced {} shells, keeping holes apart",
                                union.len()
                            );
                        }
                    }
                }

                if changed {
                    break;
                }
            }

            let mut remaining = Vec::with_capacity(pending.len());
            for (ring, was_absorbed) in pending.into_iter().zip(absorbed) {
                if was_absorbed {
                    absorbed_holes.push(ring);
                } else {
                    remaining.push(ring);
                }
            }
            pending = remaining;

            if !changed {
                break;
            }
        }

        // gaps may have been covered again by holes absorbed later
        let islands: Vec<Polygon> = gaps
            .iter()
            .map(|g| Polygon::from_closed_rings(close_ring(g.clone()), Vec::new()))
            .collect();
        let islands = self.subtract_all(islands, &absorbed_holes)?;
        let tol = global_tolerance(&[&merged[..]], &self.precision);

        let mut island_holes: Vec<Vec<Vec<Coordinate>>> = vec![Vec::new(); islands.len()];
        let mut holes = Vec::with_capacity(pending.len() + 1);
        for ring in pending {
            match islands
                .iter()
                .position(|island| ring_inside(&ring, island.shell(), tol))
            {
                Some(i) => island_holes[i].push(cw_closed(&ring)),
                None => holes.push(cw_closed(&ring)),
            }
        }
        holes.push(cw_closed(&merged));

        debug!(
            "merged hole into polygon with {} holes, {} islands",
            holes.len(),
            islands.len()
        );

        let (shell, _) = polygon.into_rings();
        let mut result = vec![Polygon::from_closed_rings(shell, holes)];
        for (island, extra) in islands.into_iter().zip(island_holes) {
            let (island_shell, mut island_rings) = island.into_rings();
            island_rings.extend(extra);
            result.push(Polygon::from_closed_rings(island_shell, island_rings));
        }

        Ok(result)
    }

    /// Indexes of the `rings` whose envelope overlaps the envelope of `ring`.
    fn overlapping_rings(
        &self,
        ring: &[Coordinate],
        rings: &[Vec<Coordinate>],
    ) -> Result<Vec<usize>> {
        let Some(env) = Envelope::from_coordinates(ring) else {
            return Ok(Vec::new());
        };

        let indexed: Vec<(usize, Envelope)> = rings
            .iter()
            .enumerate()
            .filter_map(|(i, r)| Envelope::from_coordinates(r).map(|e| (i, e)))
            .collect();
        if indexed.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = StaticAABB2DIndexBuilder::new(indexed.len());
        for (_, e) in indexed.iter() {
            builder.add(e.min_x(), e.min_y(), e.max_x(), e.max_y());
        }
        let index = builder
            .build()
            .map_err(|e| GeometryError::CorruptIndex(e.to_string()))?;

        let tol = global_tolerance(&[ring], &self.precision);
        let mut result: Vec<usize> = index
            .query(
                env.min_x() - tol,
                env.min_y() - tol,
                env.max_x() + tol,
                env.max_y() + tol,
            )
            .into_iter()
            .map(|i| indexed[i].0)
            .collect();
        result.sort_unstable();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points.iter().map(|&(x, y)| Coordinate::new(x, y)).collect()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Coordinate> {
        ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    fn polygon(shell: Vec<Coordinate>, holes: Vec<Vec<Coordinate>>) -> Polygon {
        Polygon::new(shell, holes).unwrap().normalized()
    }

    #[test]
    fn subtract_disjoint_and_covering() {
        let clipper = PolygonClipper::new(PrecisionModel::default());
        let p = polygon(square(0.0, 0.0, 4.0, 4.0), Vec::new());
        let result = clipper.subtract(p.clone(), &square(10.0, 10.0, 12.0, 12.0)).unwrap();
        assert_eq!(result, vec![p.clone()]);
        let result = clipper.subtract(p, &square(-1.0, -1.0, 5.0, 5.0)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn overlapping_holes_merge() {
        let clipper = PolygonClipper::new(PrecisionModel::default());
        let p = polygon(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(1.0, 1.0, 4.0, 4.0)],
        );
        let result = clipper.subtract(p, &square(3.0, 3.0, 6.0, 6.0)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        // 100 - (9 + 9 - 1)
        assert_fuzzy_eq!(result[0].area(), 83.0);
    }

    #[test]
    fn disjoint_holes_are_kept() {
        let clipper = PolygonClipper::new(PrecisionModel::default());
        let p = polygon(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(1.0, 1.0, 2.0, 2.0)],
        );
        let result = clipper.subtract(p, &square(5.0, 5.0, 7.0, 7.0)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 2);
        assert_fuzzy_eq!(result[0].area(), 95.0);
    }

    #[test]
    fn hole_inside_existing_hole() {
        let clipper = PolygonClipper::new(PrecisionModel::default());
        let p = polygon(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(2.0, 2.0, 8.0, 8.0)],
        );
        let result = clipper.subtract(p, &square(4.0, 4.0, 5.0, 5.0)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        assert_fuzzy_eq!(result[0].area(), 64.0);
    }

    #[test]
    fn crossing_subtract_keeps_other_holes() {
        let clipper = PolygonClipper::new(PrecisionModel::default());
        let p = polygon(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(1.0, 1.0, 2.0, 2.0)],
        );
        // cuts the right half away
        let result = clipper.subtract(p, &square(5.0, -1.0, 11.0, 11.0)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        assert_fuzzy_eq!(result[0].area(), 49.0);
    }
}
