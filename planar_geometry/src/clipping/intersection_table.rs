//! Intersection records shared by the two vertex lists of a clip.
use super::vertex_list::NodeId;
use crate::geometry::{Coordinate, CoordinateKey};
use std::collections::HashMap;

/// Classification of an intersection while walking shell A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntersectionKind {
    /// Not yet classified.
    None,
    /// Shell A enters shell B.
    Entry,
    /// Shell A leaves shell B.
    Exit,
    /// Touch without crossing.
    Boundary,
    /// Inside a run of overlapping boundary, never a switch point.
    Removed,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct IntersectionRecord {
    pub pos: Coordinate,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub kind: IntersectionKind,
    /// Next crossing record following shell A's vertex order.
    pub next_a: Option<usize>,
    /// Next crossing record following shell B's vertex order.
    pub next_b: Option<usize>,
}

impl IntersectionRecord {
    #[inline]
    pub fn is_crossing(&self) -> bool {
        matches!(self.kind, IntersectionKind::Entry | IntersectionKind::Exit)
    }
}

/// Records keyed by exact position.
///
/// Positions must be unified to one canonical value (see [IntersectionTable::snap]) before they
/// are used as keys, lookups never apply a tolerance.
#[derive(Debug, Clone, Default)]
pub(crate) struct IntersectionTable {
    records: Vec<IntersectionRecord>,
    by_position: HashMap<CoordinateKey, usize>,
}

impl IntersectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn record(&self, id: usize) -> &IntersectionRecord {
        &self.records[id]
    }

    #[inline]
    pub fn record_mut(&mut self, id: usize) -> &mut IntersectionRecord {
        &mut self.records[id]
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (usize, &IntersectionRecord)> + '_ {
        self.records.iter().enumerate()
    }

    /// Canonical position for `pos`: the position of an existing record within `tolerance`, or
    /// `pos` itself.
    pub fn snap(&self, pos: Coordinate, tolerance: f64) -> Coordinate {
        if self.by_position.contains_key(&pos.key()) {
            return pos;
        }

        self.records
            .iter()
            .find(|r| r.pos.distance(&pos) <= tolerance)
            .map_or(pos, |r| r.pos)
    }

    #[inline]
    pub fn get(&self, pos: &Coordinate) -> Option<usize> {
        self.by_position.get(&pos.key()).copied()
    }

    /// Insert a record at `pos` linking the two nodes, returns the existing record if one is
    /// already keyed at `pos`.
    pub fn insert(&mut self, pos: Coordinate, node_a: NodeId, node_b: NodeId) -> usize {
        if let Some(id) = self.get(&pos) {
            return id;
        }

        let id = self.records.len();
        self.records.push(IntersectionRecord {
            pos,
            node_a,
            node_b,
            kind: IntersectionKind::None,
            next_a: None,
            next_b: None,
        });
        self.by_position.insert(pos.key(), id);
        id
    }

    pub fn crossing_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_crossing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_unifies_keys() {
        let mut table = IntersectionTable::new();
        let p = Coordinate::new(1.0, 1.0);
        let a = table.insert(p, 3, 7);
        let near = table.snap(Coordinate::new(1.0 + 1e-12, 1.0), 1e-9);
        assert_eq!(near, p);
        assert_eq!(table.insert(near, 3, 7), a);
        assert_eq!(table.len(), 1);

        let far = table.snap(Coordinate::new(2.0, 1.0), 1e-9);
        assert_eq!(far, Coordinate::new(2.0, 1.0));
        assert_eq!(table.get(&far), None);
        assert_eq!(table.record(a).kind, IntersectionKind::None);
        assert!(!table.record(a).is_crossing());
    }
}
