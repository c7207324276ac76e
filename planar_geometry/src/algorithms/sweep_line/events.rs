//! Segment extraction and event queue construction for the sweep.
use crate::{
    error::{GeometryError, Result},
    geometry::{Coordinate, Envelope},
};
use std::cmp::Ordering;

/// One input segment, oriented so `left` is the lexicographically smaller end point (by x, then
/// y).
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepSegment {
    pub left: Coordinate,
    pub right: Coordinate,
    pub envelope: Envelope,
    /// Global edge ordinal (ring offset + input segment index).
    pub ordinal: usize,
    pub ring: usize,
    /// Index among the distinct edges of the ring.
    pub ring_edge: usize,
    /// Number of distinct edges in the ring.
    pub ring_edge_count: usize,
    pub ring_closed: bool,
}

impl SweepSegment {
    /// Returns `true` if both segments come from the same ring and are consecutive in it (share a
    /// ring vertex).
    #[inline]
    pub fn is_ring_adjacent(&self, other: &SweepSegment) -> bool {
        if self.ring != other.ring {
            return false;
        }

        let (i, j) = if self.ring_edge < other.ring_edge {
            (self.ring_edge, other.ring_edge)
        } else {
            (other.ring_edge, self.ring_edge)
        };

        j - i == 1 || (self.ring_closed && i == 0 && j + 1 == self.ring_edge_count)
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.left.x == self.right.x
    }

    /// y value of the segment at sweep position `x` (clamped to the segment's x range), the lower
    /// end point for vertical segments.
    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        if self.is_vertical() {
            return self.left.y;
        }

        let x = x.clamp(self.left.x, self.right.x);
        let t = (x - self.left.x) / (self.right.x - self.left.x);
        self.left.y + t * (self.right.y - self.left.y)
    }

    /// (lowest, highest) y value of the segment at sweep position `x`, a single value unless the
    /// segment is vertical.
    #[inline]
    pub fn span_at(&self, x: f64) -> (f64, f64) {
        if self.is_vertical() {
            return (self.left.y, self.right.y);
        }

        let y = self.y_at(x);
        (y, y)
    }

    /// Slope used to break ties between segments meeting at the sweep position, vertical segments
    /// sort above everything.
    #[inline]
    pub fn slope(&self) -> f64 {
        if self.is_vertical() {
            return f64::INFINITY;
        }

        (self.right.y - self.left.y) / (self.right.x - self.left.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepEvent {
    /// Sweep position the event fires at.
    pub x: f64,
    pub y: f64,
    pub kind: EventKind,
    /// Index into the segment list.
    pub segment: usize,
}

/// Segments and the sorted event queue built from a set of rings.
#[derive(Debug, Clone)]
pub(crate) struct SweepInput {
    pub segments: Vec<SweepSegment>,
    pub events: Vec<SweepEvent>,
    /// Global edge ordinal of the first segment of each ring.
    pub ring_offsets: Vec<usize>,
    /// Tolerance the right events were delayed by.
    pub tolerance: f64,
}

/// Extract segments and build the event queue.
///
/// Rings whose first and last coordinates are equal are closed (the closing segment wraps
/// around), others are open polylines. Consecutive duplicate coordinates are skipped, segment
/// ordinals still refer to the input segment index so callers can map them back. Right events are
/// delayed by `tolerance` so segments touching within tolerance are active together.
pub(crate) fn build_sweep_input<R>(rings: &[R], tolerance: f64) -> Result<SweepInput>
where
    R: AsRef<[Coordinate]>,
{
    let mut segments = Vec::new();
    let mut ring_offsets = Vec::with_capacity(rings.len());
    let mut offset = 0;

    for (ring_index, ring) in rings.iter().enumerate() {
        let ring = ring.as_ref();
        if ring.iter().any(|c| !c.is_valid()) {
            return Err(GeometryError::InvalidCoordinate);
        }

        ring_offsets.push(offset);
        let closed = ring.len() > 1 && ring.first() == ring.last();

        // (input segment index, start, end) for each non zero length segment
        let edges: Vec<(usize, Coordinate, Coordinate)> = ring
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] != w[1])
            .map(|(i, w)| (i, w[0], w[1]))
            .collect();

        let distinct_points = if closed { edges.len() } else { edges.len() + 1 };
        let distinct_points = if edges.is_empty() {
            usize::from(!ring.is_empty())
        } else {
            distinct_points
        };
        if distinct_points < 2 {
            return Err(GeometryError::TooFewPoints {
                required: 2,
                found: distinct_points,
            });
        }

        let edge_count = edges.len();
        for (ring_edge, (input_index, start, end)) in edges.into_iter().enumerate() {
            let (left, right) = if compare_xy(&start, &end) == Ordering::Greater {
                (end, start)
            } else {
                (start, end)
            };
            segments.push(SweepSegment {
                left,
                right,
                envelope: Envelope::new(left.x, left.y, right.x, right.y),
                ordinal: offset + input_index,
                ring: ring_index,
                ring_edge,
                ring_edge_count: edge_count,
                ring_closed: closed,
            });
        }

        offset += ring.len().saturating_sub(1);
    }

    let mut events = Vec::with_capacity(2 * segments.len());
    for (i, s) in segments.iter().enumerate() {
        events.push(SweepEvent {
            x: s.left.x,
            y: s.left.y,
            kind: EventKind::Left,
            segment: i,
        });
        events.push(SweepEvent {
            x: s.right.x + tolerance,
            y: s.right.y,
            kind: EventKind::Right,
            segment: i,
        });
    }

    events.sort_by(compare_events);

    Ok(SweepInput {
        segments,
        events,
        ring_offsets,
        tolerance,
    })
}

#[inline]
fn compare_xy(a: &Coordinate, b: &Coordinate) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Events ordered by x, left events before right events at the same x, then by y.
fn compare_events(a: &SweepEvent, b: &SweepEvent) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| match (a.kind, b.kind) {
            (EventKind::Left, EventKind::Right) => Ordering::Less,
            (EventKind::Right, EventKind::Left) => Ordering::Greater,
            _ => Ordering::Equal,
        })
        .then(a.y.total_cmp(&b.y))
        .then(a.segment.cmp(&b.segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_ring_segments() {
        let square = ring![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let input = build_sweep_input(&[square], 0.0).unwrap();
        assert_eq!(input.segments.len(), 4);
        assert_eq!(input.events.len(), 8);
        assert!(input.segments[0].is_ring_adjacent(&input.segments[1]));
        assert!(input.segments[0].is_ring_adjacent(&input.segments[3]));
        assert!(!input.segments[0].is_ring_adjacent(&input.segments[2]));
        // top edge is reversed so its left end point is (0, 10)
        assert_eq!(input.segments[2].left, Coordinate::new(0.0, 10.0));
        assert!(input
            .events
            .windows(2)
            .all(|w| compare_events(&w[0], &w[1]) != Ordering::Greater));
    }

    #[test]
    fn duplicates_keep_input_ordinals() {
        let open = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(2.0, 1.0),
            Coordinate::new(3.0, 0.0),
        ];
        let triangle = ring![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let input = build_sweep_input(&[open, triangle], 0.0).unwrap();
        assert_eq!(input.ring_offsets, vec![0, 4]);
        let ordinals: Vec<_> = input.segments.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5, 6]);
        // open polyline does not wrap around, closed ring does
        assert!(!input.segments[0].is_ring_adjacent(&input.segments[2]));
        assert!(input.segments[3].is_ring_adjacent(&input.segments[5]));
        assert!(!input.segments[2].is_ring_adjacent(&input.segments[3]));
    }

    #[test]
    fn too_few_points() {
        let point = vec![Coordinate::new(1.0, 1.0), Coordinate::new(1.0, 1.0)];
        assert_eq!(
            build_sweep_input(&[point], 0.0).err(),
            Some(GeometryError::TooFewPoints {
                required: 2,
                found: 1
            })
        );
    }
}
