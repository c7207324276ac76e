//! Guttman's linear cost node split.
use crate::geometry::Envelope;
use std::cmp::Ordering;

/// Pick the two seed entries of a split.
///
/// For every axis (x, y and z when the entries span a non zero z range) find the entry with the
/// highest low side and the entry with the lowest high side, normalize their separation by the
/// total width of the entries along that axis, and keep the pair of the axis with the greatest
/// normalized separation.
pub(crate) fn pick_seeds(envelopes: &[Envelope]) -> (usize, usize) {
    debug_assert!(envelopes.len() >= 2);
    let total = envelopes
        .iter()
        .skip(1)
        .fold(envelopes[0], |acc, e| acc.union(e));
    let dimensions = if total.is_planar() { 2 } else { 3 };

    let mut best: Option<(f64, usize, usize)> = None;
    for d in 0..dimensions {
        let mut highest_low = 0;
        let mut lowest_high = 0;
        for (i, e) in envelopes.iter().enumerate() {
            if e.min(d) > envelopes[highest_low].min(d) {
                highest_low = i;
            }
            if e.max(d) < envelopes[lowest_high].max(d) {
                lowest_high = i;
            }
        }

        if highest_low == lowest_high {
            // one entry is both, fall back to the entry with the next highest low side
            highest_low = envelopes
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != lowest_high)
                .max_by(|(_, a), (_, b)| a.min(d).total_cmp(&b.min(d)))
                .map_or(0, |(i, _)| i);
        }

        let width = total.max(d) - total.min(d);
        let separation = envelopes[highest_low].min(d) - envelopes[lowest_high].max(d);
        let normalized = if width > 0.0 {
            separation / width
        } else {
            0.0
        };

        if best.map_or(true, |(s, _, _)| normalized > s) {
            best = Some((normalized, lowest_high, highest_low));
        }
    }

    match best {
        Some((_, a, b)) if a != b => (a.min(b), a.max(b)),
        _ => (0, 1),
    }
}

/// Split `envelopes` into two groups of entry indexes, each with at least `min_entries` entries.
///
/// After seeding (see [pick_seeds]) the remaining entries are assigned in order to the group
/// needing the least enlargement (ties go to the smaller area, then to the group with fewer
/// entries). Once a group needs every remaining entry to reach `min_entries` they all go to it.
pub(crate) fn linear_split(envelopes: &[Envelope], min_entries: usize) -> (Vec<usize>, Vec<usize>) {
    debug_assert!(envelopes.len() >= 2 * min_entries.max(1));
    let (seed1, seed2) = pick_seeds(envelopes);
    let mut group1 = vec![seed1];
    let mut group2 = vec![seed2];
    let mut env1 = envelopes[seed1];
    let mut env2 = envelopes[seed2];

    let rest: Vec<usize> = (0..envelopes.len())
        .filter(|&i| i != seed1 && i != seed2)
        .collect();

    for (n, &i) in rest.iter().enumerate() {
        let remaining = rest.len() - n;
        if group1.len() + remaining <= min_entries {
            group1.extend_from_slice(&rest[n..]);
            break;
        }
        if group2.len() + remaining <= min_entries {
            group2.extend_from_slice(&rest[n..]);
            break;
        }

        let e = &envelopes[i];
        let choice = env1
            .enlargement(e)
            .total_cmp(&env2.enlargement(e))
            .then_with(|| env1.surface().total_cmp(&env2.surface()))
            .then_with(|| env1.enlargement_margin(e).total_cmp(&env2.enlargement_margin(e)))
            .then_with(|| group1.len().cmp(&group2.len()));

        if choice == Ordering::Greater {
            group2.push(i);
            env2.expand_to_include(e);
        } else {
            group1.push(i);
            env1.expand_to_include(e);
        }
    }

    (group1, group2)
}

trait MarginEnlargement {
    fn enlargement_margin(&self, other: &Envelope) -> f64;
}

impl MarginEnlargement for Envelope {
    /// Increase in margin needed to include `other`, separates candidates when every envelope
    /// has zero area (points or axis aligned segments).
    #[inline]
    fn enlargement_margin(&self, other: &Envelope) -> f64 {
        self.union(other).margin() - self.margin()
    }
}
