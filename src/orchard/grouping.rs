use bitvec::prelude::*;
use log::{debug, trace};

use super::config::GroupingStrategy;
use super::coord::{Coordinate, centroid};
use super::detect::Candidate;
use super::index::SpatialIndex;

// Greedy grouping (default):
//
//    pool = all candidates
//    for each candidate S still in pool (input order)
//       G = every pool member within precision of S, S included
//       remove G from pool
//       keep G if |G| >= minGroupSize
//
// Component grouping instead grows G from S breadth-first, adding anything
// within precision of any member, so chains of candidates end up together.
//
// Pool membership is tracked by candidate position, never by coordinate
// value, so identical coordinates from different source trees stay distinct.

/// A set of candidates that agree on one missing tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeGroup {
    members: Vec<Candidate>,
}

impl TreeGroup {
    /// Members in selection order, seed first
    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[allow(dead_code)] // Part of public API, may be used by external code
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Planar mean of the member positions
    pub fn centroid(&self) -> Coordinate {
        // Groups are built non-empty
        centroid(self.members.iter().map(|c| &c.coord))
            .unwrap_or(Coordinate::new(f64::NAN, f64::NAN))
    }
}

/// Partitions candidates into groups of at least `min_group_size` members
///
/// Grouping consumes its input: run it once per confidence tier on a fresh
/// copy of the candidates.
///
/// # Arguments
///
/// * `candidates` - Missing tree candidates, in the order seeds are taken
/// * `min_group_size` - Smallest group that is kept
/// * `precision` - Max distance in meters between grouped candidates
/// * `strategy` - Seed-based or connected-component grouping
///
/// # Returns
///
/// Retained groups in seed order. A candidate belongs to at most one group;
/// candidates of undersized groups are dropped.
pub fn group_candidates(
    candidates: Vec<Candidate>,
    min_group_size: usize,
    precision: f64,
    strategy: GroupingStrategy,
) -> Vec<TreeGroup> {
    let coords: Vec<Coordinate> = candidates.iter().map(|c| c.coord).collect();
    let index = SpatialIndex::new(&coords);

    let member_sets = match strategy {
        GroupingStrategy::Greedy => greedy(&coords, &index, precision),
        GroupingStrategy::Components => components(&coords, &index, precision),
    };
    let formed = member_sets.len();

    let groups: Vec<TreeGroup> = member_sets
        .into_iter()
        .filter(|members| members.len() >= min_group_size)
        .map(|members| {
            let seed = &candidates[members[0]];
            trace!(
                "Group of {} seeded by candidate {} from tree {} ({:?})",
                members.len(),
                seed.id,
                seed.source,
                seed.direction
            );
            TreeGroup {
                members: members.into_iter().map(|i| candidates[i]).collect(),
            }
        })
        .collect();

    debug!(
        "Grouped {} candidates into {} sets, {} with at least {} members",
        candidates.len(),
        formed,
        groups.len(),
        min_group_size
    );

    groups
}

/// Seed-based grouping over a shrinking pool
fn greedy(coords: &[Coordinate], index: &SpatialIndex<'_>, precision: f64) -> Vec<Vec<usize>> {
    let mut pool = bitvec![1; coords.len()];
    let mut sets = Vec::new();

    for seed in 0..coords.len() {
        if !pool[seed] {
            continue;
        }

        let mut members = vec![seed];
        members.extend(
            index
                .within(&coords[seed], precision)
                .into_iter()
                .filter(|&j| j != seed && pool[j]),
        );

        for &j in &members {
            pool.set(j, false);
        }
        sets.push(members);
    }

    sets
}

/// Connected components of the within-precision graph
fn components(
    coords: &[Coordinate],
    index: &SpatialIndex<'_>,
    precision: f64,
) -> Vec<Vec<usize>> {
    let mut visited = bitvec![0; coords.len()];
    let mut sets = Vec::new();

    for seed in 0..coords.len() {
        if visited[seed] {
            continue;
        }
        visited.set(seed, true);

        let mut members = vec![seed];
        let mut j = 0;
        // members grows while it is walked
        while j < members.len() {
            let k = members[j];
            for p in index.within(&coords[k], precision) {
                if !visited[p] {
                    visited.set(p, true);
                    members.push(p);
                }
            }
            j += 1;
        }

        sets.push(members);
    }

    sets
}
