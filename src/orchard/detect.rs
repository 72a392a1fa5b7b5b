use log::debug;

use super::axis::OrchardFeatures;
use super::coord::Coordinate;
use super::error::Result;
use super::geo::destination_point;
use super::index::SpatialIndex;
use super::par::map_trees;

/// Which of the four expected neighbour positions a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Axis1Forward,
    Axis1Backward,
    Axis2Forward,
    Axis2Backward,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Axis1Forward,
        Direction::Axis1Backward,
        Direction::Axis2Forward,
        Direction::Axis2Backward,
    ];

    /// Expected position one spacing away from `tree` in this direction
    pub fn project(self, tree: &Coordinate, features: &OrchardFeatures) -> Coordinate {
        let (axis, sign) = match self {
            Direction::Axis1Forward => (features.axis1, 1.0),
            Direction::Axis1Backward => (features.axis1, -1.0),
            Direction::Axis2Forward => (features.axis2, 1.0),
            Direction::Axis2Backward => (features.axis2, -1.0),
        };
        destination_point(tree, axis.slope, sign * axis.spacing)
    }
}

/// A projected position with no surveyed tree close to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position in the candidate list, stable for the whole run
    pub id: usize,
    /// Index of the tree the projection started from
    pub source: usize,
    pub direction: Direction,
    pub coord: Coordinate,
}

/// Projects every tree one spacing along both axes, both ways, and keeps
/// the projections that land further than `existence_precision` meters from
/// every tree
///
/// The same empty spot is usually reported by several trees; those
/// duplicates are the evidence grouping relies on.
pub fn find_missing_trees(
    trees: &[Coordinate],
    features: &OrchardFeatures,
    existence_precision: f64,
) -> Result<Vec<Candidate>> {
    let index = SpatialIndex::new(trees);

    let per_tree = map_trees(trees.len(), |source| {
        let tree = &trees[source];
        Ok(Direction::ALL
            .iter()
            .map(|&direction| (direction, direction.project(tree, features)))
            .filter(|(_, coord)| !index.any_within(coord, existence_precision))
            .map(|(direction, coord)| (source, direction, coord))
            .collect::<Vec<_>>())
    })?;

    let candidates: Vec<Candidate> = per_tree
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(id, (source, direction, coord))| Candidate {
            id,
            source,
            direction,
            coord,
        })
        .collect();

    debug!(
        "{} of {} projected positions are unoccupied",
        candidates.len(),
        trees.len() * Direction::ALL.len()
    );

    Ok(candidates)
}
