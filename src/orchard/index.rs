//! 2-d tree over coordinates for radius queries in meters
//!
//! Node layout follows the classic median split on alternating dimensions
//! (latitude, then longitude). Nodes hold indices into the coordinate slice.

use super::coord::Coordinate;
use super::geo::haversine_distance;

/// Relative slack on the plane distance used for pruning, so the planar
/// bound never discards a point the haversine check would accept
const PRUNE_SLACK: f64 = 1.001;

pub struct SpatialIndex<'a> {
    coords: &'a [Coordinate],
    root: Option<Box<Node>>,
}

struct Node {
    id: usize,
    split: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl<'a> SpatialIndex<'a> {
    /// Builds the tree over every coordinate of `coords`
    pub fn new(coords: &'a [Coordinate]) -> Self {
        let mut ids: Vec<usize> = (0..coords.len()).collect();
        let root = build(coords, &mut ids, 0);
        SpatialIndex { coords, root }
    }

    /// Returns the ids of all coordinates within `radius` meters of `pt`
    /// (haversine, boundary included), in ascending id order
    pub fn within(&self, pt: &Coordinate, radius: f64) -> Vec<usize> {
        let mut hits = Vec::new();
        if radius >= 0.0 {
            self.collect(self.root.as_deref(), pt, radius, &mut |id| {
                hits.push(id);
                true
            });
        }
        hits.sort_unstable();
        hits
    }

    /// Checks whether any coordinate lies within `radius` meters of `pt`
    pub fn any_within(&self, pt: &Coordinate, radius: f64) -> bool {
        let mut found = false;
        if radius >= 0.0 {
            self.collect(self.root.as_deref(), pt, radius, &mut |_| {
                found = true;
                false
            });
        }
        found
    }

    /// Visits matches until `visit` returns false; returns false once stopped
    fn collect(
        &self,
        node: Option<&Node>,
        pt: &Coordinate,
        radius: f64,
        visit: &mut dyn FnMut(usize) -> bool,
    ) -> bool {
        let Some(node) = node else {
            return true;
        };
        let here = &self.coords[node.id];

        let diff = pt.dim(node.split) - here.dim(node.split);
        let (this_side, other_side) = if diff < 0.0 {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };

        if !self.collect(this_side, pt, radius, visit) {
            return false;
        }

        // Closest the other side can get: the split line at the query's
        // other coordinate
        let mut on_plane = *pt;
        on_plane.set_dim(node.split, here.dim(node.split));
        let bound = radius * PRUNE_SLACK;
        if pt.sq_dist(&on_plane) > bound * bound {
            return true;
        }

        if haversine_distance(here, pt) <= radius && !visit(node.id) {
            return false;
        }
        self.collect(other_side, pt, radius, visit)
    }
}

fn build(coords: &[Coordinate], ids: &mut [usize], depth: usize) -> Option<Box<Node>> {
    if ids.is_empty() {
        return None;
    }
    let split = depth % 2;

    ids.sort_by(|&a, &b| {
        coords[a]
            .dim(split)
            .total_cmp(&coords[b].dim(split))
            .then(coords[a].dim(1 - split).total_cmp(&coords[b].dim(1 - split)))
            .then(a.cmp(&b))
    });

    // Everything left of the median is strictly smaller on the split dimension
    let mut m = ids.len() / 2;
    while m > 0 && coords[ids[m - 1]].dim(split) == coords[ids[m]].dim(split) {
        m -= 1;
    }

    let id = ids[m];
    let (left, rest) = ids.split_at_mut(m);
    let right = &mut rest[1..];

    Some(Box::new(Node {
        id,
        split,
        left: build(coords, left, depth + 1),
        right: build(coords, right, depth + 1),
    }))
}
