use super::coord::Coordinate;
use super::error::{OrchardError, Result};
use super::geo::haversine_distance;

/// Finds the `k` trees closest to `trees[tree]`
///
/// Trees at zero distance (the tree itself and any duplicate survey entry)
/// are skipped. Equal distances keep input order.
///
/// # Returns
///
/// Tree indices ordered by ascending distance
///
/// # Errors
///
/// `InsufficientNeighbors` if fewer than `k` trees are left to choose from
pub fn find_nearest(tree: usize, trees: &[Coordinate], k: usize) -> Result<Vec<usize>> {
    let origin = &trees[tree];

    let mut distances: Vec<(usize, f64)> = trees
        .iter()
        .enumerate()
        .map(|(i, c)| (i, haversine_distance(origin, c)))
        .filter(|&(_, d)| d > 0.0)
        .collect();

    if distances.len() < k {
        return Err(OrchardError::InsufficientNeighbors {
            tree,
            found: distances.len(),
            required: k,
        });
    }

    // Stable sort, ties stay in input order
    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(distances.into_iter().take(k).map(|(i, _)| i).collect())
}
