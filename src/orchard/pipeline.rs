use log::{debug, info};

use super::axis::{OrchardFeatures, global_orchard_features};
use super::config::DetectorConfig;
use super::coord::Coordinate;
use super::detect::find_missing_trees;
use super::error::Result;
use super::geo::haversine_distance;
use super::grouping::group_candidates;

/// Outcome of missing tree detection for one orchard
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub features: OrchardFeatures,
    /// Number of unoccupied projections before grouping
    pub candidate_count: usize,
    /// Confirmed missing tree positions
    pub missing: Vec<Coordinate>,
    /// Lower confidence positions not already in `missing`, when requested
    pub potentially_missing: Option<Vec<Coordinate>>,
}

/// Runs the whole inference: orchard axes, projected candidates, then one
/// grouping pass per confidence tier
pub fn detect_missing_trees(trees: &[Coordinate], config: &DetectorConfig) -> Result<Detection> {
    config.validate()?;

    let features = global_orchard_features(trees, config)?;
    let candidates = find_missing_trees(trees, &features, config.existence_precision)?;
    let candidate_count = candidates.len();

    let missing: Vec<Coordinate> = group_candidates(
        candidates.clone(),
        config.confident_group_size,
        config.clustering_precision,
        config.grouping,
    )
    .iter()
    .map(|g| g.centroid())
    .collect();

    let potentially_missing = if config.report_potential {
        let potential: Vec<Coordinate> = group_candidates(
            candidates,
            config.potential_group_size,
            config.clustering_precision,
            config.grouping,
        )
        .iter()
        .map(|g| g.centroid())
        .filter(|c| {
            !missing
                .iter()
                .any(|m| haversine_distance(m, c) <= config.clustering_precision)
        })
        .collect();
        debug!("{} potentially missing trees", potential.len());
        Some(potential)
    } else {
        None
    };

    info!(
        "Found {} missing trees among {} surveyed trees",
        missing.len(),
        trees.len()
    );

    Ok(Detection {
        features,
        candidate_count,
        missing,
        potentially_missing,
    })
}
