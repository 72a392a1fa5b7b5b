use log::{debug, trace};
use std::f64::consts::{FRAC_PI_8, PI};

use super::config::{AxisPartition, DetectorConfig};
use super::coord::Coordinate;
use super::error::{OrchardError, Result};
use super::geo::{haversine_distance, is_point_on_line};
use super::neighbors::find_nearest;
use super::par::map_trees;

/// Stop scanning neighbour pairs once this many axes were seen for a tree
const MAX_LOCAL_AXES: usize = 2;

/// Iteration cap for the two-direction clustering
const MAX_DIRECTION_ITERATIONS: usize = 32;

/// Smallest angle between two dominant directions to count as two axes
const MIN_DIRECTION_SEPARATION: f64 = FRAC_PI_8;

/// One planting direction: slope angle in radians and tree spacing in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFeature {
    pub slope: f64,
    pub spacing: f64,
}

/// The two planting directions of an orchard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchardFeatures {
    pub axis1: AxisFeature,
    pub axis2: AxisFeature,
}

/// Axes observed around a single tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalFeatures {
    /// Neighbour index pairs the tree sits between
    pub pairs: Vec<(usize, usize)>,
    /// One observation per pair, in the same order
    pub features: Vec<AxisFeature>,
}

/// Finds the neighbour pairs that `trees[tree]` is colinear with
///
/// Pairs are scanned by ascending combined distance from the tree (equal
/// sums keep enumeration order). A colinear pair running the same way as an
/// axis already found for this tree (gradients within `tolerance`) is
/// skipped, and scanning stops after the second axis, so each tree reports
/// at most one observation per axis, measured on its closest pair.
pub fn local_axis_features(
    tree: usize,
    neighbors: &[usize],
    trees: &[Coordinate],
    tolerance: f64,
) -> Result<LocalFeatures> {
    let origin = &trees[tree];

    let mut candidates = Vec::new();
    for (i, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[i + 1..] {
            let combined =
                haversine_distance(origin, &trees[a]) + haversine_distance(origin, &trees[b]);
            candidates.push((a, b, combined));
        }
    }
    candidates.sort_by(|x, y| x.2.total_cmp(&y.2));

    let mut local = LocalFeatures::default();
    for (a, b, _) in candidates {
        if let Some(m) = is_point_on_line(&trees[a], &trees[b], origin, tolerance)? {
            let seen = local
                .features
                .iter()
                .any(|f| (f.slope.tan() - m.slope.tan()).abs() < tolerance);
            if seen {
                continue;
            }
            local.pairs.push((a, b));
            local.features.push(AxisFeature {
                slope: m.slope,
                spacing: m.avg_distance,
            });
            if local.pairs.len() >= MAX_LOCAL_AXES {
                break;
            }
        }
    }

    Ok(local)
}

/// Estimates the two planting axes of the whole orchard
///
/// Every tree contributes the axes it sits on (see [`local_axis_features`]);
/// the observations are then split in two according to
/// `config.axis_partition` and averaged per axis.
///
/// # Errors
///
/// - `InsufficientData` for fewer than 2 trees or when an axis gets no
///   observation
/// - `InsufficientNeighbors` / `DegenerateGeometry` from any single tree,
///   which abort the whole estimate
pub fn global_orchard_features(
    trees: &[Coordinate],
    config: &DetectorConfig,
) -> Result<OrchardFeatures> {
    if trees.len() < 2 {
        return Err(OrchardError::InsufficientData(format!(
            "need at least 2 trees, got {}",
            trees.len()
        )));
    }

    let per_tree = map_trees(trees.len(), |tree| {
        let neighbors = find_nearest(tree, trees, config.neighbor_count)?;
        let local =
            local_axis_features(tree, &neighbors, trees, config.colinearity_tolerance)?;
        trace!("Tree {} sits between {:?}", tree, local.pairs);
        Ok(local)
    })?;

    let observations: Vec<AxisFeature> = per_tree
        .into_iter()
        .flat_map(|local| local.features)
        .collect();

    debug!(
        "Collected {} axis observations from {} trees",
        observations.len(),
        trees.len()
    );

    let features = match config.axis_partition {
        AxisPartition::SlopeSign => split_by_sign(&observations)?,
        AxisPartition::DominantDirection => split_by_direction(&observations)?,
    };

    debug!(
        "Axis 1: slope {:.4} rad, spacing {:.2} m; axis 2: slope {:.4} rad, spacing {:.2} m",
        features.axis1.slope, features.axis1.spacing, features.axis2.slope, features.axis2.spacing
    );

    Ok(features)
}

/// Splits observations into positive and negative slopes
///
/// Slopes of exactly zero belong to neither axis and are ignored.
pub fn split_by_sign(observations: &[AxisFeature]) -> Result<OrchardFeatures> {
    let (positive, rest): (Vec<AxisFeature>, Vec<AxisFeature>) =
        observations.iter().copied().partition(|f| f.slope > 0.0);
    let negative: Vec<AxisFeature> = rest.into_iter().filter(|f| f.slope < 0.0).collect();

    let axis1 = arithmetic_mean(&positive).ok_or_else(|| {
        OrchardError::InsufficientData("no colinear tree pair with a positive slope".to_string())
    })?;
    let axis2 = arithmetic_mean(&negative).ok_or_else(|| {
        OrchardError::InsufficientData("no colinear tree pair with a negative slope".to_string())
    })?;

    Ok(OrchardFeatures { axis1, axis2 })
}

/// Splits observations into the two dominant directions
///
/// Slope angles are axial (a line at `-PI/2 + e` runs nearly the same way as
/// one at `PI/2 - e`), so clustering happens on doubled angles mapped to the
/// unit circle. Each axis slope is the circular mean of its cluster, each
/// spacing the arithmetic mean. Axis 1 is the direction with the larger
/// slope.
///
/// # Errors
///
/// `InsufficientData` when a cluster ends up empty or both directions are
/// closer than 22.5 degrees.
pub fn split_by_direction(observations: &[AxisFeature]) -> Result<OrchardFeatures> {
    let doubled: Vec<(f64, f64)> = observations
        .iter()
        .map(|f| ((2.0 * f.slope).cos(), (2.0 * f.slope).sin()))
        .collect();

    let Some(&first) = doubled.first() else {
        return Err(OrchardError::InsufficientData(
            "no colinear tree pairs found".to_string(),
        ));
    };

    // Seed the second center with the observation least aligned to the first
    let second = doubled
        .iter()
        .copied()
        .min_by(|a, b| dot(*a, first).total_cmp(&dot(*b, first)))
        .unwrap_or(first);

    let mut centers = [first, second];
    let mut labels = vec![0usize; doubled.len()];

    for _ in 0..MAX_DIRECTION_ITERATIONS {
        let mut changed = false;
        for (label, &v) in labels.iter_mut().zip(&doubled) {
            let nearest = if dot(v, centers[1]) > dot(v, centers[0]) { 1 } else { 0 };
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }

        for (k, center) in centers.iter_mut().enumerate() {
            let (sx, sy) = doubled
                .iter()
                .zip(&labels)
                .filter(|&(_, &l)| l == k)
                .fold((0.0, 0.0), |acc, (v, _)| (acc.0 + v.0, acc.1 + v.1));
            let norm = sx.hypot(sy);
            if norm > 0.0 {
                *center = (sx / norm, sy / norm);
            }
        }

        if !changed {
            break;
        }
    }

    let mut axes = Vec::with_capacity(2);
    for (k, center) in centers.iter().enumerate() {
        let members: Vec<&AxisFeature> = observations
            .iter()
            .zip(&labels)
            .filter(|&(_, &l)| l == k)
            .map(|(f, _)| f)
            .collect();
        if members.is_empty() {
            return Err(OrchardError::InsufficientData(
                "all colinear tree pairs run in a single direction".to_string(),
            ));
        }
        let spacing = members.iter().map(|f| f.spacing).sum::<f64>() / members.len() as f64;
        axes.push(AxisFeature {
            slope: center.1.atan2(center.0) / 2.0,
            spacing,
        });
    }

    let delta = (axes[0].slope - axes[1].slope).abs();
    let separation = delta.min(PI - delta);
    if separation < MIN_DIRECTION_SEPARATION {
        return Err(OrchardError::InsufficientData(format!(
            "dominant directions differ by only {separation:.4} rad"
        )));
    }

    if axes[1].slope > axes[0].slope {
        axes.swap(0, 1);
    }

    Ok(OrchardFeatures {
        axis1: axes[0],
        axis2: axes[1],
    })
}

fn arithmetic_mean(features: &[AxisFeature]) -> Option<AxisFeature> {
    if features.is_empty() {
        return None;
    }
    let n = features.len() as f64;
    Some(AxisFeature {
        slope: features.iter().map(|f| f.slope).sum::<f64>() / n,
        spacing: features.iter().map(|f| f.spacing).sum::<f64>() / n,
    })
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}
