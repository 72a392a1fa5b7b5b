use clap::ValueEnum;

use super::error::{OrchardError, Result};

/// How per-tree slope observations are split into the two orchard axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AxisPartition {
    /// Positive slopes form axis 1, negative slopes axis 2
    #[default]
    #[value(name = "sign")]
    SlopeSign,
    /// Two-direction clustering of slope angles, robust to sign flips of
    /// rows running close to north-south
    #[value(name = "dominant")]
    DominantDirection,
}

/// How missing tree candidates are merged into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GroupingStrategy {
    /// Seed-based grouping: every pool member within range of the seed
    #[default]
    Greedy,
    /// Connected components of the within-range graph
    Components,
}

/// Tunables for missing tree detection
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Trees considered per local axis search
    pub neighbor_count: usize,
    /// Max gradient (Δlng/Δlat) delta to accept a point as on-line
    pub colinearity_tolerance: f64,
    /// Max distance (m) to consider a projected position occupied
    pub existence_precision: f64,
    /// Max distance (m) between grouped candidates
    pub clustering_precision: f64,
    /// Min candidates to confirm a missing tree
    pub confident_group_size: usize,
    /// Min candidates to flag a possibly missing tree
    pub potential_group_size: usize,
    /// Whether the potentially missing tier is computed at all
    pub report_potential: bool,
    pub axis_partition: AxisPartition,
    pub grouping: GroupingStrategy,
}

pub const DEFAULT_NEIGHBOR_COUNT: usize = 4;
pub const DEFAULT_COLINEARITY_TOLERANCE: f64 = 0.5;
pub const DEFAULT_EXISTENCE_PRECISION: f64 = 2.5;
pub const DEFAULT_CLUSTERING_PRECISION: f64 = 2.5;
pub const DEFAULT_CONFIDENT_GROUP_SIZE: usize = 3;
pub const DEFAULT_POTENTIAL_GROUP_SIZE: usize = 2;

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            colinearity_tolerance: DEFAULT_COLINEARITY_TOLERANCE,
            existence_precision: DEFAULT_EXISTENCE_PRECISION,
            clustering_precision: DEFAULT_CLUSTERING_PRECISION,
            confident_group_size: DEFAULT_CONFIDENT_GROUP_SIZE,
            potential_group_size: DEFAULT_POTENTIAL_GROUP_SIZE,
            report_potential: false,
            axis_partition: AxisPartition::default(),
            grouping: GroupingStrategy::default(),
        }
    }
}

impl DetectorConfig {
    /// Rejects values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.neighbor_count < 2 {
            return Err(invalid(format!(
                "neighbor count must be at least 2, got {}",
                self.neighbor_count
            )));
        }

        for (name, value) in [
            ("colinearity tolerance", self.colinearity_tolerance),
            ("existence precision", self.existence_precision),
            ("clustering precision", self.clustering_precision),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.confident_group_size == 0 || self.potential_group_size == 0 {
            return Err(invalid("group sizes must be at least 1".to_string()));
        }

        if self.report_potential && self.potential_group_size > self.confident_group_size {
            return Err(invalid(format!(
                "potential group size {} exceeds confident group size {}",
                self.potential_group_size, self.confident_group_size
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> OrchardError {
    OrchardError::InvalidConfig(message)
}
