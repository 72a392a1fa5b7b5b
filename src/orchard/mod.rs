//! Missing tree inference for orchards planted along two row directions
//!
//! Stages, leaf first: geometry helpers, nearest neighbours, axis estimation,
//! projection of expected positions and grouping of unoccupied ones.
pub mod axis;
pub mod config;
pub mod coord;
pub mod detect;
pub mod error;
pub mod geo;
pub mod grouping;
pub mod index;
pub mod neighbors;
pub mod pipeline;

mod par;

#[cfg(test)]
mod detect_test;
#[cfg(test)]
mod grouping_test;
#[cfg(test)]
mod neighbors_test;
#[cfg(test)]
pub(crate) mod testutil;

pub use config::{AxisPartition, DetectorConfig, GroupingStrategy};
pub use coord::Coordinate;
pub use pipeline::{Detection, detect_missing_trees};
// Public API exports - allow unused imports as these are part of the public API
#[allow(unused_imports)]
pub use axis::{AxisFeature, LocalFeatures, OrchardFeatures, global_orchard_features};
#[allow(unused_imports)]
pub use error::{OrchardError, Result};
